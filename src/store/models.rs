use chrono::NaiveDateTime;
use rusqlite::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub username: String,
    pub creation_date: NaiveDateTime,
}

impl Player {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            creation_date: row.get("creation_date")?,
        })
    }
}

/// One completed game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub id: i64,
    pub player_id: i64,
    pub score: i64,
    pub date_played: NaiveDateTime,
    pub duration_seconds: i64,
}

impl GameSession {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            player_id: row.get("player_id")?,
            score: row.get("score")?,
            date_played: row.get("date_played")?,
            duration_seconds: row.get("duration")?,
        })
    }
}

/// A personal-best entry; each player's rows increase strictly in score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highscore {
    pub id: i64,
    pub player_id: i64,
    pub score: i64,
    pub date_achieved: NaiveDateTime,
}

impl Highscore {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            player_id: row.get("player_id")?,
            score: row.get("score")?,
            date_achieved: row.get("date_achieved")?,
        })
    }
}

/// Highscore joined with the owning player's name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighscoreEntry {
    pub id: i64,
    pub player_id: i64,
    pub score: i64,
    pub username: String,
    pub date_achieved: NaiveDateTime,
}

impl HighscoreEntry {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            player_id: row.get("player_id")?,
            score: row.get("score")?,
            username: row.get("username")?,
            date_achieved: row.get("date_achieved")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetting {
    pub id: i64,
    pub setting_name: String,
    pub setting_value: String,
    pub description: Option<String>,
}

impl GameSetting {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            setting_name: row.get("setting_name")?,
            setting_value: row.get("setting_value")?,
            description: row.get("description")?,
        })
    }
}

/// How to find a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerLookup<'a> {
    Id(i64),
    Username(&'a str),
}
