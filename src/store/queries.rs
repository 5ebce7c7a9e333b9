//! Typed SQL operations over a borrowed connection.
//!
//! These return `rusqlite::Result`, so "not found" (`Ok(None)`, `Ok(false)`)
//! stays distinguishable from a storage failure (`Err`). [`super::Database`]
//! wraps them with the log-and-fallback contract used by the game.

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{GameSession, GameSetting, Highscore, HighscoreEntry, Player};

// Players

pub fn insert_player(conn: &Connection, username: &str) -> rusqlite::Result<i64> {
    conn.execute("INSERT INTO players (username) VALUES (?1)", [username])?;
    Ok(conn.last_insert_rowid())
}

pub fn player_by_id(conn: &Connection, player_id: i64) -> rusqlite::Result<Option<Player>> {
    conn.query_row(
        "SELECT id, username, creation_date FROM players WHERE id = ?1",
        [player_id],
        Player::from_row,
    )
    .optional()
}

pub fn player_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<Player>> {
    conn.query_row(
        "SELECT id, username, creation_date FROM players WHERE username = ?1",
        [username],
        Player::from_row,
    )
    .optional()
}

pub fn all_players(conn: &Connection) -> rusqlite::Result<Vec<Player>> {
    let mut stmt = conn.prepare("SELECT id, username, creation_date FROM players ORDER BY id")?;
    let players = stmt.query_map([], Player::from_row)?.collect();
    players
}

pub fn rename_player(conn: &Connection, player_id: i64, username: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE players SET username = ?1 WHERE id = ?2",
        params![username, player_id],
    )?;
    Ok(changed > 0)
}

/// Sessions and highscores go with the player through `ON DELETE CASCADE`
pub fn delete_player(conn: &Connection, player_id: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM players WHERE id = ?1", [player_id])?;
    Ok(changed > 0)
}

// Game sessions

/// Record a finished game and promote it to a highscore when it beats the
/// player's best, in one transaction.
pub fn insert_game_session(
    conn: &Connection,
    player_id: i64,
    score: i64,
    duration_seconds: i64,
    played_at: Option<NaiveDateTime>,
) -> rusqlite::Result<i64> {
    let tx = conn.unchecked_transaction()?;

    match played_at {
        Some(played_at) => tx.execute(
            "INSERT INTO game_sessions (player_id, score, duration, date_played)
             VALUES (?1, ?2, ?3, ?4)",
            params![player_id, score, duration_seconds, played_at],
        )?,
        None => tx.execute(
            "INSERT INTO game_sessions (player_id, score, duration) VALUES (?1, ?2, ?3)",
            params![player_id, score, duration_seconds],
        )?,
    };
    let session_id = tx.last_insert_rowid();

    promote_highscore(&tx, player_id, score)?;

    tx.commit()?;
    Ok(session_id)
}

/// Append a highscore row if `score` beats the player's best (or there is
/// none yet). Returns whether a row was added.
pub fn promote_highscore(conn: &Connection, player_id: i64, score: i64) -> rusqlite::Result<bool> {
    let best: Option<i64> = conn.query_row(
        "SELECT MAX(score) FROM highscores WHERE player_id = ?1",
        [player_id],
        |row| row.get(0),
    )?;

    if best.is_some_and(|best| score <= best) {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO highscores (player_id, score) VALUES (?1, ?2)",
        params![player_id, score],
    )?;
    Ok(true)
}

pub fn game_session(conn: &Connection, session_id: i64) -> rusqlite::Result<Option<GameSession>> {
    conn.query_row(
        "SELECT id, player_id, score, date_played, duration FROM game_sessions WHERE id = ?1",
        [session_id],
        GameSession::from_row,
    )
    .optional()
}

/// Most recent first; sessions sharing a timestamp come newest-inserted first
pub fn player_game_sessions(conn: &Connection, player_id: i64) -> rusqlite::Result<Vec<GameSession>> {
    let mut stmt = conn.prepare(
        "SELECT id, player_id, score, date_played, duration FROM game_sessions
         WHERE player_id = ?1
         ORDER BY date_played DESC, id DESC",
    )?;
    let sessions = stmt.query_map([player_id], GameSession::from_row)?.collect();
    sessions
}

pub fn delete_game_session(conn: &Connection, session_id: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM game_sessions WHERE id = ?1", [session_id])?;
    Ok(changed > 0)
}

// Highscores

pub fn top_highscores(conn: &Connection, limit: usize) -> rusqlite::Result<Vec<HighscoreEntry>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(
        "SELECT h.id, h.player_id, h.score, h.date_achieved, p.username
         FROM highscores h
         JOIN players p ON h.player_id = p.id
         ORDER BY h.score DESC, h.id ASC
         LIMIT ?1",
    )?;
    let entries = stmt.query_map([limit], HighscoreEntry::from_row)?.collect();
    entries
}

pub fn player_highscore(conn: &Connection, player_id: i64) -> rusqlite::Result<Option<Highscore>> {
    conn.query_row(
        "SELECT id, player_id, score, date_achieved FROM highscores
         WHERE player_id = ?1
         ORDER BY score DESC
         LIMIT 1",
        [player_id],
        Highscore::from_row,
    )
    .optional()
}

/// Every highscore row of a player in the order they were achieved
pub fn player_highscore_history(conn: &Connection, player_id: i64) -> rusqlite::Result<Vec<Highscore>> {
    let mut stmt = conn.prepare(
        "SELECT id, player_id, score, date_achieved FROM highscores
         WHERE player_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([player_id], Highscore::from_row)?.collect();
    rows
}

// Settings

/// Insert a setting or update the existing row in place. An empty or missing
/// description leaves the stored one untouched.
pub fn upsert_setting(
    conn: &Connection,
    name: &str,
    value: &str,
    description: Option<&str>,
) -> rusqlite::Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let description = description.filter(|text| !text.is_empty());

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM game_settings WHERE setting_name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()?;

    let id = match existing {
        Some(id) => {
            match description {
                Some(description) => tx.execute(
                    "UPDATE game_settings SET setting_value = ?1, description = ?2 WHERE id = ?3",
                    params![value, description, id],
                )?,
                None => tx.execute(
                    "UPDATE game_settings SET setting_value = ?1 WHERE id = ?2",
                    params![value, id],
                )?,
            };
            id
        }
        None => {
            tx.execute(
                "INSERT INTO game_settings (setting_name, setting_value, description)
                 VALUES (?1, ?2, ?3)",
                params![name, value, description],
            )?;
            tx.last_insert_rowid()
        }
    };

    tx.commit()?;
    Ok(id)
}

pub fn setting(conn: &Connection, name: &str) -> rusqlite::Result<Option<GameSetting>> {
    conn.query_row(
        "SELECT id, setting_name, setting_value, description FROM game_settings
         WHERE setting_name = ?1",
        [name],
        GameSetting::from_row,
    )
    .optional()
}

pub fn all_settings(conn: &Connection) -> rusqlite::Result<Vec<GameSetting>> {
    let mut stmt = conn.prepare(
        "SELECT id, setting_name, setting_value, description FROM game_settings ORDER BY id",
    )?;
    let settings = stmt.query_map([], GameSetting::from_row)?.collect();
    settings
}

pub fn delete_setting(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM game_settings WHERE setting_name = ?1", [name])?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::create_tables;

    fn memory_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_not_found_is_not_an_error() {
        let conn = memory_conn();

        assert_eq!(player_by_id(&conn, 42).unwrap(), None);
        assert_eq!(game_session(&conn, 42).unwrap(), None);
        assert_eq!(player_highscore(&conn, 42).unwrap(), None);
        assert!(!delete_setting(&conn, "missing").unwrap());
    }

    #[test]
    fn test_duplicate_username_is_an_error() {
        let conn = memory_conn();

        insert_player(&conn, "alice").unwrap();
        let err = insert_player(&conn, "alice").unwrap_err();

        assert_eq!(
            err.sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        );
    }

    #[test]
    fn test_failed_promotion_rolls_back_the_session() {
        let conn = memory_conn();
        let player_id = insert_player(&conn, "alice").unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_highscores BEFORE INSERT ON highscores
             BEGIN SELECT RAISE(ABORT, 'highscores are read-only'); END;",
        )
        .unwrap();

        assert!(insert_game_session(&conn, player_id, 100, 30, None).is_err());
        assert!(player_game_sessions(&conn, player_id).unwrap().is_empty());
    }

    #[test]
    fn test_session_for_unknown_player_violates_foreign_key() {
        let conn = memory_conn();
        assert!(insert_game_session(&conn, 999, 10, 5, None).is_err());
    }

    #[test]
    fn test_negative_scores_are_rejected() {
        let conn = memory_conn();
        let player_id = insert_player(&conn, "alice").unwrap();
        assert!(insert_game_session(&conn, player_id, -1, 5, None).is_err());
        assert!(insert_game_session(&conn, player_id, 1, -5, None).is_err());
    }
}
