//! SQLite persistence for players, game sessions, highscores and settings
//!
//! [`Database`] keeps only the file path. Each operation opens its own
//! connection and drops it when done, so there is no connect/close pairing
//! for callers to get wrong. Failures are logged and mapped to
//! `None`/`false`/empty results; use [`queries`] directly through
//! [`Database::with_connection`] when the error itself matters.

pub mod models;
pub mod queries;
pub mod schema;

pub use models::{GameSession, GameSetting, Highscore, HighscoreEntry, Player, PlayerLookup};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File used when no path is given
pub const DEFAULT_DB_FILE: &str = "snake_game.db";

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database at `path` and make sure the
    /// schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let database = Self {
            path: path.as_ref().to_path_buf(),
        };

        let conn = database
            .connect()
            .with_context(|| format!("Failed to open database {:?}", database.path))?;
        schema::create_tables(&conn).context("Failed to create database tables")?;

        info!(path = %database.path.display(), "database ready");
        Ok(database)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh connection with foreign keys enforced. Closed on drop.
    pub fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }

    /// Run several statements on one connection
    pub fn with_connection<T, F>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        f(&conn)
    }

    fn run<T, F>(&self, operation: &'static str, fallback: T, f: F) -> T
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        match self.with_connection(f) {
            Ok(value) => value,
            Err(err) => {
                warn!(operation, error = %err, "database operation failed");
                fallback
            }
        }
    }

    // Players

    /// Create a player. `None` if the name is empty, already taken, or the
    /// write fails.
    pub fn add_player(&self, username: &str) -> Option<i64> {
        if username.trim().is_empty() {
            warn!("refusing to add a player with an empty username");
            return None;
        }

        let id = self.run("add_player", None, |conn| {
            queries::insert_player(conn, username).map(Some)
        });
        if let Some(id) = id {
            debug!(player_id = id, username, "player added");
        }
        id
    }

    pub fn get_player(&self, lookup: PlayerLookup<'_>) -> Option<Player> {
        match lookup {
            PlayerLookup::Id(id) => self.get_player_by_id(id),
            PlayerLookup::Username(username) => self.get_player_by_username(username),
        }
    }

    pub fn get_player_by_id(&self, player_id: i64) -> Option<Player> {
        self.run("get_player", None, |conn| queries::player_by_id(conn, player_id))
    }

    pub fn get_player_by_username(&self, username: &str) -> Option<Player> {
        self.run("get_player", None, |conn| {
            queries::player_by_username(conn, username)
        })
    }

    pub fn get_all_players(&self) -> Vec<Player> {
        self.run("get_all_players", Vec::new(), queries::all_players)
    }

    /// True iff a row was changed
    pub fn update_player(&self, player_id: i64, username: &str) -> bool {
        if username.trim().is_empty() {
            warn!(player_id, "refusing to rename a player to an empty username");
            return false;
        }

        self.run("update_player", false, |conn| {
            queries::rename_player(conn, player_id, username)
        })
    }

    /// Deletes the player together with their sessions and highscores
    pub fn delete_player(&self, player_id: i64) -> bool {
        self.run("delete_player", false, |conn| {
            queries::delete_player(conn, player_id)
        })
    }

    // Game sessions

    /// Record a game. A new personal best is appended to the highscores in
    /// the same transaction.
    pub fn add_game_session(
        &self,
        player_id: i64,
        score: i64,
        duration_seconds: i64,
        played_at: Option<NaiveDateTime>,
    ) -> Option<i64> {
        let id = self.run("add_game_session", None, |conn| {
            queries::insert_game_session(conn, player_id, score, duration_seconds, played_at)
                .map(Some)
        });
        if let Some(id) = id {
            debug!(session_id = id, player_id, score, duration_seconds, "game session recorded");
        }
        id
    }

    pub fn get_game_session(&self, session_id: i64) -> Option<GameSession> {
        self.run("get_game_session", None, |conn| {
            queries::game_session(conn, session_id)
        })
    }

    /// Most recent first
    pub fn get_player_game_sessions(&self, player_id: i64) -> Vec<GameSession> {
        self.run("get_player_game_sessions", Vec::new(), |conn| {
            queries::player_game_sessions(conn, player_id)
        })
    }

    pub fn delete_game_session(&self, session_id: i64) -> bool {
        self.run("delete_game_session", false, |conn| {
            queries::delete_game_session(conn, session_id)
        })
    }

    // Highscores

    /// Top `limit` highscores across all players, best first
    pub fn get_highscores(&self, limit: usize) -> Vec<HighscoreEntry> {
        self.run("get_highscores", Vec::new(), |conn| {
            queries::top_highscores(conn, limit)
        })
    }

    /// The player's best highscore row
    pub fn get_player_highscore(&self, player_id: i64) -> Option<Highscore> {
        self.run("get_player_highscore", None, |conn| {
            queries::player_highscore(conn, player_id)
        })
    }

    // Settings

    /// Insert or update a setting, returning its id
    pub fn add_or_update_setting(
        &self,
        name: &str,
        value: &str,
        description: Option<&str>,
    ) -> Option<i64> {
        self.run("add_or_update_setting", None, |conn| {
            queries::upsert_setting(conn, name, value, description).map(Some)
        })
    }

    pub fn get_setting(&self, name: &str) -> Option<GameSetting> {
        self.run("get_setting", None, |conn| queries::setting(conn, name))
    }

    pub fn get_all_settings(&self) -> Vec<GameSetting> {
        self.run("get_all_settings", Vec::new(), queries::all_settings)
    }

    pub fn delete_setting(&self, name: &str) -> bool {
        self.run("delete_setting", false, |conn| {
            queries::delete_setting(conn, name)
        })
    }
}
