use rusqlite::Connection;

/// Create every table and index if missing. Safe to run on each start.
pub fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            creation_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        CREATE TABLE IF NOT EXISTS game_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id INTEGER NOT NULL,
            score INTEGER NOT NULL CHECK (score >= 0),
            date_played TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            duration INTEGER NOT NULL CHECK (duration >= 0),
            FOREIGN KEY (player_id) REFERENCES players (id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_game_sessions_player_id ON game_sessions (player_id);
        CREATE TABLE IF NOT EXISTS highscores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id INTEGER NOT NULL,
            score INTEGER NOT NULL,
            date_achieved TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (player_id) REFERENCES players (id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_highscores_score ON highscores (score DESC);
        CREATE TABLE IF NOT EXISTS game_settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            setting_name TEXT UNIQUE NOT NULL,
            setting_value TEXT NOT NULL,
            description TEXT
        );
        ",
    )
}
