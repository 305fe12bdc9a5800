//! SQLite persistence for teams, games and player box scores

mod games;
mod player_stats;
mod teams;

use crate::error::AppError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Database handle shared across request handlers.
///
/// Methods are synchronous and the connection sits behind a mutex. Async
/// callers go through [`Database::run`], which moves the work onto tokio's
/// blocking pool.
#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        info!("Opened database at {}", path.display());
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Runs `work` against the store on the blocking thread pool.
    pub async fn run<F, R>(self: &Arc<Self>, work: F) -> Result<R, AppError>
    where
        F: FnOnce(&Database) -> Result<R, AppError> + Send + 'static,
        R: Send + 'static,
    {
        let db = Arc::clone(self);
        tokio::task::spawn_blocking(move || work(&db))
            .await
            .map_err(|e| AppError::storage_error(format!("Store task failed: {e}")))?
    }

    fn init_schema(&self) -> Result<(), AppError> {
        self.lock()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id INTEGER PRIMARY KEY,
                abbreviation TEXT NOT NULL DEFAULT '',
                city TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL DEFAULT '',
                full_name TEXT NOT NULL DEFAULT '',
                conference TEXT NOT NULL DEFAULT '',
                division TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY,
                date TEXT,
                season INTEGER,
                period INTEGER,
                status TEXT,
                postseason INTEGER NOT NULL DEFAULT 0,
                home_team_id INTEGER NOT NULL,
                home_team_name TEXT NOT NULL DEFAULT '',
                home_team_score INTEGER,
                visitor_team_id INTEGER NOT NULL,
                visitor_team_name TEXT NOT NULL DEFAULT '',
                visitor_team_score INTEGER
            );

            CREATE TABLE IF NOT EXISTS player_stats (
                player_id INTEGER NOT NULL,
                game_id INTEGER NOT NULL,
                team_id INTEGER NOT NULL,
                min TEXT,
                pts INTEGER,
                reb INTEGER,
                ast INTEGER,
                stl INTEGER,
                blk INTEGER,
                tov INTEGER,
                pf INTEGER,
                fgm INTEGER,
                fga INTEGER,
                fg3m INTEGER,
                ftm INTEGER,
                fta INTEGER,
                PRIMARY KEY (player_id, game_id)
            );

            CREATE INDEX IF NOT EXISTS idx_games_date ON games(date);
            CREATE INDEX IF NOT EXISTS idx_player_stats_game ON player_stats(game_id);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::storage_error("database connection lock poisoned"))
    }
}
