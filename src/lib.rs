//! Courtside: a read-through caching layer over the balldontlie NBA API
//!
//! Games and teams are served from a local SQLite store that is hydrated from
//! the upstream API on a miss. Per-team aggregates over a date range are
//! streamed as CSV.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use courtside::{AppError, Config};
//! use courtside::data_fetcher::{BallDontLieClient, GameCache};
//! use courtside::storage::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let db = Arc::new(Database::open(config.database_path())?);
//!     let games = GameCache::new(db, BallDontLieClient::new(&config)?);
//!
//!     let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
//!     for game in games.list_games_for_date(date).await? {
//!         println!("{} vs {}", game.home_team_name, game.visitor_team_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod server;
pub mod storage;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::{GameCache, StatsAggregator, TeamDirectory};
pub use error::AppError;
pub use storage::Database;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
