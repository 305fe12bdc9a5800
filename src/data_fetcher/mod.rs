pub mod api;
pub mod cache;
pub mod models;
pub mod stats;

pub use api::BallDontLieClient;
pub use cache::{GameCache, TeamDirectory, TeamIndex};
pub use models::{ApiGame, Game, PlayerStatLine, Team};
pub use stats::{CsvStream, StatsAggregator};
