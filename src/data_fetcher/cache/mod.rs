pub mod game_cache;
pub mod team_directory;

pub use game_cache::GameCache;
pub use team_directory::{TeamDirectory, TeamIndex};
