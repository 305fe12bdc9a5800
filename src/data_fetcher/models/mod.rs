pub mod games;
pub mod pagination;
pub mod player_stats;
pub mod teams;

pub use games::{ApiGame, Game};
pub use pagination::{PageMeta, PaginatedResponse};
pub use player_stats::{ApiPlayerStat, EntityRef, PlayerStatLine};
pub use teams::Team;

use serde::{Deserialize, Deserializer};

/// Upstream string fields are occasionally `null`; treat that as an empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
