//! HTTP surface over the caches and the stats aggregator

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::data_fetcher::api::BallDontLieClient;
use crate::data_fetcher::cache::{GameCache, TeamDirectory};
use crate::data_fetcher::stats::StatsAggregator;
use crate::error::AppError;
use crate::storage::Database;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub games: GameCache,
    pub teams: Arc<TeamDirectory>,
    pub stats: StatsAggregator,
}

impl AppState {
    /// Wires every service onto one store and one upstream client.
    pub fn new(db: Arc<Database>, source: BallDontLieClient) -> Self {
        let teams = Arc::new(TeamDirectory::new(Arc::clone(&db), source.clone()));
        AppState {
            games: GameCache::new(db, source.clone()),
            stats: StatsAggregator::new(Arc::clone(&teams), source),
            teams,
        }
    }
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), AppError> {
    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("API server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
