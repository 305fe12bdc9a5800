use axum::{Router, routing::get};

use super::{AppState, handlers};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Game endpoints
        .route("/games", get(handlers::list_games))
        .route("/games/:game_id", get(handlers::get_game))
        .route("/games/:game_id/stats", get(handlers::game_player_stats))
        // Aggregates
        .route("/stats/teams.csv", get(handlers::teams_csv))
        .with_state(state)
}
