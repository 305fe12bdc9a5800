use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiError, AppState};
use crate::data_fetcher::models::{Game, PlayerStatLine};
use crate::error::AppError;

fn parse_date(raw: Option<&str>, what: &str) -> Result<NaiveDate, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{what} is required (YYYY-MM-DD)")))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("{what} must be YYYY-MM-DD, got {raw:?}")))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct GamesQuery {
    date: Option<String>,
    refresh: Option<String>,
}

/// GET /games?date=YYYY-MM-DD[&refresh=false]
///
/// Hydrates from upstream on a miss unless `refresh=false`.
pub async fn list_games(
    State(state): State<AppState>,
    Query(params): Query<GamesQuery>,
) -> Result<Json<Vec<Game>>, ApiError> {
    let date = parse_date(params.date.as_deref(), "date")?;
    let refresh = !params
        .refresh
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("false"));

    let games = if refresh {
        state.games.list_games_for_date(date).await?
    } else {
        let games = state.games.clone();
        tokio::task::spawn_blocking(move || games.list_games_for_date_cached(date))
            .await
            .map_err(|e| AppError::storage_error(format!("Store task failed: {e}")))??
    };
    Ok(Json(games))
}

/// GET /games/:game_id
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<Game>, ApiError> {
    state
        .games
        .get_game(game_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("game {game_id} not found")))
}

/// GET /games/:game_id/stats
pub async fn game_player_stats(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<Vec<PlayerStatLine>>, ApiError> {
    Ok(Json(state.games.player_stats_for_game(game_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct TeamsCsvQuery {
    start_date: Option<String>,
    end_date: Option<String>,
    team: Option<String>,
    split: Option<String>,
}

/// GET /stats/teams.csv?start_date&end_date&team[&split=home_away]
pub async fn teams_csv(
    State(state): State<AppState>,
    Query(params): Query<TeamsCsvQuery>,
) -> Result<Response, ApiError> {
    let start = parse_date(params.start_date.as_deref(), "start_date")?;
    let end = parse_date(params.end_date.as_deref(), "end_date")?;
    let split_home_away = params.split.as_deref() == Some("home_away");

    let rows = state
        .stats
        .stream_team_stats_csv(start, end, params.team.as_deref(), split_home_away)
        .await?;

    let disposition = format!("attachment; filename=\"teams_{start}_to_{end}.csv\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(rows),
    )
        .into_response())
}
