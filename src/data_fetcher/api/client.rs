use crate::config::Config;
use crate::data_fetcher::models::{ApiGame, ApiPlayerStat, PaginatedResponse, Team};
use crate::error::AppError;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::fetch_utils::{RetryPolicy, fetch};
use super::http_client::create_http_client_with_timeout;
use super::urls::{
    build_game_url, build_games_by_date_url, build_player_stats_url, build_team_games_url,
    build_teams_url,
};

/// Authenticated access to the balldontlie API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct BallDontLieClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl BallDontLieClient {
    /// Builds a client from configuration. Fails when no API key is set.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client =
            create_http_client_with_timeout(config.http_timeout_seconds, config.api_key()?)?;
        Ok(Self::with_client(
            client,
            &config.api_base_url,
            RetryPolicy::from_config(config),
        ))
    }

    pub fn with_client(client: Client, base_url: &str, retry: RetryPolicy) -> Self {
        BallDontLieClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All teams in one request; the listing is not paginated.
    #[instrument(skip(self))]
    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let url = build_teams_url(&self.base_url);
        let response: PaginatedResponse<Team> = fetch(&self.client, &url, &self.retry).await?;
        info!("Fetched {} teams from upstream", response.data.len());
        Ok(response.data)
    }

    /// Every game on `date`, following pagination to the last page.
    #[instrument(skip(self))]
    pub async fn list_games_by_date(&self, date: NaiveDate) -> Result<Vec<ApiGame>, AppError> {
        let base = self.base_url.clone();
        self.drain_pages(move |page| build_games_by_date_url(&base, date, page))
            .await
    }

    /// Every game `team_id` played between `start` and `end` inclusive.
    #[instrument(skip(self))]
    pub async fn list_games_for_team_in_range(
        &self,
        team_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ApiGame>, AppError> {
        let base = self.base_url.clone();
        self.drain_pages(move |page| build_team_games_url(&base, team_id, start, end, page))
            .await
    }

    /// Box-score lines for one game, all pages.
    #[instrument(skip(self))]
    pub async fn list_player_stats_for_game(
        &self,
        game_id: i64,
    ) -> Result<Vec<ApiPlayerStat>, AppError> {
        let base = self.base_url.clone();
        self.drain_pages(move |page| build_player_stats_url(&base, game_id, page))
            .await
    }

    /// Single game lookup.
    ///
    /// `Ok(None)` when the upstream has no such game or returns a payload that
    /// is not a usable game object. Transport and server failures still error.
    #[instrument(skip(self))]
    pub async fn get_game(&self, game_id: i64) -> Result<Option<ApiGame>, AppError> {
        let url = build_game_url(&self.base_url, game_id);
        let payload: Value = match fetch(&self.client, &url, &self.retry).await {
            Ok(payload) => payload,
            Err(e) if e.is_not_found() || e.is_malformed_upstream() => {
                debug!("Game {game_id} unavailable upstream: {e}");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let game = ApiGame::from_payload(payload);
        if game.is_none() {
            warn!("Discarding malformed payload for game {game_id}");
        }
        Ok(game)
    }

    async fn drain_pages<T, F>(&self, page_url: F) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
        F: Fn(u32) -> String,
    {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let url = page_url(page);
            let response: PaginatedResponse<T> = fetch(&self.client, &url, &self.retry).await?;
            let total_pages = response.total_pages();
            debug!(
                "Page {page}/{total_pages} returned {} items",
                response.data.len()
            );
            items.extend(response.data);
            if page >= total_pages {
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}
