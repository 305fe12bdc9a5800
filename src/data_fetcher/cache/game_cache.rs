//! Read-through cache for games and box scores backed by the SQLite store

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::data_fetcher::api::BallDontLieClient;
use crate::data_fetcher::models::{Game, PlayerStatLine};
use crate::error::AppError;
use crate::storage::Database;

/// Serves games from the store and hydrates it from upstream on a miss.
///
/// Holds no mutable state of its own; every call is an independent
/// read, fetch, write sequence.
#[derive(Clone)]
pub struct GameCache {
    db: Arc<Database>,
    source: BallDontLieClient,
}

impl GameCache {
    pub fn new(db: Arc<Database>, source: BallDontLieClient) -> Self {
        GameCache { db, source }
    }

    /// Games on `date` ordered by id, hydrating the store when it has none.
    ///
    /// An empty upstream answer returns immediately without touching the
    /// store. Otherwise the fetched games are upserted and the day is read
    /// back, so callers always see stored rows.
    #[instrument(skip(self))]
    pub async fn list_games_for_date(&self, date: NaiveDate) -> Result<Vec<Game>, AppError> {
        let cached = self.db.run(move |db| db.games_by_date(date)).await?;
        if !cached.is_empty() {
            debug!("Cache hit: {} games stored for {date}", cached.len());
            return Ok(cached);
        }

        debug!("Cache miss for {date}, hydrating from upstream");
        let fetched = self.source.list_games_by_date(date).await?;
        if fetched.is_empty() {
            info!("Upstream has no games for {date}");
            return Ok(Vec::new());
        }

        let (written, games) = self
            .db
            .run(move |db| {
                let written = db.upsert_games(&fetched)?;
                Ok((written, db.games_by_date(date)?))
            })
            .await?;
        info!("Hydrated {written} games for {date}");
        Ok(games)
    }

    /// Single game by id, hydrating on a miss. `None` when upstream has no
    /// usable record for it, including one whose fields cannot be normalized.
    #[instrument(skip(self))]
    pub async fn get_game(&self, game_id: i64) -> Result<Option<Game>, AppError> {
        if let Some(game) = self.db.run(move |db| db.game(game_id)).await? {
            debug!("Cache hit for game {game_id}");
            return Ok(Some(game));
        }

        let Some(fetched) = self.source.get_game(game_id).await? else {
            debug!("Game {game_id} not found upstream");
            return Ok(None);
        };
        if let Err(e) = fetched.to_record() {
            warn!("Discarding unusable record for game {game_id}: {e}");
            return Ok(None);
        }

        self.db
            .run(move |db| {
                db.upsert_games(std::slice::from_ref(&fetched))?;
                db.game(game_id)
            })
            .await
    }

    /// Store-only read; never calls upstream.
    pub fn list_games_for_date_cached(&self, date: NaiveDate) -> Result<Vec<Game>, AppError> {
        self.db.games_by_date(date)
    }

    /// Box-score lines for a game, hydrating the store when it has none.
    #[instrument(skip(self))]
    pub async fn player_stats_for_game(
        &self,
        game_id: i64,
    ) -> Result<Vec<PlayerStatLine>, AppError> {
        let cached = self
            .db
            .run(move |db| db.player_stats_for_game(game_id))
            .await?;
        if !cached.is_empty() {
            return Ok(cached);
        }

        let fetched = self.source.list_player_stats_for_game(game_id).await?;
        if fetched.is_empty() {
            return Ok(Vec::new());
        }

        let lines: Vec<PlayerStatLine> = fetched.iter().map(PlayerStatLine::from).collect();
        let (written, stored) = self
            .db
            .run(move |db| {
                let written = db.upsert_player_stats(&lines)?;
                Ok((written, db.player_stats_for_game(game_id)?))
            })
            .await?;
        info!("Hydrated {written} stat lines for game {game_id}");
        Ok(stored)
    }
}
