use super::Database;
use crate::data_fetcher::models::{ApiGame, Game};
use crate::error::AppError;
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row, params};

const GAME_COLUMNS: &str = "id, date, season, period, status, postseason,
    home_team_id, home_team_name, home_team_score,
    visitor_team_id, visitor_team_name, visitor_team_score";

fn game_from_row(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        date: row.get(1)?,
        season: row.get(2)?,
        period: row.get(3)?,
        status: row.get(4)?,
        postseason: row.get(5)?,
        home_team_id: row.get(6)?,
        home_team_name: row.get(7)?,
        home_team_score: row.get(8)?,
        visitor_team_id: row.get(9)?,
        visitor_team_name: row.get(10)?,
        visitor_team_score: row.get(11)?,
    })
}

impl Database {
    /// Insert or replace a batch of upstream games in one transaction.
    ///
    /// Every game is normalized first, so a single malformed record aborts
    /// the batch before anything is written.
    pub fn upsert_games(&self, games: &[ApiGame]) -> Result<usize, AppError> {
        let records = games
            .iter()
            .map(ApiGame::to_record)
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR REPLACE INTO games ({GAME_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ))?;
            for game in &records {
                stmt.execute(params![
                    game.id,
                    game.date,
                    game.season,
                    game.period,
                    game.status,
                    game.postseason,
                    game.home_team_id,
                    game.home_team_name,
                    game.home_team_score,
                    game.visitor_team_id,
                    game.visitor_team_name,
                    game.visitor_team_score,
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Stored games on one calendar day, ordered by id
    pub fn games_by_date(&self, date: NaiveDate) -> Result<Vec<Game>, AppError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE date = ?1 ORDER BY id"
        ))?;
        let games = stmt
            .query_map(params![date], game_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(games)
    }

    pub fn game(&self, game_id: i64) -> Result<Option<Game>, AppError> {
        let conn = self.lock()?;
        let game = conn
            .query_row(
                &format!("SELECT {GAME_COLUMNS} FROM games WHERE id = ?1"),
                params![game_id],
                game_from_row,
            )
            .optional()?;
        Ok(game)
    }
}
