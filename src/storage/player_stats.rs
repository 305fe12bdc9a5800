use super::Database;
use crate::data_fetcher::models::PlayerStatLine;
use crate::error::AppError;
use rusqlite::params;

impl Database {
    pub fn upsert_player_stats(&self, lines: &[PlayerStatLine]) -> Result<usize, AppError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO player_stats
                    (player_id, game_id, team_id, min, pts, reb, ast, stl, blk,
                     tov, pf, fgm, fga, fg3m, ftm, fta)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            )?;
            for line in lines {
                stmt.execute(params![
                    line.player_id,
                    line.game_id,
                    line.team_id,
                    line.min,
                    line.pts,
                    line.reb,
                    line.ast,
                    line.stl,
                    line.blk,
                    line.tov,
                    line.pf,
                    line.fgm,
                    line.fga,
                    line.fg3m,
                    line.ftm,
                    line.fta,
                ])?;
            }
        }
        tx.commit()?;
        Ok(lines.len())
    }

    /// Stored box-score lines for one game, ordered by player id
    pub fn player_stats_for_game(&self, game_id: i64) -> Result<Vec<PlayerStatLine>, AppError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT player_id, game_id, team_id, min, pts, reb, ast, stl, blk,
                    tov, pf, fgm, fga, fg3m, ftm, fta
             FROM player_stats WHERE game_id = ?1 ORDER BY player_id",
        )?;
        let lines = stmt
            .query_map(params![game_id], |row| {
                Ok(PlayerStatLine {
                    player_id: row.get(0)?,
                    game_id: row.get(1)?,
                    team_id: row.get(2)?,
                    min: row.get(3)?,
                    pts: row.get(4)?,
                    reb: row.get(5)?,
                    ast: row.get(6)?,
                    stl: row.get(7)?,
                    blk: row.get(8)?,
                    tov: row.get(9)?,
                    pf: row.get(10)?,
                    fgm: row.get(11)?,
                    fga: row.get(12)?,
                    fg3m: row.get(13)?,
                    ftm: row.get(14)?,
                    fta: row.get(15)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(player_id: i64, game_id: i64, pts: i32) -> PlayerStatLine {
        PlayerStatLine {
            player_id,
            game_id,
            team_id: 2,
            min: Some("30:00".to_string()),
            pts: Some(pts),
            reb: None,
            ast: None,
            stl: None,
            blk: None,
            tov: None,
            pf: None,
            fgm: None,
            fga: None,
            fg3m: None,
            ftm: None,
            fta: None,
        }
    }

    #[test]
    fn test_player_stats_keyed_by_player_and_game() {
        let db = Database::in_memory().unwrap();
        db.upsert_player_stats(&[line(5, 1001, 10), line(3, 1001, 22), line(3, 1002, 8)])
            .unwrap();
        db.upsert_player_stats(&[line(3, 1001, 25)]).unwrap();

        let lines = db.player_stats_for_game(1001).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].player_id, 3);
        assert_eq!(lines[0].pts, Some(25));
        assert_eq!(lines[0].min.as_deref(), Some("30:00"));
        assert!(db.player_stats_for_game(9999).unwrap().is_empty());
    }
}
