use super::Database;
use crate::data_fetcher::models::Team;
use crate::error::AppError;
use rusqlite::params;

impl Database {
    /// Insert or refresh every team in one transaction.
    pub fn upsert_teams(&self, teams: &[Team]) -> Result<usize, AppError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO teams (id, abbreviation, city, name, full_name, conference, division)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(id) DO UPDATE SET
                    abbreviation = excluded.abbreviation,
                    city = excluded.city,
                    name = excluded.name,
                    full_name = excluded.full_name,
                    conference = excluded.conference,
                    division = excluded.division
                "#,
            )?;
            for team in teams {
                stmt.execute(params![
                    team.id,
                    team.abbreviation,
                    team.city,
                    team.name,
                    team.full_name,
                    team.conference,
                    team.division,
                ])?;
            }
        }
        tx.commit()?;
        Ok(teams.len())
    }

    /// All stored teams, ordered by id
    pub fn all_teams(&self) -> Result<Vec<Team>, AppError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, abbreviation, city, name, full_name, conference, division
             FROM teams ORDER BY id",
        )?;
        let teams = stmt
            .query_map([], |row| {
                Ok(Team {
                    id: row.get(0)?,
                    abbreviation: row.get(1)?,
                    city: row.get(2)?,
                    name: row.get(3)?,
                    full_name: row.get(4)?,
                    conference: row.get(5)?,
                    division: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(teams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: i64, abbreviation: &str, full_name: &str) -> Team {
        Team {
            id,
            abbreviation: abbreviation.to_string(),
            full_name: full_name.to_string(),
            ..Team::default()
        }
    }

    #[test]
    fn test_upsert_and_read_teams() {
        let db = Database::in_memory().unwrap();
        db.upsert_teams(&[team(2, "BOS", "Boston Celtics"), team(1, "ATL", "Atlanta Hawks")])
            .unwrap();

        let teams = db.all_teams().unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].id, 1);
        assert_eq!(teams[1].abbreviation, "BOS");
    }

    #[test]
    fn test_upsert_teams_is_idempotent_and_refreshes() {
        let db = Database::in_memory().unwrap();
        db.upsert_teams(&[team(2, "BOS", "Boston")]).unwrap();
        db.upsert_teams(&[team(2, "BOS", "Boston Celtics")]).unwrap();

        let teams = db.all_teams().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].full_name, "Boston Celtics");
    }
}
