use super::teams::Team;
use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A game exactly as the upstream API reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiGame {
    pub id: i64,
    /// `YYYY-MM-DD`, sometimes followed by a time component
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub period: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub postseason: Option<bool>,
    #[serde(default)]
    pub home_team_score: Option<i32>,
    #[serde(default)]
    pub visitor_team_score: Option<i32>,
    pub home_team: Team,
    pub visitor_team: Team,
}

const REQUIRED_GAME_KEYS: [&str; 3] = ["id", "home_team", "visitor_team"];

impl ApiGame {
    /// Validates a single-game payload.
    ///
    /// Accepts the bare object or one wrapped in a `data` envelope. Anything
    /// that is not an object carrying `id`, `home_team` and `visitor_team`, or
    /// that does not deserialize cleanly, yields `None`.
    pub fn from_payload(payload: Value) -> Option<ApiGame> {
        let payload = match payload {
            Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
                map.remove("data")?
            }
            other => other,
        };

        let object = payload.as_object()?;
        if REQUIRED_GAME_KEYS.iter().any(|k| !object.contains_key(*k)) {
            return None;
        }

        serde_json::from_value(payload).ok()
    }

    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team.id == team_id || self.visitor_team.id == team_id
    }

    /// Calendar day of the game, dropping any time component.
    pub fn game_day(&self) -> Result<Option<NaiveDate>, AppError> {
        let Some(raw) = self.date.as_deref() else {
            return Ok(None);
        };
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| {
                AppError::malformed_record(
                    "game",
                    format!("bad date {raw:?} (id={}): {e}", self.id),
                )
            })
    }

    /// Normalizes into the stored row shape.
    pub fn to_record(&self) -> Result<Game, AppError> {
        Ok(Game {
            id: self.id,
            date: self.game_day()?,
            season: self.season,
            period: self.period,
            status: self.status.clone(),
            postseason: self.postseason.unwrap_or(false),
            home_team_id: self.home_team.id,
            home_team_name: self.home_team.full_name.clone(),
            home_team_score: self.home_team_score,
            visitor_team_id: self.visitor_team.id,
            visitor_team_name: self.visitor_team.full_name.clone(),
            visitor_team_score: self.visitor_team_score,
        })
    }
}

/// A game as persisted in and read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "game_id")]
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub season: Option<i32>,
    pub period: Option<i32>,
    pub status: Option<String>,
    pub postseason: bool,
    pub home_team_id: i64,
    pub home_team_name: String,
    pub home_team_score: Option<i32>,
    pub visitor_team_id: i64,
    pub visitor_team_name: String,
    pub visitor_team_score: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "id": 1001,
            "date": "2025-04-01",
            "season": 2024,
            "period": 4,
            "status": "Final",
            "postseason": false,
            "home_team_score": 110,
            "visitor_team_score": 95,
            "home_team": {"id": 2, "abbreviation": "BOS", "full_name": "Boston Celtics"},
            "visitor_team": {"id": 14, "abbreviation": "LAL", "full_name": "Los Angeles Lakers"}
        })
    }

    #[test]
    fn test_from_payload_bare_object() {
        let game = ApiGame::from_payload(sample_payload()).unwrap();
        assert_eq!(game.id, 1001);
        assert_eq!(game.home_team.id, 2);
        assert_eq!(game.visitor_team.abbreviation, "LAL");
    }

    #[test]
    fn test_from_payload_data_envelope() {
        let game = ApiGame::from_payload(json!({ "data": sample_payload() })).unwrap();
        assert_eq!(game.id, 1001);
    }

    #[test]
    fn test_from_payload_minimal_shape() {
        let game = ApiGame::from_payload(json!({
            "id": 777,
            "home_team": {"id": 1},
            "visitor_team": {"id": 2}
        }))
        .unwrap();
        assert_eq!(game.id, 777);
        assert_eq!(game.date, None);
        assert_eq!(game.home_team_score, None);
    }

    #[test]
    fn test_from_payload_rejects_missing_keys() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("home_team");
        assert!(ApiGame::from_payload(payload).is_none());

        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("id");
        assert!(ApiGame::from_payload(payload).is_none());
    }

    #[test]
    fn test_from_payload_rejects_non_objects() {
        assert!(ApiGame::from_payload(Value::Null).is_none());
        assert!(ApiGame::from_payload(json!([1, 2, 3])).is_none());
        assert!(ApiGame::from_payload(json!("game")).is_none());
        // data envelope that is not an object is not unwrapped
        assert!(ApiGame::from_payload(json!({"data": []})).is_none());
    }

    #[test]
    fn test_from_payload_rejects_wrong_types() {
        assert!(
            ApiGame::from_payload(json!({
                "id": "not-a-number",
                "home_team": {"id": 1},
                "visitor_team": {"id": 2}
            }))
            .is_none()
        );
    }

    #[test]
    fn test_to_record_truncates_timestamp_date() {
        let mut game = ApiGame::from_payload(sample_payload()).unwrap();
        game.date = Some("2025-04-01T00:00:00.000Z".to_string());

        let record = game.to_record().unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(record.home_team_name, "Boston Celtics");
        assert_eq!(record.visitor_team_name, "Los Angeles Lakers");
        assert_eq!(record.home_team_score, Some(110));
        assert!(!record.postseason);
    }

    #[test]
    fn test_to_record_rejects_bad_date() {
        let mut game = ApiGame::from_payload(sample_payload()).unwrap();
        game.date = Some("April first".to_string());
        let err = game.to_record().unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { .. }));
    }

    #[test]
    fn test_game_serializes_id_as_game_id() {
        let record = ApiGame::from_payload(sample_payload())
            .unwrap()
            .to_record()
            .unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["game_id"], 1001);
        assert_eq!(value["date"], "2025-04-01");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_involves() {
        let game = ApiGame::from_payload(sample_payload()).unwrap();
        assert!(game.involves(2));
        assert!(game.involves(14));
        assert!(!game.involves(3));
    }
}
