use super::null_as_empty;
use serde::{Deserialize, Serialize};

/// A franchise as reported by the upstream `/teams` endpoint.
///
/// Also used for the nested `home_team`/`visitor_team` objects inside game
/// payloads, where only `id` is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub abbreviation: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city: String,
    /// Nickname, e.g. "Celtics"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conference: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub division: String,
}

impl Team {
    /// Strings a caller may use to look this team up: id, abbreviation,
    /// nickname, city and full name, in that order.
    pub fn identifying_strings(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.abbreviation.clone(),
            self.name.clone(),
            self.city.clone(),
            self.full_name.clone(),
        ]
    }

    /// Full name, falling back to the nickname and then the numeric id.
    pub fn display_name(&self) -> String {
        if !self.full_name.is_empty() {
            self.full_name.clone()
        } else if !self.name.is_empty() {
            self.name.clone()
        } else {
            self.id.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_deserialization_full() {
        let json = r#"{
            "id": 2,
            "abbreviation": "BOS",
            "city": "Boston",
            "conference": "East",
            "division": "Atlantic",
            "full_name": "Boston Celtics",
            "name": "Celtics"
        }"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert_eq!(team.id, 2);
        assert_eq!(team.abbreviation, "BOS");
        assert_eq!(team.full_name, "Boston Celtics");
        assert_eq!(team.division, "Atlantic");
    }

    #[test]
    fn test_team_deserialization_sparse_and_null() {
        let team: Team = serde_json::from_str(r#"{"id": 7, "conference": null}"#).unwrap();
        assert_eq!(team.id, 7);
        assert_eq!(team.conference, "");
        assert_eq!(team.city, "");
    }

    #[test]
    fn test_team_without_id_rejected() {
        let result: Result<Team, _> = serde_json::from_str(r#"{"abbreviation": "BOS"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut team = Team {
            id: 14,
            name: "Lakers".to_string(),
            full_name: "Los Angeles Lakers".to_string(),
            ..Team::default()
        };
        assert_eq!(team.display_name(), "Los Angeles Lakers");

        team.full_name.clear();
        assert_eq!(team.display_name(), "Lakers");

        team.name.clear();
        assert_eq!(team.display_name(), "14");
    }
}
