use crate::config::Config;
use crate::data_fetcher::api::{BallDontLieClient, RetryPolicy, create_http_client_with_timeout};
use crate::data_fetcher::models::{ApiGame, Team};
use serde_json::{Value, json};
use std::time::Duration;

/// Test utilities for creating mock data and testing scenarios
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Creates a team whose full name is "{city} {nickname}"
    pub fn team(id: i64, abbreviation: &str, city: &str, nickname: &str) -> Team {
        Team {
            id,
            abbreviation: abbreviation.to_string(),
            city: city.to_string(),
            name: nickname.to_string(),
            full_name: format!("{city} {nickname}"),
            conference: "East".to_string(),
            division: "Atlantic".to_string(),
        }
    }

    /// Wraps teams in the upstream `/teams` envelope
    pub fn teams_payload(teams: &[Team]) -> Value {
        json!({ "data": teams })
    }

    /// Upstream game JSON. Sides are `(team_id, score)`.
    pub fn game_json(id: i64, date: &str, home: (i64, i32), visitor: (i64, i32)) -> Value {
        json!({
            "id": id,
            "date": date,
            "season": 2024,
            "period": 4,
            "status": "Final",
            "postseason": false,
            "home_team_score": home.1,
            "visitor_team_score": visitor.1,
            "home_team": {"id": home.0, "full_name": format!("Team {}", home.0)},
            "visitor_team": {"id": visitor.0, "full_name": format!("Team {}", visitor.0)}
        })
    }

    pub fn api_game(id: i64, date: &str, home: (i64, i32), visitor: (i64, i32)) -> ApiGame {
        serde_json::from_value(Self::game_json(id, date, home, visitor))
            .expect("game fixture should deserialize")
    }

    /// Configuration pointed at a mock upstream with near-zero retry delays
    pub fn config(server_uri: &str) -> Config {
        Config {
            api_base_url: server_uri.to_string(),
            api_key: Some("test-key".to_string()),
            retry_base_delay_ms: 1,
            ..Config::default()
        }
    }

    /// Client for a mock upstream, sending `test-key` and retrying quickly
    pub fn client(server_uri: &str) -> BallDontLieClient {
        let http = create_http_client_with_timeout(5, "test-key")
            .expect("test HTTP client should build");
        BallDontLieClient::with_client(
            http,
            server_uri,
            RetryPolicy {
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(4),
                ..RetryPolicy::default()
            },
        )
    }
}
