//! URL building utilities for upstream API endpoints

use crate::constants::UPSTREAM_PAGE_SIZE;
use chrono::NaiveDate;

/// Builds the teams URL. The teams listing is small and not paginated.
///
/// # Example
/// ```
/// use courtside::data_fetcher::api::build_teams_url;
///
/// let url = build_teams_url("https://api.example.com/v1");
/// assert_eq!(url, "https://api.example.com/v1/teams");
/// ```
pub fn build_teams_url(api_base: &str) -> String {
    format!("{}/teams", api_base.trim_end_matches('/'))
}

/// Builds one page of the games-on-a-date listing.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use courtside::data_fetcher::api::build_games_by_date_url;
///
/// let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
/// let url = build_games_by_date_url("https://api.example.com/v1", date, 2);
/// assert_eq!(
///     url,
///     "https://api.example.com/v1/games?dates[]=2025-04-01&per_page=100&page=2"
/// );
/// ```
pub fn build_games_by_date_url(api_base: &str, date: NaiveDate, page: u32) -> String {
    format!(
        "{}/games?dates[]={}&per_page={UPSTREAM_PAGE_SIZE}&page={page}",
        api_base.trim_end_matches('/'),
        date.format("%Y-%m-%d")
    )
}

/// Builds a single-game URL.
///
/// # Example
/// ```
/// use courtside::data_fetcher::api::build_game_url;
///
/// let url = build_game_url("https://api.example.com/v1/", 12345);
/// assert_eq!(url, "https://api.example.com/v1/games/12345");
/// ```
pub fn build_game_url(api_base: &str, game_id: i64) -> String {
    format!("{}/games/{game_id}", api_base.trim_end_matches('/'))
}

/// Builds one page of a team's games within an inclusive date range.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use courtside::data_fetcher::api::build_team_games_url;
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
/// let url = build_team_games_url("https://api.example.com/v1", 2, start, end, 1);
/// assert_eq!(
///     url,
///     "https://api.example.com/v1/games?team_ids[]=2&start_date=2025-01-01&end_date=2025-01-31&per_page=100&page=1"
/// );
/// ```
pub fn build_team_games_url(
    api_base: &str,
    team_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    page: u32,
) -> String {
    format!(
        "{}/games?team_ids[]={team_id}&start_date={}&end_date={}&per_page={UPSTREAM_PAGE_SIZE}&page={page}",
        api_base.trim_end_matches('/'),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// Builds one page of the per-game player stats listing.
///
/// # Example
/// ```
/// use courtside::data_fetcher::api::build_player_stats_url;
///
/// let url = build_player_stats_url("https://api.example.com/v1", 1001, 1);
/// assert_eq!(
///     url,
///     "https://api.example.com/v1/stats?game_ids[]=1001&per_page=100&page=1"
/// );
/// ```
pub fn build_player_stats_url(api_base: &str, game_id: i64, page: u32) -> String {
    format!(
        "{}/stats?game_ids[]={game_id}&per_page={UPSTREAM_PAGE_SIZE}&page={page}",
        api_base.trim_end_matches('/')
    )
}
