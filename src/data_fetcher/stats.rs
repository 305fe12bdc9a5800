//! Per-team aggregate statistics over a date range, streamed as CSV
//!
//! Games come straight from upstream for every request; ranges are arbitrary
//! so nothing here touches the game cache.

use chrono::NaiveDate;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::data_fetcher::api::BallDontLieClient;
use crate::data_fetcher::cache::{TeamDirectory, TeamIndex};
use crate::data_fetcher::models::ApiGame;
use crate::error::AppError;

const BASE_COLUMNS: [&str; 5] = [
    "team_name",
    "team_id",
    "median_score",
    "win_pct",
    "games_played",
];

const SPLIT_COLUMNS: [&str; 6] = [
    "home_median_score",
    "home_win_pct",
    "home_games",
    "away_median_score",
    "away_win_pct",
    "away_games",
];

/// Median score, win rate and game count over one subset of games.
/// Both ratios are `None` when the subset is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitStats {
    pub median_score: Option<f64>,
    pub win_pct: Option<f64>,
    pub games: usize,
}

impl SplitStats {
    fn from_results(scores: &[i32], wins: &[u8]) -> Self {
        SplitStats {
            median_score: median(scores),
            win_pct: mean(wins),
            games: scores.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamAggregate {
    pub team_id: i64,
    pub overall: SplitStats,
    /// Present only when a home/away split was requested
    pub home_away: Option<(SplitStats, SplitStats)>,
}

/// Statistical median; the mean of the two middle values for even counts.
pub fn median(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0)
    } else {
        Some(f64::from(sorted[mid]))
    }
}

pub fn mean(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: f64 = values.iter().map(|&v| f64::from(v)).sum();
    Some(total / values.len() as f64)
}

/// Folds a team's games into aggregate figures.
///
/// Games the team did not play in are ignored. A game without both scores
/// is a malformed record and fails the whole aggregate.
pub fn aggregate_team(
    team_id: i64,
    games: &[ApiGame],
    split_home_away: bool,
) -> Result<TeamAggregate, AppError> {
    let mut scores = Vec::new();
    let mut wins = Vec::new();
    let (mut home_scores, mut home_wins) = (Vec::new(), Vec::new());
    let (mut away_scores, mut away_wins) = (Vec::new(), Vec::new());

    for game in games.iter().filter(|g| g.involves(team_id)) {
        let is_home = game.home_team.id == team_id;
        let (Some(home), Some(visitor)) = (game.home_team_score, game.visitor_team_score) else {
            return Err(AppError::malformed_record(
                "game",
                format!("missing score (id={})", game.id),
            ));
        };
        let (own, opponent) = if is_home { (home, visitor) } else { (visitor, home) };
        let won = u8::from(own > opponent);

        scores.push(own);
        wins.push(won);
        if is_home {
            home_scores.push(own);
            home_wins.push(won);
        } else {
            away_scores.push(own);
            away_wins.push(won);
        }
    }

    let home_away = split_home_away.then(|| {
        (
            SplitStats::from_results(&home_scores, &home_wins),
            SplitStats::from_results(&away_scores, &away_wins),
        )
    });

    Ok(TeamAggregate {
        team_id,
        overall: SplitStats::from_results(&scores, &wins),
        home_away,
    })
}

fn format_ratio(value: Option<f64>) -> String {
    // Debug keeps a trailing ".0" on whole numbers (110.0, 1.0)
    value.map(|v| format!("{v:?}")).unwrap_or_default()
}

/// Encodes one record as a CRLF-terminated CSV line.
fn encode_csv_row<I, T>(fields: I) -> Result<String, AppError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

pub fn csv_header(split_home_away: bool) -> Result<String, AppError> {
    let mut columns = BASE_COLUMNS.to_vec();
    if split_home_away {
        columns.extend(SPLIT_COLUMNS);
    }
    encode_csv_row(columns)
}

pub fn csv_row(team_name: &str, aggregate: &TeamAggregate) -> Result<String, AppError> {
    let overall = &aggregate.overall;
    let mut fields = vec![
        team_name.to_string(),
        aggregate.team_id.to_string(),
        format_ratio(overall.median_score),
        format_ratio(overall.win_pct),
        overall.games.to_string(),
    ];
    if let Some((home, away)) = &aggregate.home_away {
        for side in [home, away] {
            fields.push(format_ratio(side.median_score));
            fields.push(format_ratio(side.win_pct));
            fields.push(side.games.to_string());
        }
    }
    encode_csv_row(fields)
}

/// CSV lines for one response, header first.
pub type CsvStream = BoxStream<'static, Result<String, AppError>>;

/// Producer state for one CSV response.
struct RowProducer {
    source: BallDontLieClient,
    index: Arc<TeamIndex>,
    team_ids: std::vec::IntoIter<i64>,
    start: NaiveDate,
    end: NaiveDate,
    split_home_away: bool,
    header: Option<String>,
    failed: bool,
}

impl RowProducer {
    async fn row_for(&self, team_id: i64) -> Result<String, AppError> {
        let games = self
            .source
            .list_games_for_team_in_range(team_id, self.start, self.end)
            .await?;
        let aggregate = aggregate_team(team_id, &games, self.split_home_away)?;
        debug!(
            "Team {team_id}: {} games, median {:?}",
            aggregate.overall.games, aggregate.overall.median_score
        );
        csv_row(&self.index.display_name(team_id), &aggregate)
    }
}

/// Builds CSV responses of per-team aggregates.
#[derive(Clone)]
pub struct StatsAggregator {
    directory: Arc<TeamDirectory>,
    source: BallDontLieClient,
}

impl StatsAggregator {
    pub fn new(directory: Arc<TeamDirectory>, source: BallDontLieClient) -> Self {
        StatsAggregator { directory, source }
    }

    /// Resolves `team_query` and returns a lazy stream of CSV lines.
    ///
    /// The header is always the first item and is produced before any game
    /// fetch. Each resolved team then contributes one line, in resolution
    /// order, computed only when the stream is polled. A failure is yielded
    /// as the final item and ends the stream.
    #[instrument(skip(self))]
    pub async fn stream_team_stats_csv(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        team_query: Option<&str>,
        split_home_away: bool,
    ) -> Result<CsvStream, AppError> {
        let index = self.directory.ensure_loaded().await?;
        let team_ids = index.resolve(team_query);
        info!(
            "Streaming stats for {} teams from {start} to {end}",
            team_ids.len()
        );

        let producer = RowProducer {
            source: self.source.clone(),
            index,
            team_ids: team_ids.into_iter(),
            start,
            end,
            split_home_away,
            header: Some(csv_header(split_home_away)?),
            failed: false,
        };

        Ok(stream::unfold(producer, |mut producer| async move {
            if let Some(header) = producer.header.take() {
                return Some((Ok(header), producer));
            }
            if producer.failed {
                return None;
            }
            let team_id = producer.team_ids.next()?;
            match producer.row_for(team_id).await {
                Ok(row) => Some((Ok(row), producer)),
                Err(e) => {
                    warn!("Aborting stats stream at team {team_id}: {e}");
                    producer.failed = true;
                    Some((Err(e), producer))
                }
            }
        })
        .boxed())
    }
}
