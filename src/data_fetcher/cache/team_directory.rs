//! Process-wide team directory with an inverted search index
//!
//! Teams are loaded once, from the store when it has rows and from the
//! upstream API otherwise. After that the index is read-only for the life of
//! the process and handed out as an immutable `Arc<TeamIndex>` snapshot.

use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::constants::resolve::PARTIAL_MATCH_CAP;
use crate::data_fetcher::api::BallDontLieClient;
use crate::data_fetcher::models::Team;
use crate::error::AppError;
use crate::storage::Database;

/// Immutable lookup structure built from a complete team set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TeamIndex {
    teams: BTreeMap<i64, Team>,
    /// Lower-cased, trimmed identifying string -> team ids carrying it.
    /// Ordered, so partial-match scans visit tokens lexicographically.
    tokens: BTreeMap<String, BTreeSet<i64>>,
}

impl TeamIndex {
    pub fn build(teams: impl IntoIterator<Item = Team>) -> Self {
        let mut index = TeamIndex::default();
        for team in teams {
            for raw in team.identifying_strings() {
                let token = raw.trim().to_lowercase();
                if token.is_empty() {
                    continue;
                }
                index.tokens.entry(token).or_default().insert(team.id);
            }
            index.teams.insert(team.id, team);
        }
        index
    }

    /// Resolves a free-text query to an ascending list of team ids.
    ///
    /// - blank or absent query: nothing
    /// - integer: that id if known, no fuzzy fallback
    /// - exact token hit: every id under that token
    /// - otherwise the union of ids whose tokens contain the query, scanning
    ///   stops once `PARTIAL_MATCH_CAP` distinct ids have been collected
    pub fn resolve(&self, query: Option<&str>) -> Vec<i64> {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Vec::new();
        };

        if let Ok(id) = query.parse::<i64>() {
            return if self.teams.contains_key(&id) {
                vec![id]
            } else {
                Vec::new()
            };
        }

        let needle = query.to_lowercase();
        if let Some(ids) = self.tokens.get(&needle) {
            return ids.iter().copied().collect();
        }

        let mut hits = BTreeSet::new();
        for (token, ids) in &self.tokens {
            if token.contains(&needle) {
                hits.extend(ids.iter().copied());
                if hits.len() >= PARTIAL_MATCH_CAP {
                    break;
                }
            }
        }
        hits.into_iter().collect()
    }

    pub fn get(&self, team_id: i64) -> Option<&Team> {
        self.teams.get(&team_id)
    }

    /// Display name for a team id, falling back to the id itself.
    pub fn display_name(&self, team_id: i64) -> String {
        self.get(team_id)
            .map(Team::display_name)
            .unwrap_or_else(|| team_id.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }
}

/// Lazily populated, shared team directory.
///
/// Concurrent first callers serialize on `init_lock`; exactly one of them
/// runs the load sequence and the rest observe its published snapshot.
pub struct TeamDirectory {
    db: Arc<Database>,
    source: BallDontLieClient,
    index: OnceCell<Arc<TeamIndex>>,
    init_lock: Mutex<()>,
}

impl TeamDirectory {
    pub fn new(db: Arc<Database>, source: BallDontLieClient) -> Self {
        TeamDirectory {
            db,
            source,
            index: OnceCell::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Makes sure the directory is populated and returns the snapshot.
    ///
    /// A no-op once a non-empty index has been published. An empty result
    /// (empty store and empty upstream listing) is returned but not kept,
    /// so the next call tries again.
    #[instrument(skip(self))]
    pub async fn ensure_loaded(&self) -> Result<Arc<TeamIndex>, AppError> {
        if let Some(index) = self.index.get() {
            return Ok(Arc::clone(index));
        }

        let _guard = self.init_lock.lock().await;
        if let Some(index) = self.index.get() {
            debug!("Team directory populated while waiting for init lock");
            return Ok(Arc::clone(index));
        }

        let mut teams = self.db.run(|db| db.all_teams()).await?;
        if teams.is_empty() {
            info!("Team table empty, fetching teams from upstream");
            let fetched = self.source.list_teams().await?;
            if fetched.is_empty() {
                warn!("Upstream returned no teams; directory left unpopulated");
                return Ok(Arc::new(TeamIndex::default()));
            }
            teams = self
                .db
                .run(move |db| {
                    db.upsert_teams(&fetched)?;
                    Ok(fetched)
                })
                .await?;
        }

        let index = Arc::new(TeamIndex::build(teams));
        info!("Team directory loaded with {} teams", index.len());
        // Only this task writes while holding the lock, so set cannot fail
        let _ = self.index.set(Arc::clone(&index));
        Ok(index)
    }

    /// Loads the directory if needed, then resolves `query`.
    pub async fn resolve(&self, query: Option<&str>) -> Result<Vec<i64>, AppError> {
        let index = self.ensure_loaded().await?;
        let ids = index.resolve(query);
        debug!("Resolved team query {:?} to {:?}", query, ids);
        Ok(ids)
    }

    /// Current snapshot without triggering a load.
    pub fn snapshot(&self) -> Option<Arc<TeamIndex>> {
        self.index.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::TestDataBuilder;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn nba_sample() -> Vec<Team> {
        vec![
            TestDataBuilder::team(1, "ATL", "Atlanta", "Hawks"),
            TestDataBuilder::team(2, "BOS", "Boston", "Celtics"),
            TestDataBuilder::team(3, "BKN", "Brooklyn", "Nets"),
            TestDataBuilder::team(13, "LAC", "LA", "Clippers"),
            TestDataBuilder::team(14, "LAL", "Los Angeles", "Lakers"),
        ]
    }

    #[test]
    fn test_resolve_by_id_exact_only() {
        let index = TeamIndex::build(nba_sample());
        for team in nba_sample() {
            assert_eq!(index.resolve(Some(&team.id.to_string())), vec![team.id]);
        }
        assert!(index.resolve(Some("99")).is_empty());
        // "1" is a substring of "13" and "14" but ids never fall back to fuzzy
        assert_eq!(index.resolve(Some("1")), vec![1]);
        assert_eq!(index.resolve(Some(" 2 ")), vec![2]);
    }

    #[test]
    fn test_resolve_full_name_case_insensitive() {
        let index = TeamIndex::build(nba_sample());
        for team in nba_sample() {
            let ids = index.resolve(Some(&team.full_name.to_lowercase()));
            assert!(ids.contains(&team.id), "{} not resolved", team.full_name);
        }
        assert_eq!(index.resolve(Some("BOSTON CELTICS")), vec![2]);
        assert_eq!(index.resolve(Some("bos")), vec![2]);
    }

    #[test]
    fn test_resolve_empty_and_absent() {
        let index = TeamIndex::build(nba_sample());
        assert!(index.resolve(None).is_empty());
        assert!(index.resolve(Some("")).is_empty());
        assert!(index.resolve(Some("   ")).is_empty());
    }

    #[test]
    fn test_resolve_exact_token_short_circuits() {
        let mut teams = nba_sample();
        // Two franchises sharing a city
        teams.push(TestDataBuilder::team(40, "LAX", "LA", "Expansion"));
        let index = TeamIndex::build(teams);
        assert_eq!(index.resolve(Some("la")), vec![13, 40]);
    }

    #[test]
    fn test_resolve_partial_match_unions() {
        let index = TeamIndex::build(nba_sample());
        assert_eq!(index.resolve(Some("lak")), vec![14]);
        assert_eq!(index.resolve(Some("bo")), vec![2]);
        // atlanta, los angeles
        assert_eq!(index.resolve(Some("an")), vec![1, 14]);
    }

    #[test]
    fn test_resolve_partial_match_cap() {
        // Distinct cities, so each matching token contributes one new id
        let teams: Vec<Team> = (1..=20)
            .map(|id| {
                TestDataBuilder::team(
                    id,
                    &format!("T{id:02}"),
                    &format!("Springfield {id:02}"),
                    &format!("Team{id:02}"),
                )
            })
            .collect();
        let index = TeamIndex::build(teams);

        let ids = index.resolve(Some("springfield"));
        assert_eq!(ids, (1..=8).collect::<Vec<i64>>());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        // Lexicographic scan order makes the stopping point reproducible
        assert_eq!(ids, index.resolve(Some("SPRINGFIELD")));
    }

    #[test]
    fn test_index_skips_blank_strings() {
        let team = Team {
            id: 7,
            abbreviation: "  ".to_string(),
            ..Team::default()
        };
        let index = TeamIndex::build(vec![team]);
        assert_eq!(index.tokens.len(), 1);
        assert_eq!(index.display_name(7), "7");
        assert_eq!(index.display_name(8), "8");
    }

    #[tokio::test]
    async fn test_ensure_loaded_fetches_once_and_persists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::teams_payload(&nba_sample())),
            )
            .expect(1)
            .mount(&server)
            .await;

        let db = Arc::new(Database::in_memory().unwrap());
        let directory = TeamDirectory::new(Arc::clone(&db), TestDataBuilder::client(&server.uri()));

        assert!(directory.snapshot().is_none());
        let first = directory.ensure_loaded().await.unwrap();
        let second = directory.ensure_loaded().await.unwrap();

        assert_eq!(first.len(), 5);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(db.all_teams().unwrap().len(), 5);
        assert_eq!(directory.resolve(Some("BOS")).await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_ensure_loaded_prefers_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let db = Arc::new(Database::in_memory().unwrap());
        db.upsert_teams(&nba_sample()).unwrap();
        let directory = TeamDirectory::new(db, TestDataBuilder::client(&server.uri()));

        let index = directory.ensure_loaded().await.unwrap();
        assert_eq!(index.len(), 5);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_loads_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::teams_payload(&nba_sample()))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let db = Arc::new(Database::in_memory().unwrap());
        let directory = Arc::new(TeamDirectory::new(db, TestDataBuilder::client(&server.uri())));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let directory = Arc::clone(&directory);
                tokio::spawn(async move { directory.ensure_loaded().await })
            })
            .collect();

        for handle in handles {
            let index = handle.await.unwrap().unwrap();
            assert_eq!(index.len(), 5);
        }
    }

    #[tokio::test]
    async fn test_empty_upstream_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .expect(2)
            .mount(&server)
            .await;

        let db = Arc::new(Database::in_memory().unwrap());
        let directory = TeamDirectory::new(db, TestDataBuilder::client(&server.uri()));

        assert!(directory.ensure_loaded().await.unwrap().is_empty());
        assert!(directory.resolve(Some("BOS")).await.unwrap().is_empty());
        assert!(directory.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let db = Arc::new(Database::in_memory().unwrap());
        let directory = TeamDirectory::new(db, TestDataBuilder::client(&server.uri()));
        let err = directory.ensure_loaded().await.unwrap_err();
        assert!(matches!(err, AppError::ApiClientError { status: 401, .. }));
    }
}
