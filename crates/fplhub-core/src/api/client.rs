//! API client for the Fantasy Premier League REST API.
//!
//! Large datasets go through the local store: the bootstrap snapshot is
//! gated on the upstream `last_updated` marker and the players, teams and
//! gameweeks tables derived from it are reused for as long as the snapshot
//! they were built from is current.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::cache::{cached_fetch_probed, CachedValue, LocalStore, Table, DEFAULT_TTL};
use crate::config::Config;
use crate::models::{
    fixture_difficulties, gameweeks_from_bootstrap, players_from_bootstrap, teams_from_bootstrap,
    Fixture, FixtureDifficulty, Gameweek, Player, PlayerSummary, Team,
};

use super::retry::RetryPolicy;
use super::transport::{HttpTransport, Transport, REQUEST_TIMEOUT_SECS};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the public FPL API
pub const API_BASE_URL: &str = "https://fantasy.premierleague.com/api";

const BOOTSTRAP_ENDPOINT: &str = "bootstrap-static";
const FIXTURES_ENDPOINT: &str = "fixtures";

/// Store keys. The derived tables carry the bootstrap key's timestamp.
pub const BOOTSTRAP_KEY: &str = "bootstrap_static_data";
pub const PLAYERS_KEY: &str = "players_df";
pub const TEAMS_KEY: &str = "teams_df";
pub const GAMEWEEKS_KEY: &str = "gameweeks_df";

/// Network side of the client: everything needed to issue a request.
struct Remote<T> {
    transport: T,
    base_url: String,
    retry: RetryPolicy,
}

impl<T: Transport> Remote<T> {
    fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        let url = format!("{}/{}/", self.base_url.trim_end_matches('/'), endpoint);
        self.retry.run(endpoint, |attempt| {
            debug!(url = %url, attempt, "GET");
            self.transport.get_json(&url)
        })
    }

    fn bootstrap_timestamp(&self) -> Result<String> {
        let snapshot = self
            .get(BOOTSTRAP_ENDPOINT)
            .context("Failed to probe bootstrap snapshot")?;
        Ok(bootstrap_timestamp(&snapshot))
    }
}

/// Freshness marker of a bootstrap snapshot: `last_updated` when upstream
/// provides it, otherwise a digest of the first player record.
pub fn bootstrap_timestamp(snapshot: &Value) -> String {
    if let Some(ts) = snapshot
        .get("last_updated")
        .and_then(Value::as_str)
        .filter(|ts| !ts.is_empty())
    {
        return ts.to_string();
    }

    let first: Vec<Value> = snapshot
        .get("elements")
        .and_then(Value::as_array)
        .map(|elements| elements.iter().take(1).cloned().collect())
        .unwrap_or_default();
    let serialized = Value::Array(first).to_string();
    hex::encode(Sha256::digest(serialized.as_bytes()))
}

/// FPL API client.
///
/// `store` is `None` when caching is disabled, in which case every call goes
/// straight to the transport.
pub struct ApiClient<T: Transport = HttpTransport> {
    remote: Remote<T>,
    store: Option<LocalStore>,
    ttl: Duration,
}

impl ApiClient<HttpTransport> {
    /// Create a client against the public API with default settings.
    pub fn new(store: Option<LocalStore>) -> Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(REQUEST_TIMEOUT_SECS))?;
        Ok(Self::with_transport(transport, store))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout())?;
        let store = if config.use_cache {
            Some(LocalStore::open(config.cache_dir()?)?)
        } else {
            None
        };

        Ok(Self::with_transport(transport, store)
            .with_base_url(config.api_base_url.clone())
            .with_retry_policy(config.retry_policy())
            .with_ttl(config.ttl()))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, store: Option<LocalStore>) -> Self {
        Self {
            remote: Remote {
                transport,
                base_url: API_BASE_URL.to_string(),
                retry: RetryPolicy::default(),
            },
            store,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.remote.base_url = base_url.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.remote.retry = retry;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn transport(&self) -> &T {
        &self.remote.transport
    }

    pub fn store(&self) -> Option<&LocalStore> {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> Option<&mut LocalStore> {
        self.store.as_mut()
    }

    /// GET `<base_url>/<endpoint>/` with retries.
    pub fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.remote.get(endpoint)
    }

    // ========================================================================
    // Bootstrap snapshot and derived tables
    // ========================================================================

    /// Fetch the bootstrap snapshot (players, teams, gameweeks, positions).
    pub fn get_bootstrap_static(&mut self) -> Result<Value> {
        let remote = &self.remote;
        let Some(store) = self.store.as_mut() else {
            return remote
                .get(BOOTSTRAP_ENDPOINT)
                .context("Failed to fetch bootstrap snapshot");
        };

        let value = cached_fetch_probed(
            store,
            BOOTSTRAP_KEY,
            self.ttl,
            || {
                let snapshot = remote
                    .get(BOOTSTRAP_ENDPOINT)
                    .context("Failed to fetch bootstrap snapshot")?;
                Ok(CachedValue::Document(snapshot))
            },
            || remote.bootstrap_timestamp(),
        )?;

        value
            .into_document()
            .ok_or_else(|| anyhow!("Stored bootstrap snapshot is a table"))
    }

    pub fn get_players(&mut self) -> Result<Vec<Player>> {
        self.derived_table(PLAYERS_KEY, players_from_bootstrap)
    }

    pub fn get_teams(&mut self) -> Result<Vec<Team>> {
        self.derived_table(TEAMS_KEY, teams_from_bootstrap)
    }

    pub fn get_gameweeks(&mut self) -> Result<Vec<Gameweek>> {
        self.derived_table(GAMEWEEKS_KEY, gameweeks_from_bootstrap)
    }

    /// Serve the table stored under `key` when it was built from the
    /// snapshot the store currently holds, otherwise rebuild it.
    fn derived_table<R, B>(&mut self, key: &str, build: B) -> Result<Vec<R>>
    where
        R: Serialize + DeserializeOwned,
        B: FnOnce(&Value) -> Option<Vec<R>>,
    {
        if let Some(store) = self.store.as_ref() {
            let bootstrap_ts = store.get_upstream_timestamp(BOOTSTRAP_KEY);
            if bootstrap_ts.is_some() && bootstrap_ts == store.get_upstream_timestamp(key) {
                if let Some(CachedValue::Table(table)) = store.get(key)? {
                    match table.to_records() {
                        Ok(records) => {
                            debug!(key, rows = table.len(), "Derived table is current");
                            return Ok(records);
                        }
                        Err(e) => warn!(key, error = %e, "Stored table unreadable, rebuilding"),
                    }
                }
            }
        }

        let snapshot = self.get_bootstrap_static()?;
        let Some(records) = build(&snapshot) else {
            warn!(key, "Bootstrap snapshot has no data for table");
            return Ok(Vec::new());
        };

        if let Some(store) = self.store.as_mut() {
            let timestamp = store.get_upstream_timestamp(BOOTSTRAP_KEY).map(str::to_owned);
            let table = Table::from_records(&records)?;
            store
                .set(key, &CachedValue::Table(table), timestamp.as_deref())
                .with_context(|| format!("Failed to store derived table {}", key))?;
        }

        info!(key, rows = records.len(), "Rebuilt derived table");
        Ok(records)
    }

    // ========================================================================
    // Other endpoints
    // ========================================================================

    /// Per-gameweek history for one player.
    pub fn get_player_summary(&self, player_id: i64) -> Result<PlayerSummary> {
        let raw = self
            .get(&format!("element-summary/{}", player_id))
            .with_context(|| format!("Failed to fetch summary for player {}", player_id))?;
        serde_json::from_value(raw)
            .with_context(|| format!("Failed to parse summary for player {}", player_id))
    }

    pub fn get_team(&self, team_id: i64) -> Result<Value> {
        self.get(&format!("teams/{}", team_id))
            .with_context(|| format!("Failed to fetch team {}", team_id))
    }

    /// All fixtures, optionally narrowed to one team and/or one gameweek.
    pub fn get_fixtures(&self, team_id: Option<i64>, gameweek: Option<i64>) -> Result<Vec<Fixture>> {
        let raw = self
            .get(FIXTURES_ENDPOINT)
            .context("Failed to fetch fixtures")?;
        let items = match raw {
            Value::Array(items) => items,
            other => {
                return Err(ApiError::InvalidResponse(format!(
                    "fixtures: expected an array, got {}",
                    json_kind(&other)
                ))
                .into())
            }
        };

        let fixtures = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Fixture>(item) {
                Ok(fixture) => Some(fixture),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed fixture record");
                    None
                }
            })
            .filter(|f| team_id.map_or(true, |id| f.involves(id)))
            .filter(|f| gameweek.map_or(true, |gw| f.event == Some(gw)))
            .collect();

        Ok(fixtures)
    }

    /// Upcoming fixture difficulties for one team.
    pub fn get_fixtures_with_fdr(
        &mut self,
        team_id: i64,
        num_gameweeks: usize,
    ) -> Result<Vec<FixtureDifficulty>> {
        let fixtures = self.get_fixtures(Some(team_id), None)?;
        let teams = self.get_teams()?;
        Ok(fixture_difficulties(team_id, &fixtures, &teams, num_gameweeks))
    }

    /// Fixture difficulties for every team, fetching the fixture list once.
    pub fn get_all_fixtures_with_fdr(
        &mut self,
        num_gameweeks: usize,
    ) -> Result<Vec<(Team, Vec<FixtureDifficulty>)>> {
        let fixtures = self.get_fixtures(None, None)?;
        let teams = self.get_teams()?;

        Ok(teams
            .iter()
            .map(|team| {
                let own: Vec<Fixture> = fixtures
                    .iter()
                    .filter(|f| f.involves(team.id))
                    .cloned()
                    .collect();
                let rows = fixture_difficulties(team.id, &own, &teams, num_gameweeks);
                (team.clone(), rows)
            })
            .collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use serde_json::json;
    use tempfile::TempDir;

    /// Scripted transport: routes by URL path, counts requests, can fail a
    /// number of times before answering, and can go down after a number of
    /// answers.
    #[derive(Default)]
    struct FakeTransport {
        routes: RefCell<HashMap<String, Value>>,
        calls: RefCell<Vec<String>>,
        failures_left: Cell<u32>,
        answers_left: Cell<Option<u32>>,
    }

    impl FakeTransport {
        fn route(&self, endpoint: &str, body: Value) {
            self.routes
                .borrow_mut()
                .insert(format!("{}/{}/", BASE, endpoint), body);
        }

        fn calls_to(&self, endpoint: &str) -> usize {
            let url = format!("{}/{}/", BASE, endpoint);
            self.calls.borrow().iter().filter(|u| **u == url).count()
        }

        fn total_calls(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Transport for FakeTransport {
        fn get_json(&self, url: &str) -> Result<Value, ApiError> {
            self.calls.borrow_mut().push(url.to_string());
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(ApiError::ServerError("503: unavailable".to_string()));
            }
            match self.answers_left.get() {
                Some(0) => return Err(ApiError::ServerError("503: unavailable".to_string())),
                Some(n) => self.answers_left.set(Some(n - 1)),
                None => {}
            }
            self.routes
                .borrow()
                .get(url)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(url.to_string()))
        }
    }

    const BASE: &str = "http://fpl.test/api";

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::ZERO,
        }
    }

    fn snapshot(last_updated: &str) -> Value {
        json!({
            "last_updated": last_updated,
            "elements": [
                {"id": 1, "web_name": "Saka", "team": 1, "element_type": 3, "now_cost": 100, "total_points": 180},
                {"id": 2, "web_name": "Salah", "team": 2, "element_type": 3, "now_cost": 130, "total_points": 210},
            ],
            "teams": [
                {"id": 1, "name": "Arsenal", "short_name": "ARS"},
                {"id": 2, "name": "Liverpool", "short_name": "LIV"},
                {"id": 3, "name": "Chelsea", "short_name": "CHE"},
            ],
            "element_types": [{"id": 3, "singular_name": "Midfielder"}],
            "events": [{"id": 1, "is_current": true}, {"id": 2, "is_next": true}],
        })
    }

    fn fixtures() -> Value {
        json!([
            {"id": 10, "event": 1, "team_h": 1, "team_a": 2, "team_h_difficulty": 4, "team_a_difficulty": 4},
            {"id": 11, "event": 2, "team_h": 3, "team_a": 1, "team_h_difficulty": 2, "team_a_difficulty": 3},
            {"id": 12, "event": 2, "team_h": 2, "team_a": 3, "team_h_difficulty": 2, "team_a_difficulty": 5},
            {"id": 13, "event": null, "team_h": 1, "team_a": 3},
        ])
    }

    fn cached_client<'a>(fake: &'a FakeTransport, dir: &TempDir) -> ApiClient<&'a FakeTransport> {
        let store = LocalStore::open(dir.path()).expect("store opens");
        ApiClient::with_transport(fake, Some(store))
            .with_base_url(BASE)
            .with_retry_policy(no_wait())
    }

    fn uncached_client(fake: &FakeTransport) -> ApiClient<&FakeTransport> {
        ApiClient::with_transport(fake, None)
            .with_base_url(BASE)
            .with_retry_policy(no_wait())
    }

    #[test]
    fn test_get_builds_url_with_trailing_slash() {
        let fake = FakeTransport::default();
        fake.route("teams/3", json!({"id": 3}));
        let client = uncached_client(&fake).with_base_url(format!("{}/", BASE));

        assert_eq!(client.get_team(3).expect("team"), json!({"id": 3}));
        assert_eq!(fake.calls.borrow()[0], "http://fpl.test/api/teams/3/");
    }

    #[test]
    fn test_retries_then_succeeds() {
        let fake = FakeTransport::default();
        fake.route("teams/1", json!({"id": 1}));
        fake.failures_left.set(2);
        let client = uncached_client(&fake);

        assert_eq!(client.get_team(1).expect("third attempt"), json!({"id": 1}));
        assert_eq!(fake.total_calls(), 3);
    }

    #[test]
    fn test_gives_up_after_three_attempts() {
        let fake = FakeTransport::default();
        fake.failures_left.set(10);
        let client = uncached_client(&fake);

        assert!(client.get("bootstrap-static").is_err());
        assert_eq!(fake.total_calls(), 3);
    }

    #[test]
    fn test_bootstrap_reused_while_upstream_unchanged() {
        let dir = TempDir::new().expect("temp dir");
        let fake = FakeTransport::default();
        fake.route(BOOTSTRAP_ENDPOINT, snapshot("2024-08-16T10:00:00Z"));
        let mut client = cached_client(&fake, &dir);

        let first = client.get_bootstrap_static().expect("fetch");
        // Fetch plus the probe that records the timestamp
        assert_eq!(fake.calls_to(BOOTSTRAP_ENDPOINT), 2);

        let second = client.get_bootstrap_static().expect("reuse");
        assert_eq!(first, second);
        // Only the probe
        assert_eq!(fake.calls_to(BOOTSTRAP_ENDPOINT), 3);
        assert_eq!(
            client.store().and_then(|s| s.get_upstream_timestamp(BOOTSTRAP_KEY)),
            Some("2024-08-16T10:00:00Z")
        );
    }

    #[test]
    fn test_bootstrap_refetched_when_upstream_changes() {
        let dir = TempDir::new().expect("temp dir");
        let fake = FakeTransport::default();
        fake.route(BOOTSTRAP_ENDPOINT, snapshot("v1"));
        let mut client = cached_client(&fake, &dir);
        client.get_bootstrap_static().expect("fetch");

        fake.route(BOOTSTRAP_ENDPOINT, snapshot("v2"));
        let refreshed = client.get_bootstrap_static().expect("refetch");

        assert_eq!(refreshed["last_updated"], json!("v2"));
        assert_eq!(
            client.store().and_then(|s| s.get_upstream_timestamp(BOOTSTRAP_KEY)),
            Some("v2")
        );
    }

    #[test]
    fn test_derived_tables_reused_without_network() {
        let dir = TempDir::new().expect("temp dir");
        let fake = FakeTransport::default();
        fake.route(BOOTSTRAP_ENDPOINT, snapshot("v1"));
        let mut client = cached_client(&fake, &dir);

        let players = client.get_players().expect("players");
        assert_eq!(players.len(), 2);
        assert_eq!(players[1].team_name.as_deref(), Some("Liverpool"));
        assert_eq!(players[1].price, 13.0);

        let before = fake.total_calls();
        let again = client.get_players().expect("players again");
        assert_eq!(again, players);
        assert_eq!(fake.total_calls(), before);

        let store = client.store().expect("cached client");
        assert_eq!(store.get_upstream_timestamp(PLAYERS_KEY), Some("v1"));
    }

    #[test]
    fn test_derived_table_rebuilt_after_snapshot_changes() {
        let dir = TempDir::new().expect("temp dir");
        let fake = FakeTransport::default();
        fake.route(BOOTSTRAP_ENDPOINT, snapshot("v1"));
        let mut client = cached_client(&fake, &dir);
        client.get_teams().expect("teams");

        let mut changed = snapshot("v2");
        changed["teams"] = json!([{"id": 1, "name": "Arsenal ", "short_name": "ARS"}]);
        fake.route(BOOTSTRAP_ENDPOINT, changed);
        // Refreshing the snapshot moves the bootstrap timestamp past the table's
        client.get_bootstrap_static().expect("refetch");

        let teams = client.get_teams().expect("rebuilt");
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Arsenal");
        assert_eq!(
            client.store().and_then(|s| s.get_upstream_timestamp(TEAMS_KEY)),
            Some("v2")
        );
    }

    #[test]
    fn test_derived_table_rebuilt_when_snapshot_has_no_timestamp() {
        let dir = TempDir::new().expect("temp dir");
        let fake = FakeTransport::default();
        fake.route(BOOTSTRAP_ENDPOINT, snapshot("v1"));
        // The snapshot fetch is answered, every timestamp lookup after it fails
        fake.answers_left.set(Some(1));
        let mut client = cached_client(&fake, &dir);

        let players = client.get_players().expect("players");
        assert_eq!(players.len(), 2);
        let store = client.store().expect("cached client");
        assert_eq!(store.get_upstream_timestamp(BOOTSTRAP_KEY), None);
        assert_eq!(store.get_upstream_timestamp(PLAYERS_KEY), None);

        let before = fake.total_calls();
        let again = client.get_players().expect("rebuilt from stored snapshot");
        assert_eq!(again, players);
        assert!(fake.total_calls() > before);
        // Snapshot itself is served from the store within the TTL
        assert_eq!(fake.calls_to(BOOTSTRAP_ENDPOINT), fake.total_calls());
    }

    #[test]
    fn test_missing_array_gives_empty_table_without_storing() {
        let dir = TempDir::new().expect("temp dir");
        let fake = FakeTransport::default();
        fake.route(BOOTSTRAP_ENDPOINT, json!({"last_updated": "v1", "elements": []}));
        let mut client = cached_client(&fake, &dir);

        assert!(client.get_gameweeks().expect("empty").is_empty());
        let store = client.store().expect("cached client");
        assert!(store.get(GAMEWEEKS_KEY).expect("readable").is_none());
    }

    #[test]
    fn test_uncached_client_always_hits_network() {
        let fake = FakeTransport::default();
        fake.route(BOOTSTRAP_ENDPOINT, snapshot("v1"));
        let mut client = uncached_client(&fake);

        client.get_gameweeks().expect("first");
        client.get_gameweeks().expect("second");
        assert_eq!(fake.calls_to(BOOTSTRAP_ENDPOINT), 2);
    }

    #[test]
    fn test_timestamp_falls_back_to_first_element_digest() {
        let a = json!({"elements": [{"id": 1}, {"id": 2}]});
        let b = json!({"elements": [{"id": 1}, {"id": 3}]});
        let c = json!({"elements": [{"id": 4}]});

        assert_eq!(bootstrap_timestamp(&a), bootstrap_timestamp(&b));
        assert_ne!(bootstrap_timestamp(&a), bootstrap_timestamp(&c));
        assert_eq!(bootstrap_timestamp(&a).len(), 64);
        assert_eq!(bootstrap_timestamp(&json!({"last_updated": "x"})), "x");
        // No elements hashes the empty array
        assert_eq!(
            bootstrap_timestamp(&json!({})),
            hex::encode(Sha256::digest(b"[]"))
        );
    }

    #[test]
    fn test_fixture_filters() {
        let fake = FakeTransport::default();
        fake.route(FIXTURES_ENDPOINT, fixtures());
        let client = uncached_client(&fake);

        assert_eq!(client.get_fixtures(None, None).expect("all").len(), 4);
        let arsenal = client.get_fixtures(Some(1), None).expect("team");
        assert_eq!(arsenal.iter().map(|f| f.id).collect::<Vec<_>>(), vec![10, 11, 13]);
        let gw2 = client.get_fixtures(None, Some(2)).expect("gameweek");
        assert_eq!(gw2.iter().map(|f| f.id).collect::<Vec<_>>(), vec![11, 12]);
        let both = client.get_fixtures(Some(1), Some(2)).expect("both");
        assert_eq!(both.len(), 1);
    }

    #[test]
    fn test_fixtures_must_be_an_array() {
        let fake = FakeTransport::default();
        fake.route(FIXTURES_ENDPOINT, json!({"detail": "nope"}));
        let client = uncached_client(&fake);
        assert!(client.get_fixtures(None, None).is_err());
    }

    #[test]
    fn test_fixtures_with_fdr() {
        let fake = FakeTransport::default();
        fake.route(FIXTURES_ENDPOINT, fixtures());
        fake.route(BOOTSTRAP_ENDPOINT, snapshot("v1"));
        let mut client = uncached_client(&fake);

        let rows = client.get_fixtures_with_fdr(1, 5).expect("fdr");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].opponent, "LIV");
        assert_eq!(rows[1].opponent, "CHE");
        assert_eq!(rows[1].difficulty, 2);
    }

    #[test]
    fn test_all_fixtures_with_fdr_fetches_fixtures_once() {
        let fake = FakeTransport::default();
        fake.route(FIXTURES_ENDPOINT, fixtures());
        fake.route(BOOTSTRAP_ENDPOINT, snapshot("v1"));
        let mut client = uncached_client(&fake);

        let all = client.get_all_fixtures_with_fdr(5).expect("all teams");
        assert_eq!(all.len(), 3);
        assert_eq!(fake.calls_to(FIXTURES_ENDPOINT), 1);
        assert_eq!(all[1].0.short_name, "LIV");
        assert_eq!(all[1].1.len(), 2);
    }

    #[test]
    fn test_player_summary() {
        let fake = FakeTransport::default();
        fake.route(
            "element-summary/7",
            json!({"history": [{"round": 1, "total_points": 6}, {"round": 2, "total_points": 2}]}),
        );
        let client = uncached_client(&fake);

        let summary = client.get_player_summary(7).expect("summary");
        assert_eq!(summary.recent(1)[0].round, 2);
        assert!(client.get_player_summary(8).is_err());
    }
}
