//! Freshness-gated fetching on top of [`LocalStore`].
//!
//! Each call decides from scratch whether the stored copy of a dataset can be
//! served or the fetch has to run:
//!
//! - nothing stored: fetch
//! - probe available and it returns the recorded upstream timestamp: reuse
//! - no timestamp recorded for the key: reuse while the entry is younger
//!   than the TTL
//! - anything else: fetch
//!
//! Probe failures never fail the call. Once a key has a recorded timestamp
//! the TTL path no longer applies to it, even if the probe starts failing.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use super::store::LocalStore;
use super::value::CachedValue;

/// Default maximum entry age when no upstream timestamp decides freshness.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Why a call served or replaced the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Probe matched the recorded upstream timestamp.
    UpstreamMatch,
    /// No authoritative timestamp; entry younger than the TTL.
    WithinTtl,
    /// Stored value exists but is out of date.
    Stale,
    /// Nothing stored under the key.
    Missing,
}

impl Freshness {
    pub fn is_hit(self) -> bool {
        matches!(self, Freshness::UpstreamMatch | Freshness::WithinTtl)
    }
}

/// Serve `key` from the store while it is younger than `ttl`, otherwise run
/// `fetch` and store the result.
pub fn cached_fetch<F>(store: &mut LocalStore, key: &str, ttl: Duration, fetch: F) -> Result<CachedValue>
where
    F: FnOnce() -> Result<CachedValue>,
{
    gated_fetch(store, key, ttl, fetch, None::<fn() -> Result<String>>)
}

/// Like [`cached_fetch`], but `probe` reports the current upstream timestamp.
/// A matching probe serves the stored value regardless of its age; the
/// probed timestamp is recorded with every freshly fetched value.
pub fn cached_fetch_probed<F, P>(
    store: &mut LocalStore,
    key: &str,
    ttl: Duration,
    fetch: F,
    probe: P,
) -> Result<CachedValue>
where
    F: FnOnce() -> Result<CachedValue>,
    P: FnMut() -> Result<String>,
{
    gated_fetch(store, key, ttl, fetch, Some(probe))
}

fn gated_fetch<F, P>(
    store: &mut LocalStore,
    key: &str,
    ttl: Duration,
    fetch: F,
    mut probe: Option<P>,
) -> Result<CachedValue>
where
    F: FnOnce() -> Result<CachedValue>,
    P: FnMut() -> Result<String>,
{
    if let Some(cached) = store.get(key)? {
        let freshness = match probe.as_mut() {
            Some(probe) => {
                let upstream = query_upstream(probe, key);
                match (upstream.as_deref(), store.get_upstream_timestamp(key)) {
                    (Some(upstream), Some(local)) if upstream == local => Freshness::UpstreamMatch,
                    (_, None) => check_age(store, key, ttl),
                    _ => Freshness::Stale,
                }
            }
            None => check_age(store, key, ttl),
        };

        if freshness.is_hit() {
            debug!(key, ?freshness, "Serving cached value");
            return Ok(cached);
        }
        debug!(key, ?freshness, "Cached value out of date, refetching");
    } else {
        debug!(key, freshness = ?Freshness::Missing, "Nothing cached, fetching");
    }

    let value = fetch()?;
    let upstream = probe.as_mut().and_then(|probe| query_upstream(probe, key));
    store.set(key, &value, upstream.as_deref())?;

    Ok(value)
}

/// Run the probe, swallowing failures. An empty marker counts as unknown.
fn query_upstream<P>(probe: &mut P, key: &str) -> Option<String>
where
    P: FnMut() -> Result<String>,
{
    match probe() {
        Ok(timestamp) if !timestamp.is_empty() => Some(timestamp),
        Ok(_) => None,
        Err(e) => {
            debug!(key, error = %e, "Upstream timestamp probe failed");
            None
        }
    }
}

fn check_age(store: &LocalStore, key: &str, ttl: Duration) -> Freshness {
    match store.entry_age(key) {
        Ok(Some(age)) if age < ttl => Freshness::WithinTtl,
        Ok(_) => Freshness::Stale,
        Err(e) => {
            warn!(key, error = %e, "Could not read cache entry age, treating as stale");
            Freshness::Stale
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::SystemTime;

    use anyhow::anyhow;
    use filetime::FileTime;
    use serde_json::json;
    use tempfile::TempDir;

    const KEY: &str = "bootstrap_static_data";

    fn open_store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = LocalStore::open(dir.path()).expect("Failed to open store");
        (dir, store)
    }

    fn age_entry(store: &LocalStore, key: &str, by: Duration) {
        let then = SystemTime::now() - by;
        filetime::set_file_mtime(store.entry_path(key), FileTime::from_system_time(then))
            .expect("Failed to backdate entry");
    }

    fn fresh() -> CachedValue {
        CachedValue::Document(json!({"version": "fresh"}))
    }

    fn stored() -> CachedValue {
        CachedValue::Document(json!({"version": "stored"}))
    }

    #[test]
    fn test_missing_entry_fetches_and_records_timestamp() {
        let (_dir, mut store) = open_store();
        let calls = Cell::new(0);

        let value = cached_fetch_probed(
            &mut store,
            KEY,
            DEFAULT_TTL,
            || {
                calls.set(calls.get() + 1);
                Ok(fresh())
            },
            || Ok("ts-1".to_string()),
        )
        .expect("fetch succeeds");

        assert_eq!(calls.get(), 1);
        assert_eq!(value, fresh());
        assert_eq!(store.get(KEY).expect("get"), Some(fresh()));
        assert_eq!(store.get_upstream_timestamp(KEY), Some("ts-1"));
    }

    #[test]
    fn test_matching_probe_skips_fetch() {
        let (_dir, mut store) = open_store();
        store.set(KEY, &stored(), Some("ts-1")).expect("seed");
        // Even a very old entry is served when the upstream marker matches
        age_entry(&store, KEY, Duration::from_secs(10 * 24 * 3600));
        let calls = Cell::new(0);

        let value = cached_fetch_probed(
            &mut store,
            KEY,
            DEFAULT_TTL,
            || {
                calls.set(calls.get() + 1);
                Ok(fresh())
            },
            || Ok("ts-1".to_string()),
        )
        .expect("served from cache");

        assert_eq!(calls.get(), 0);
        assert_eq!(value, stored());
    }

    #[test]
    fn test_changed_probe_fetches_once_and_replaces_value() {
        let (_dir, mut store) = open_store();
        store.set(KEY, &stored(), Some("ts-1")).expect("seed");
        let calls = Cell::new(0);

        let value = cached_fetch_probed(
            &mut store,
            KEY,
            DEFAULT_TTL,
            || {
                calls.set(calls.get() + 1);
                Ok(fresh())
            },
            || Ok("ts-2".to_string()),
        )
        .expect("refetched");

        assert_eq!(calls.get(), 1);
        assert_eq!(value, fresh());
        assert_eq!(store.get(KEY).expect("get"), Some(fresh()));
        assert_eq!(store.get_upstream_timestamp(KEY), Some("ts-2"));
    }

    #[test]
    fn test_no_probe_young_entry_is_reused() {
        let (_dir, mut store) = open_store();
        store.set(KEY, &stored(), None).expect("seed");
        let calls = Cell::new(0);

        let value = cached_fetch(&mut store, KEY, DEFAULT_TTL, || {
            calls.set(calls.get() + 1);
            Ok(fresh())
        })
        .expect("served from cache");

        assert_eq!(calls.get(), 0);
        assert_eq!(value, stored());
    }

    #[test]
    fn test_no_probe_old_entry_is_refetched() {
        let (_dir, mut store) = open_store();
        store.set(KEY, &stored(), None).expect("seed");
        age_entry(&store, KEY, Duration::from_secs(2 * 3600));
        let calls = Cell::new(0);

        let value = cached_fetch(&mut store, KEY, DEFAULT_TTL, || {
            calls.set(calls.get() + 1);
            Ok(fresh())
        })
        .expect("refetched");

        assert_eq!(calls.get(), 1);
        assert_eq!(value, fresh());
    }

    #[test]
    fn test_probe_without_local_timestamp_falls_back_to_age() {
        let (_dir, mut store) = open_store();
        store.set(KEY, &stored(), None).expect("seed");
        let calls = Cell::new(0);

        let young = cached_fetch_probed(
            &mut store,
            KEY,
            DEFAULT_TTL,
            || {
                calls.set(calls.get() + 1);
                Ok(fresh())
            },
            || Ok("ts-9".to_string()),
        )
        .expect("served");
        assert_eq!(calls.get(), 0);
        assert_eq!(young, stored());

        age_entry(&store, KEY, Duration::from_secs(2 * 3600));
        let old = cached_fetch_probed(
            &mut store,
            KEY,
            DEFAULT_TTL,
            || {
                calls.set(calls.get() + 1);
                Ok(fresh())
            },
            || Ok("ts-9".to_string()),
        )
        .expect("refetched");
        assert_eq!(calls.get(), 1);
        assert_eq!(old, fresh());
    }

    #[test]
    fn test_failing_probe_never_fails_the_call() {
        let (_dir, mut store) = open_store();
        let calls = Cell::new(0);

        let value = cached_fetch_probed(
            &mut store,
            KEY,
            DEFAULT_TTL,
            || {
                calls.set(calls.get() + 1);
                Ok(fresh())
            },
            || Err(anyhow!("upstream down")),
        )
        .expect("probe failure swallowed");

        assert_eq!(calls.get(), 1);
        assert_eq!(value, fresh());
        assert_eq!(store.get_upstream_timestamp(KEY), None);

        // Young entry, no local timestamp, failing probe: TTL decides
        let again = cached_fetch_probed(
            &mut store,
            KEY,
            DEFAULT_TTL,
            || {
                calls.set(calls.get() + 1);
                Ok(stored())
            },
            || Err(anyhow!("upstream down")),
        )
        .expect("served");
        assert_eq!(calls.get(), 1);
        assert_eq!(again, fresh());
    }

    #[test]
    fn test_recorded_timestamp_disables_ttl_when_probe_fails() {
        let (_dir, mut store) = open_store();
        store.set(KEY, &stored(), Some("ts-1")).expect("seed");
        let calls = Cell::new(0);

        // Entry is brand new, but a timestamp is recorded and the probe fails
        let value = cached_fetch_probed(
            &mut store,
            KEY,
            DEFAULT_TTL,
            || {
                calls.set(calls.get() + 1);
                Ok(fresh())
            },
            || Err(anyhow!("timeout")),
        )
        .expect("refetched");

        assert_eq!(calls.get(), 1);
        assert_eq!(value, fresh());
        // Probe failed after the fetch too, so the old marker stays
        assert_eq!(store.get_upstream_timestamp(KEY), Some("ts-1"));
    }

    #[test]
    fn test_fetch_error_propagates() {
        let (_dir, mut store) = open_store();
        let result = cached_fetch(&mut store, KEY, DEFAULT_TTL, || Err(anyhow!("boom")));
        assert!(result.is_err());
        assert!(store.get(KEY).expect("get").is_none());
    }

    #[test]
    fn test_corrupt_entry_propagates() {
        let (_dir, mut store) = open_store();
        std::fs::write(store.entry_path(KEY), "not json").expect("write");
        let result = cached_fetch(&mut store, KEY, DEFAULT_TTL, || Ok(fresh()));
        assert!(result.is_err());
    }
}
