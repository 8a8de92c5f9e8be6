//! Local caching for upstream datasets.
//!
//! - `LocalStore`: one JSON file per key plus a flat freshness index
//! - `CachedValue`: table-or-document payload, tagged on disk
//! - `cached_fetch` / `cached_fetch_probed`: reuse-or-refetch policy keyed
//!   on an upstream timestamp, with file age as the fallback signal

pub mod fetcher;
pub mod store;
pub mod value;

pub use fetcher::{cached_fetch, cached_fetch_probed, Freshness, DEFAULT_TTL};
pub use store::LocalStore;
pub use value::{cell_f64, CachedValue, Record, Table};
