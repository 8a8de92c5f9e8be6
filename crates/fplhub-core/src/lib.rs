//! fplhub core library.
//!
//! Fetches Fantasy Premier League data, keeps it in a local freshness-aware
//! store, loads historical season CSVs and provides the filtering and chart
//! building used by the front ends.
//!
//! - `api`: FPL REST client with retries and cached bootstrap tables
//! - `cache`: on-disk store and the reuse-or-refetch policy
//! - `models`: players, teams, gameweeks, fixtures
//! - `season`: per-season CSV tables
//! - `analysis`: filters, rankings, squad tools, chart specs
//! - `config`: user configuration

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod season;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use cache::LocalStore;
pub use config::Config;
pub use season::SeasonLoader;
