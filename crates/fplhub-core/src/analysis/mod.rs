//! Filtering, ranking and chart building over the loaded tables.
//!
//! - `filters`: `PlayerFilter`, rankings by `PlayerMetric`, comparisons
//! - `squad`: summary of a user-picked squad and transfer suggestions
//! - `fixtures`: all-teams difficulty overview and per-team breakdowns
//! - `charts`: renderer-agnostic chart specifications

pub mod charts;
pub mod filters;
pub mod fixtures;
pub mod squad;

pub use charts::{ChartKind, ChartSpec, Coord, Heatmap, Point, Series};
pub use filters::{
    best_value_players, compare_players, filter_players, top_performers, PlayerFilter,
    PlayerMetric, DEFAULT_MIN_MINUTES, DEFAULT_PRICE_MAX,
};
pub use fixtures::{fixture_breakdown, team_fdr_summaries, FixtureBreakdown, TeamFdrSummary};
pub use squad::{transfer_suggestions, SquadSummary, DEFAULT_SUGGESTIONS, DEFAULT_TRANSFER_BUDGET};
