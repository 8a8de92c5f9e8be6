//! Data models for FPL entities.
//!
//! - `Player`: normalized players table with derived price columns
//! - `Team`, `Gameweek`: reference tables from the bootstrap snapshot
//! - `Fixture`, `FixtureDifficulty`, `Fdr`: schedule and difficulty ratings
//! - `PlayerSummary`: per-player gameweek history

pub mod fixture;
pub mod gameweek;
pub mod player;
pub mod summary;
pub mod team;

pub use fixture::{fixture_difficulties, Fdr, Fixture, FixtureDifficulty, Venue};
pub use gameweek::{current_gameweek, gameweeks_from_bootstrap, Gameweek};
pub use player::{players_from_bootstrap, points_per_million, Player};
pub use summary::{GameweekHistory, PlayerSummary};
pub use team::{find_team, teams_from_bootstrap, Team};
