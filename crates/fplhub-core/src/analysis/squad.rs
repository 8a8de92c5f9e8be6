use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Player;

use super::filters::{top_performers, PlayerMetric};

/// Price ceiling for transfer suggestions, in millions.
pub const DEFAULT_TRANSFER_BUDGET: f64 = 15.0;

/// Number of transfer suggestions offered.
pub const DEFAULT_SUGGESTIONS: usize = 5;

/// Aggregates over a user-picked squad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadSummary {
    pub player_count: usize,
    pub total_cost: f64,
    pub total_points: f64,
    /// Zero for an empty squad.
    pub average_form: f64,
    pub position_counts: BTreeMap<String, usize>,
}

impl SquadSummary {
    pub fn from_players(squad: &[Player]) -> Self {
        let total_cost = squad.iter().map(|p| p.price).sum();
        let total_points = squad.iter().map(|p| p.total_points).sum();
        let average_form = if squad.is_empty() {
            0.0
        } else {
            squad.iter().map(|p| p.form).sum::<f64>() / squad.len() as f64
        };

        let mut position_counts = BTreeMap::new();
        for player in squad {
            *position_counts
                .entry(player.position_display().to_string())
                .or_insert(0) += 1;
        }

        Self {
            player_count: squad.len(),
            total_cost,
            total_points,
            average_form,
            position_counts,
        }
    }
}

/// In-form players affordable within `budget` who are not already in the
/// squad (matched by web name).
pub fn transfer_suggestions(
    players: &[Player],
    squad_names: &[String],
    budget: f64,
    n: usize,
) -> Vec<Player> {
    let candidates: Vec<Player> = players
        .iter()
        .filter(|p| p.price <= budget)
        .filter(|p| !squad_names.iter().any(|name| *name == p.web_name))
        .cloned()
        .collect();
    top_performers(&candidates, PlayerMetric::Form, n)
}
