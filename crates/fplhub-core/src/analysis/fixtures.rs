use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Fdr, FixtureDifficulty, Team, Venue};

/// Gameweek columns in the all-teams overview.
pub const FDR_OVERVIEW_GAMEWEEKS: usize = 5;

/// One team's row in the all-teams difficulty overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamFdrSummary {
    pub team: String,
    /// Difficulty of the next fixtures in order, 0 where there is none.
    pub gameweeks: [i64; FDR_OVERVIEW_GAMEWEEKS],
    /// Mean over every fixture considered for the team.
    pub avg_difficulty: f64,
}

/// Build the overview, easiest run first. Teams without fixtures are left out.
pub fn team_fdr_summaries(all: &[(Team, Vec<FixtureDifficulty>)]) -> Vec<TeamFdrSummary> {
    let mut summaries: Vec<TeamFdrSummary> = all
        .iter()
        .filter(|(_, rows)| !rows.is_empty())
        .map(|(team, rows)| {
            let mut gameweeks = [0; FDR_OVERVIEW_GAMEWEEKS];
            for (slot, row) in gameweeks.iter_mut().zip(rows) {
                *slot = row.difficulty;
            }
            let total: i64 = rows.iter().map(|r| r.difficulty).sum();

            TeamFdrSummary {
                team: team.short_name.clone(),
                gameweeks,
                avg_difficulty: total as f64 / rows.len() as f64,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.avg_difficulty
            .partial_cmp(&b.avg_difficulty)
            .unwrap_or(Ordering::Equal)
    });
    summaries
}

/// Counts over one team's upcoming fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FixtureBreakdown {
    pub by_fdr: BTreeMap<Fdr, usize>,
    pub home: usize,
    pub away: usize,
}

pub fn fixture_breakdown(rows: &[FixtureDifficulty]) -> FixtureBreakdown {
    let mut breakdown = FixtureBreakdown::default();
    for row in rows {
        *breakdown.by_fdr.entry(row.fdr).or_insert(0) += 1;
        match row.home_away {
            Venue::Home => breakdown.home += 1,
            Venue::Away => breakdown.away += 1,
        }
    }
    breakdown
}
