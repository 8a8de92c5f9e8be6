use serde::{Deserialize, Serialize};

/// Response of `element-summary/<id>`: the player's per-gameweek history
/// for the current season.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSummary {
    #[serde(default)]
    pub history: Vec<GameweekHistory>,
}

/// One gameweek appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameweekHistory {
    pub round: i64,
    #[serde(default)]
    pub opponent_team: Option<i64>,
    #[serde(default)]
    pub was_home: bool,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub goals_scored: i64,
    #[serde(default)]
    pub assists: i64,
    #[serde(default)]
    pub bonus: i64,
    /// Price at the time, in tenths.
    #[serde(default)]
    pub value: i64,
}

impl PlayerSummary {
    /// The most recent `n` gameweeks, newest first.
    pub fn recent(&self, n: usize) -> Vec<&GameweekHistory> {
        let mut rows: Vec<&GameweekHistory> = self.history.iter().collect();
        rows.sort_by(|a, b| b.round.cmp(&a.round));
        rows.truncate(n);
        rows
    }
}
