use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::models::{points_per_million, Player};
use crate::utils::contains_ignore_case;

/// Upper bound of the default price range, in millions.
pub const DEFAULT_PRICE_MAX: f64 = 15.0;

/// Minutes a player needs before value rankings consider them.
pub const DEFAULT_MIN_MINUTES: f64 = 450.0;

/// How many players a value ranking returns.
const BEST_VALUE_LIMIT: usize = 20;

/// Criteria for narrowing the players table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFilter {
    /// Position names to keep; empty keeps all.
    pub positions: Vec<String>,
    /// Team names to keep; empty keeps all.
    pub teams: Vec<String>,
    pub price_min: f64,
    pub price_max: f64,
    /// Only applied when positive.
    pub points_min: f64,
    /// Only applied when positive.
    pub form_min: f64,
    /// Case-insensitive substring of web name or surname.
    pub search: String,
}

impl Default for PlayerFilter {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            teams: Vec::new(),
            price_min: 0.0,
            price_max: DEFAULT_PRICE_MAX,
            points_min: 0.0,
            form_min: 0.0,
            search: String::new(),
        }
    }
}

impl PlayerFilter {
    pub fn matches(&self, player: &Player) -> bool {
        if !self.positions.is_empty() && !in_list(&self.positions, player.position_name.as_deref()) {
            return false;
        }
        if !self.teams.is_empty() && !in_list(&self.teams, player.team_name.as_deref()) {
            return false;
        }
        if player.price < self.price_min || player.price > self.price_max {
            return false;
        }
        if self.points_min > 0.0 && player.total_points < self.points_min {
            return false;
        }
        if self.form_min > 0.0 && player.form < self.form_min {
            return false;
        }
        if !self.search.is_empty()
            && !contains_ignore_case(&player.web_name, &self.search)
            && !contains_ignore_case(&player.second_name, &self.search)
        {
            return false;
        }
        true
    }
}

fn in_list(list: &[String], value: Option<&str>) -> bool {
    value.map_or(false, |v| list.iter().any(|item| item == v))
}

pub fn filter_players(players: &[Player], filter: &PlayerFilter) -> Vec<Player> {
    players.iter().filter(|p| filter.matches(p)).cloned().collect()
}

/// Numeric player columns that rankings and comparisons can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerMetric {
    TotalPoints,
    Form,
    GoalsScored,
    Assists,
    CleanSheets,
    Bonus,
    Minutes,
    Xg,
    Xa,
    Price,
    PointsPerMillion,
    SelectedByPercent,
    Influence,
    Creativity,
    Threat,
}

impl PlayerMetric {
    pub const ALL: [PlayerMetric; 15] = [
        PlayerMetric::TotalPoints,
        PlayerMetric::Form,
        PlayerMetric::GoalsScored,
        PlayerMetric::Assists,
        PlayerMetric::CleanSheets,
        PlayerMetric::Bonus,
        PlayerMetric::Minutes,
        PlayerMetric::Xg,
        PlayerMetric::Xa,
        PlayerMetric::Price,
        PlayerMetric::PointsPerMillion,
        PlayerMetric::SelectedByPercent,
        PlayerMetric::Influence,
        PlayerMetric::Creativity,
        PlayerMetric::Threat,
    ];

    /// Column name in the players table.
    pub fn column(&self) -> &'static str {
        match self {
            PlayerMetric::TotalPoints => "total_points",
            PlayerMetric::Form => "form",
            PlayerMetric::GoalsScored => "goals_scored",
            PlayerMetric::Assists => "assists",
            PlayerMetric::CleanSheets => "clean_sheets",
            PlayerMetric::Bonus => "bonus",
            PlayerMetric::Minutes => "minutes",
            PlayerMetric::Xg => "xG",
            PlayerMetric::Xa => "xA",
            PlayerMetric::Price => "price",
            PlayerMetric::PointsPerMillion => "points_per_million",
            PlayerMetric::SelectedByPercent => "selected_by_percent",
            PlayerMetric::Influence => "influence",
            PlayerMetric::Creativity => "creativity",
            PlayerMetric::Threat => "threat",
        }
    }

    pub fn value(&self, player: &Player) -> f64 {
        match self {
            PlayerMetric::TotalPoints => player.total_points,
            PlayerMetric::Form => player.form,
            PlayerMetric::GoalsScored => player.goals_scored,
            PlayerMetric::Assists => player.assists,
            PlayerMetric::CleanSheets => player.clean_sheets,
            PlayerMetric::Bonus => player.bonus,
            PlayerMetric::Minutes => player.minutes,
            PlayerMetric::Xg => player.xg,
            PlayerMetric::Xa => player.xa,
            PlayerMetric::Price => player.price,
            PlayerMetric::PointsPerMillion => player.points_per_million,
            PlayerMetric::SelectedByPercent => player.selected_by_percent,
            PlayerMetric::Influence => player.influence,
            PlayerMetric::Creativity => player.creativity,
            PlayerMetric::Threat => player.threat,
        }
    }
}

impl fmt::Display for PlayerMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for PlayerMetric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        match PlayerMetric::ALL
            .iter()
            .find(|m| m.column().eq_ignore_ascii_case(&wanted))
        {
            Some(metric) => Ok(*metric),
            None => bail!("Unknown metric '{}'", s),
        }
    }
}

/// Stable descending sort; ties keep their input order.
fn sort_desc_by<F: Fn(&Player) -> f64>(players: &mut [Player], key: F) {
    players.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

/// The `n` players with the largest `metric`.
pub fn top_performers(players: &[Player], metric: PlayerMetric, n: usize) -> Vec<Player> {
    let mut ranked = players.to_vec();
    sort_desc_by(&mut ranked, |p| metric.value(p));
    ranked.truncate(n);
    ranked
}

/// Best points per million among players with at least `min_minutes`.
pub fn best_value_players(players: &[Player], min_minutes: f64) -> Vec<Player> {
    let mut ranked: Vec<Player> = players
        .iter()
        .filter(|p| p.minutes >= min_minutes)
        .cloned()
        .collect();
    sort_desc_by(&mut ranked, |p| points_per_million(p.total_points, p.price));
    ranked.truncate(BEST_VALUE_LIMIT);
    ranked
}

/// Players whose web name is in `names`, in players-table order.
pub fn compare_players(players: &[Player], names: &[String]) -> Vec<Player> {
    players
        .iter()
        .filter(|p| names.iter().any(|n| *n == p.web_name))
        .cloned()
        .collect()
}
