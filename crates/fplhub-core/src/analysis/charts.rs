//! Chart specifications.
//!
//! Each builder turns a table into plain data (title, axis labels, named
//! series of points) that a front end can render however it likes. Empty
//! input yields a spec with a "No ... available" title and no series.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::{cell_f64, Table};
use crate::models::{FixtureDifficulty, Player, Team};

use super::filters::PlayerMetric;

/// Axes of the player radar, in drawing order.
pub const RADAR_CATEGORIES: [&str; 6] = ["Goals", "Assists", "Clean Sheets", "Bonus", "xG", "xA"];

const NO_DATA: &str = "No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Box,
    Scatter,
    Radar,
    Heatmap,
    Bar,
}

/// A point coordinate: numeric or a category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coord {
    Number(f64),
    Category(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: Coord,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl Point {
    fn xy(x: Coord, y: f64) -> Self {
        Self {
            x,
            y,
            label: None,
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

/// Team by gameweek difficulty matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub rows: Vec<String>,
    pub columns: Vec<i64>,
    pub values: Vec<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub series: Vec<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<Heatmap>,
}

impl ChartSpec {
    fn empty(kind: ChartKind, title: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x_label: None,
            y_label: None,
            series: Vec::new(),
            heatmap: None,
        }
    }

    fn new(kind: ChartKind, title: impl Into<String>, x_label: &str, y_label: &str) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: Some(x_label.to_string()),
            y_label: Some(y_label.to_string()),
            series: Vec::new(),
            heatmap: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.heatmap.is_none()
    }
}

/// Points per gameweek for each `(player_id, name)`, from the gameweek stats
/// table. Players with no rows get no line.
pub fn form_trend_chart(gameweek_stats: &Table, players: &[(i64, String)]) -> ChartSpec {
    if gameweek_stats.is_empty() {
        return ChartSpec::empty(ChartKind::Line, "No form data available");
    }

    let mut spec = ChartSpec::new(
        ChartKind::Line,
        "Player Form Trend (Points per Gameweek)",
        "Gameweek",
        "Points",
    );

    for (player_id, name) in players {
        let mut points: Vec<(f64, f64)> = gameweek_stats
            .rows()
            .iter()
            .filter(|row| cell_f64(row, "player_id") == Some(*player_id as f64))
            .filter_map(|row| Some((cell_f64(row, "gameweek")?, cell_f64(row, "total_points")?)))
            .collect();
        if points.is_empty() {
            continue;
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        spec.series.push(Series {
            name: name.clone(),
            points: points
                .into_iter()
                .map(|(gw, pts)| Point::xy(Coord::Number(gw), pts))
                .collect(),
        });
    }
    spec
}

/// Total points spread per position.
pub fn points_distribution_chart(players: &[Player]) -> ChartSpec {
    if players.is_empty() {
        return ChartSpec::empty(ChartKind::Box, NO_DATA);
    }

    let mut spec = ChartSpec::new(
        ChartKind::Box,
        "Points Distribution by Position",
        "Position",
        "Total Points",
    );
    spec.series = by_position(players, |p, position| {
        Point::xy(Coord::Category(position.to_string()), p.total_points)
    });
    spec
}

/// Price against total points, sized by form.
pub fn value_vs_points_chart(players: &[Player]) -> ChartSpec {
    if players.is_empty() {
        return ChartSpec::empty(ChartKind::Scatter, NO_DATA);
    }

    let mut spec = ChartSpec::new(
        ChartKind::Scatter,
        "Value vs Points (size = form)",
        "Price (£m)",
        "Total Points",
    );
    spec.series = by_position(players, |p, _| Point {
        x: Coord::Number(p.price),
        y: p.total_points,
        label: Some(p.web_name.clone()),
        size: Some(p.form),
    });
    spec
}

/// Expected goals against expected assists, sized by total points.
pub fn xg_xa_chart(players: &[Player]) -> ChartSpec {
    if players.is_empty() {
        return ChartSpec::empty(ChartKind::Scatter, NO_DATA);
    }

    let mut spec = ChartSpec::new(
        ChartKind::Scatter,
        "Expected Goals vs Expected Assists",
        "Expected Goals (xG)",
        "Expected Assists (xA)",
    );
    spec.series = by_position(players, |p, _| Point {
        x: Coord::Number(p.xg),
        y: p.xa,
        label: Some(p.web_name.clone()),
        size: Some(p.total_points),
    });
    spec
}

pub fn radar_chart(player: Option<&Player>) -> ChartSpec {
    let Some(player) = player else {
        return ChartSpec::empty(ChartKind::Radar, "No player data available");
    };

    let values = [
        player.goals_scored,
        player.assists,
        player.clean_sheets,
        player.bonus,
        player.xg,
        player.xa,
    ];
    let name = player.display_name();

    let mut spec = ChartSpec::empty(ChartKind::Radar, &format!("{} - Performance Radar", name));
    spec.series.push(Series {
        name,
        points: RADAR_CATEGORIES
            .iter()
            .zip(values)
            .map(|(category, value)| Point::xy(Coord::Category(category.to_string()), value))
            .collect(),
    });
    spec
}

/// Team by gameweek difficulty matrix. Where a team plays twice in a
/// gameweek the first fixture wins; blanks are 0.
pub fn fdr_heatmap(all: &[(Team, Vec<FixtureDifficulty>)]) -> ChartSpec {
    let mut cells: BTreeMap<&str, BTreeMap<i64, i64>> = BTreeMap::new();
    for (team, rows) in all {
        for row in rows {
            cells
                .entry(team.short_name.as_str())
                .or_default()
                .entry(row.gameweek)
                .or_insert(row.difficulty);
        }
    }

    if cells.is_empty() {
        return ChartSpec::empty(ChartKind::Heatmap, "No fixture data available");
    }

    let mut columns: Vec<i64> = cells.values().flat_map(|gws| gws.keys().copied()).collect();
    columns.sort_unstable();
    columns.dedup();

    let values = cells
        .values()
        .map(|gws| columns.iter().map(|gw| gws.get(gw).copied().unwrap_or(0)).collect())
        .collect();

    let mut spec = ChartSpec::new(
        ChartKind::Heatmap,
        "Fixture Difficulty Rating (FDR) Heatmap",
        "Gameweek",
        "Team",
    );
    spec.heatmap = Some(Heatmap {
        rows: cells.keys().map(|team| team.to_string()).collect(),
        columns,
        values,
    });
    spec
}

/// One bar per named player for `metric`, grouped by position.
pub fn comparison_bar_chart(players: &[Player], names: &[String], metric: PlayerMetric) -> ChartSpec {
    if players.is_empty() || names.is_empty() {
        return ChartSpec::empty(ChartKind::Bar, "No comparison data available");
    }

    let picked: Vec<Player> = super::compare_players(players, names);
    if picked.is_empty() {
        return ChartSpec::empty(ChartKind::Bar, "Players not found");
    }

    let mut spec = ChartSpec::new(
        ChartKind::Bar,
        format!("Player Comparison - {}", metric),
        "Player",
        metric.column(),
    );
    spec.series = by_position(&picked, |p, _| {
        Point::xy(Coord::Category(p.web_name.clone()), metric.value(p))
    });
    spec
}

/// One series per position name, alphabetical. Players with no known
/// position are left out.
fn by_position<F>(players: &[Player], point: F) -> Vec<Series>
where
    F: Fn(&Player, &str) -> Point,
{
    let mut groups: BTreeMap<&str, Vec<Point>> = BTreeMap::new();
    for player in players {
        if let Some(position) = player.position_name.as_deref() {
            groups
                .entry(position)
                .or_default()
                .push(point(player, position));
        }
    }

    groups
        .into_iter()
        .map(|(name, points)| Series {
            name: name.to_string(),
            points,
        })
        .collect()
}
