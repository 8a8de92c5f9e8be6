//! Player table built from the bootstrap snapshot.
//!
//! Raw `elements` records are loosely typed upstream (form and the expected
//! stats arrive as strings, some fields are missing early in a season), so
//! every numeric column is coerced with a default instead of failing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Numeric columns that default to 0 when missing or unparseable.
const COUNT_COLUMNS: [&str; 7] = [
    "form",
    "total_points",
    "minutes",
    "goals_scored",
    "assists",
    "clean_sheets",
    "bonus",
];

/// A missing availability flag means the player is assumed fit.
const DEFAULT_CHANCE_OF_PLAYING: f64 = 100.0;

/// One row of the players table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    #[serde(default)]
    pub web_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    pub team: i64,
    pub team_name: Option<String>,
    pub element_type: i64,
    pub position_name: Option<String>,
    pub now_cost: f64,
    pub price: f64,
    pub value: f64,
    pub form: f64,
    pub total_points: f64,
    pub minutes: f64,
    pub goals_scored: f64,
    pub assists: f64,
    pub clean_sheets: f64,
    pub bonus: f64,
    #[serde(rename = "xG")]
    pub xg: f64,
    #[serde(rename = "xA")]
    pub xa: f64,
    pub threat: f64,
    pub creativity: f64,
    pub influence: f64,
    pub selected_by_percent: f64,
    pub transfers_in: f64,
    pub transfers_out: f64,
    pub value_change: f64,
    pub chance_of_playing_next_round: f64,
    pub points_per_million: f64,
}

impl Player {
    /// Normalize one raw `elements` record.
    pub fn from_raw(
        raw: &Value,
        teams: &HashMap<i64, String>,
        positions: &HashMap<i64, String>,
    ) -> Self {
        let team = raw.get("team").and_then(Value::as_i64).unwrap_or_default();
        let element_type = raw
            .get("element_type")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        let now_cost = coerce(raw.get("now_cost"), 0.0);
        let price = now_cost / 10.0;

        let [form, total_points, minutes, goals_scored, assists, clean_sheets, bonus] =
            COUNT_COLUMNS.map(|column| coerce(raw.get(column), 0.0));

        Self {
            id: raw.get("id").and_then(Value::as_i64).unwrap_or_default(),
            web_name: text(raw, "web_name"),
            first_name: text(raw, "first_name"),
            second_name: text(raw, "second_name"),
            team,
            team_name: teams.get(&team).cloned(),
            element_type,
            position_name: positions.get(&element_type).cloned(),
            now_cost,
            price,
            value: price,
            form,
            total_points,
            minutes,
            goals_scored,
            assists,
            clean_sheets,
            bonus,
            xg: coerce(raw.get("expected_goals"), 0.0),
            xa: coerce(raw.get("expected_assists"), 0.0),
            threat: coerce(raw.get("threat"), 0.0),
            creativity: coerce(raw.get("creativity"), 0.0),
            influence: coerce(raw.get("influence"), 0.0),
            selected_by_percent: coerce(raw.get("selected_by_percent"), 0.0),
            transfers_in: coerce(raw.get("transfers_in"), 0.0),
            transfers_out: coerce(raw.get("transfers_out"), 0.0),
            value_change: coerce(raw.get("value_change"), 0.0),
            chance_of_playing_next_round: coerce(
                raw.get("chance_of_playing_next_round"),
                DEFAULT_CHANCE_OF_PLAYING,
            ),
            points_per_million: points_per_million(total_points, price),
        }
    }

    /// Display name: web name, falling back to first + second name.
    pub fn display_name(&self) -> String {
        if !self.web_name.is_empty() {
            return self.web_name.clone();
        }
        format!("{} {}", self.first_name, self.second_name)
            .trim()
            .to_string()
    }

    pub fn team_display(&self) -> &str {
        self.team_name.as_deref().unwrap_or("-")
    }

    pub fn position_display(&self) -> &str {
        self.position_name.as_deref().unwrap_or("-")
    }
}

/// Points per unit of price. A zero price divides by one instead.
pub fn points_per_million(total_points: f64, price: f64) -> f64 {
    let divisor = if price == 0.0 { 1.0 } else { price };
    total_points / divisor
}

/// Build the players table from a bootstrap snapshot.
///
/// `None` when the snapshot has no `elements` array at all.
pub fn players_from_bootstrap(bootstrap: &Value) -> Option<Vec<Player>> {
    let elements = bootstrap.get("elements")?.as_array()?;

    let teams = id_lookup(bootstrap.get("teams"), "name");
    let positions = id_lookup(bootstrap.get("element_types"), "singular_name");

    let players: Vec<Player> = elements
        .iter()
        .map(|raw| Player::from_raw(raw, &teams, &positions))
        .collect();

    debug!(count = players.len(), "Normalized players");
    Some(players)
}

/// `id -> field` map over an array of objects.
fn id_lookup(items: Option<&Value>, field: &str) -> HashMap<i64, String> {
    items
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let id = item.get("id")?.as_i64()?;
                    let name = item.get(field)?.as_str()?;
                    Some((id, name.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Coerce a raw cell to a number: numbers pass through, numeric strings are
/// parsed, anything else (missing, null, garbage) becomes `default`.
fn coerce(value: Option<&Value>, default: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(default),
        _ => default,
    }
}

fn text(raw: &Value, field: &str) -> String {
    raw.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
