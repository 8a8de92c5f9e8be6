use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One row of the gameweeks table (upstream `events`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deadline_time: Option<String>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
    // Upstream calls it `is_previous`; the table column is `is_prev`
    #[serde(default, alias = "is_previous")]
    pub is_prev: bool,
    #[serde(default)]
    pub average_entry_score: Option<i64>,
    #[serde(default)]
    pub highest_score: Option<i64>,
}

impl Gameweek {
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn formatted_deadline(&self) -> String {
        match self.deadline() {
            Some(dt) => dt.format("%a %d %b %H:%M").to_string(),
            None => "TBD".to_string(),
        }
    }

    pub fn status(&self) -> &'static str {
        if self.is_current {
            "current"
        } else if self.is_next {
            "next"
        } else if self.is_prev {
            "previous"
        } else if self.finished {
            "finished"
        } else {
            "upcoming"
        }
    }
}

/// Build the gameweeks table from a bootstrap snapshot.
///
/// `None` when the snapshot has no `events` array.
pub fn gameweeks_from_bootstrap(bootstrap: &Value) -> Option<Vec<Gameweek>> {
    let raw = bootstrap.get("events")?.as_array()?;

    let gameweeks = raw
        .iter()
        .filter_map(|item| match serde_json::from_value::<Gameweek>(item.clone()) {
            Ok(gw) => Some(gw),
            Err(e) => {
                warn!(error = %e, "Skipping malformed gameweek record");
                None
            }
        })
        .collect();

    Some(gameweeks)
}

/// The gameweek flagged as current, if the season has started.
pub fn current_gameweek(gameweeks: &[Gameweek]) -> Option<&Gameweek> {
    gameweeks.iter().find(|gw| gw.is_current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags_default_to_false() {
        let gws = gameweeks_from_bootstrap(&json!({
            "events": [{"id": 1, "name": "Gameweek 1"}]
        }))
        .expect("events present");
        assert!(!gws[0].is_current);
        assert!(!gws[0].is_next);
        assert!(!gws[0].is_prev);
        assert_eq!(gws[0].status(), "upcoming");
    }

    #[test]
    fn test_is_previous_maps_to_is_prev() {
        let gws = gameweeks_from_bootstrap(&json!({
            "events": [
                {"id": 1, "is_previous": true, "finished": true},
                {"id": 2, "is_current": true},
                {"id": 3, "is_next": true},
            ]
        }))
        .expect("events present");
        assert!(gws[0].is_prev);
        assert_eq!(current_gameweek(&gws).map(|gw| gw.id), Some(2));
        assert_eq!(gws[2].status(), "next");

        // The stored column name survives a round trip through the table
        let stored = serde_json::to_value(&gws[0]).expect("serializes");
        assert_eq!(stored["is_prev"], json!(true));
        let back: Gameweek = serde_json::from_value(stored).expect("deserializes");
        assert!(back.is_prev);
    }

    #[test]
    fn test_deadline_parsing() {
        let gw: Gameweek = serde_json::from_value(json!({
            "id": 1,
            "deadline_time": "2024-08-16T17:30:00Z"
        }))
        .expect("valid");
        assert_eq!(gw.formatted_deadline(), "Fri 16 Aug 17:30");

        let tbd: Gameweek = serde_json::from_value(json!({"id": 2, "deadline_time": null}))
            .expect("valid");
        assert_eq!(tbd.formatted_deadline(), "TBD");
    }

    #[test]
    fn test_missing_events_is_none() {
        assert!(gameweeks_from_bootstrap(&json!({"elements": []})).is_none());
    }
}
