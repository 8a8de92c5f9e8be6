use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One row of the teams table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub strength: Option<i64>,
    #[serde(default)]
    pub strength_overall_home: Option<i64>,
    #[serde(default)]
    pub strength_overall_away: Option<i64>,
    #[serde(default)]
    pub strength_attack_home: Option<i64>,
    #[serde(default)]
    pub strength_attack_away: Option<i64>,
    #[serde(default)]
    pub strength_defence_home: Option<i64>,
    #[serde(default)]
    pub strength_defence_away: Option<i64>,
}

/// Build the teams table from a bootstrap snapshot, trimming names.
///
/// `None` when the snapshot has no `teams` array.
pub fn teams_from_bootstrap(bootstrap: &Value) -> Option<Vec<Team>> {
    let raw = bootstrap.get("teams")?.as_array()?;

    let teams = raw
        .iter()
        .filter_map(|item| match serde_json::from_value::<Team>(item.clone()) {
            Ok(mut team) => {
                team.name = team.name.trim().to_string();
                team.short_name = team.short_name.trim().to_string();
                Some(team)
            }
            Err(e) => {
                warn!(error = %e, "Skipping malformed team record");
                None
            }
        })
        .collect();

    Some(teams)
}

/// Find a team by display name (case-insensitive) or short name.
pub fn find_team<'a>(teams: &'a [Team], query: &str) -> Option<&'a Team> {
    let query = query.trim();
    teams.iter().find(|t| {
        t.name.eq_ignore_ascii_case(query) || t.short_name.eq_ignore_ascii_case(query)
    })
}
