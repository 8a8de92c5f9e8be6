use serde::{Deserialize, Serialize};

use super::team::Team;

/// Difficulty assumed when a fixture carries no rating for the side.
const DEFAULT_DIFFICULTY: i64 = 3;

/// Raw fixture record from the `fixtures` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: i64,
    /// Gameweek; unscheduled (postponed) fixtures have none.
    #[serde(default)]
    pub event: Option<i64>,
    pub team_h: i64,
    pub team_a: i64,
    #[serde(default)]
    pub team_h_difficulty: Option<i64>,
    #[serde(default)]
    pub team_a_difficulty: Option<i64>,
    #[serde(default)]
    pub team_h_score: Option<i64>,
    #[serde(default)]
    pub team_a_score: Option<i64>,
    #[serde(default)]
    pub kickoff_time: Option<String>,
    #[serde(default)]
    pub finished: bool,
}

impl Fixture {
    pub fn involves(&self, team_id: i64) -> bool {
        self.team_h == team_id || self.team_a == team_id
    }
}

/// Fixture difficulty rating label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Fdr {
    Easy,
    Medium,
    Hard,
    #[serde(rename = "Very Hard")]
    VeryHard,
    Extreme,
    Unknown,
}

impl Fdr {
    /// Map a 1-5 difficulty to its label. Anything else is `Unknown`.
    pub fn from_difficulty(difficulty: i64) -> Self {
        match difficulty {
            1 => Fdr::Easy,
            2 => Fdr::Medium,
            3 => Fdr::Hard,
            4 => Fdr::VeryHard,
            5 => Fdr::Extreme,
            _ => Fdr::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Fdr::Easy => "Easy",
            Fdr::Medium => "Medium",
            Fdr::Hard => "Hard",
            Fdr::VeryHard => "Very Hard",
            Fdr::Extreme => "Extreme",
            Fdr::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Fdr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Venue::Home => write!(f, "Home"),
            Venue::Away => write!(f, "Away"),
        }
    }
}

/// An upcoming fixture from one team's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureDifficulty {
    pub gameweek: i64,
    pub opponent: String,
    pub home_away: Venue,
    pub difficulty: i64,
    pub fdr: Fdr,
}

/// Resolve `team_id`'s fixtures into difficulty rows.
///
/// Only the first `num_gameweeks * 2` fixtures are looked at, leaving room
/// for blank and postponed weeks before callers truncate. Fixtures without a
/// gameweek or with an opponent missing from `teams` are skipped.
pub fn fixture_difficulties(
    team_id: i64,
    fixtures: &[Fixture],
    teams: &[Team],
    num_gameweeks: usize,
) -> Vec<FixtureDifficulty> {
    if fixtures.is_empty() || teams.is_empty() {
        return Vec::new();
    }

    fixtures
        .iter()
        .take(num_gameweeks.saturating_mul(2))
        .filter_map(|fixture| {
            let gameweek = fixture.event?;
            let home = fixture.team_a != team_id;
            let opponent_id = if home { fixture.team_a } else { fixture.team_h };
            let opponent = teams.iter().find(|t| t.id == opponent_id)?;

            // Upstream field selection kept as the original dashboard reads it
            let difficulty = if home {
                fixture.team_a_difficulty
            } else {
                fixture.team_h_difficulty
            }
            .unwrap_or(DEFAULT_DIFFICULTY);

            Some(FixtureDifficulty {
                gameweek,
                opponent: opponent.short_name.clone(),
                home_away: if home { Venue::Home } else { Venue::Away },
                difficulty,
                fdr: Fdr::from_difficulty(difficulty),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn teams() -> Vec<Team> {
        serde_json::from_value(json!([
            {"id": 1, "name": "Arsenal", "short_name": "ARS"},
            {"id": 2, "name": "Aston Villa", "short_name": "AVL"},
            {"id": 3, "name": "Bournemouth", "short_name": "BOU"},
        ]))
        .expect("valid teams")
    }

    fn fixture(id: i64, event: Option<i64>, h: i64, a: i64, hd: i64, ad: i64) -> Fixture {
        Fixture {
            id,
            event,
            team_h: h,
            team_a: a,
            team_h_difficulty: Some(hd),
            team_a_difficulty: Some(ad),
            team_h_score: None,
            team_a_score: None,
            kickoff_time: None,
            finished: false,
        }
    }

    #[test]
    fn test_fdr_labels() {
        assert_eq!(Fdr::from_difficulty(1), Fdr::Easy);
        assert_eq!(Fdr::from_difficulty(2), Fdr::Medium);
        assert_eq!(Fdr::from_difficulty(3), Fdr::Hard);
        assert_eq!(Fdr::from_difficulty(4), Fdr::VeryHard);
        assert_eq!(Fdr::from_difficulty(5), Fdr::Extreme);
        assert_eq!(Fdr::from_difficulty(9), Fdr::Unknown);
        assert_eq!(Fdr::from_difficulty(0).to_string(), "Unknown");
        assert_eq!(Fdr::VeryHard.to_string(), "Very Hard");
    }

    #[test]
    fn test_fdr_serializes_as_label() {
        assert_eq!(serde_json::to_value(Fdr::VeryHard).expect("ser"), json!("Very Hard"));
    }

    #[test]
    fn test_home_and_away_resolution() {
        let fixtures = vec![
            fixture(10, Some(1), 1, 2, 2, 4),
            fixture(11, Some(2), 3, 1, 5, 1),
        ];
        let rows = fixture_difficulties(1, &fixtures, &teams(), 5);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].opponent, "AVL");
        assert_eq!(rows[0].home_away, Venue::Home);
        assert_eq!(rows[0].difficulty, 4);
        assert_eq!(rows[0].fdr, Fdr::VeryHard);

        assert_eq!(rows[1].opponent, "BOU");
        assert_eq!(rows[1].home_away, Venue::Away);
        assert_eq!(rows[1].difficulty, 5);
        assert_eq!(rows[1].fdr, Fdr::Extreme);
    }

    #[test]
    fn test_skips_unscheduled_and_unknown_opponents() {
        let fixtures = vec![
            fixture(10, None, 1, 2, 2, 2),
            fixture(11, Some(2), 1, 99, 2, 2),
            fixture(12, Some(3), 2, 1, 3, 3),
        ];
        let rows = fixture_difficulties(1, &fixtures, &teams(), 5);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gameweek, 3);
    }

    #[test]
    fn test_looks_at_twice_the_requested_gameweeks() {
        let fixtures: Vec<Fixture> = (1..=10).map(|gw| fixture(gw, Some(gw), 1, 2, 2, 2)).collect();
        assert_eq!(fixture_difficulties(1, &fixtures, &teams(), 2).len(), 4);
        assert_eq!(fixture_difficulties(1, &fixtures, &teams(), 0).len(), 0);
    }

    #[test]
    fn test_huge_gameweek_count_takes_everything() {
        let fixtures: Vec<Fixture> = (1..=3).map(|gw| fixture(gw, Some(gw), 1, 2, 2, 2)).collect();
        assert_eq!(fixture_difficulties(1, &fixtures, &teams(), usize::MAX).len(), 3);
    }

    #[test]
    fn test_missing_difficulty_defaults_to_hard() {
        let mut f = fixture(10, Some(1), 1, 2, 2, 2);
        f.team_a_difficulty = None;
        let rows = fixture_difficulties(1, &[f], &teams(), 5);
        assert_eq!(rows[0].difficulty, 3);
        assert_eq!(rows[0].fdr, Fdr::Hard);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(fixture_difficulties(1, &[], &teams(), 5).is_empty());
        assert!(fixture_difficulties(1, &[fixture(1, Some(1), 1, 2, 2, 2)], &[], 5).is_empty());
    }
}
