use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a fixture as reported by the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureStatus {
    Scheduled,
    InProgress,
    Finished,
    Postponed,
    Cancelled,
}

impl FixtureStatus {
    /// Map the provider's short status codes onto lifecycle states.
    /// Unknown codes are treated as `Scheduled` so they never count toward
    /// form or score-derived data.
    pub fn from_short_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "FT" | "AET" | "PEN" => FixtureStatus::Finished,
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" | "INT" | "SUSP" => {
                FixtureStatus::InProgress
            }
            "PST" => FixtureStatus::Postponed,
            "CANC" | "ABD" => FixtureStatus::Cancelled,
            _ => FixtureStatus::Scheduled,
        }
    }
}

impl std::fmt::Display for FixtureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureStatus::Scheduled => write!(f, "scheduled"),
            FixtureStatus::InProgress => write!(f, "in progress"),
            FixtureStatus::Finished => write!(f, "finished"),
            FixtureStatus::Postponed => write!(f, "postponed"),
            FixtureStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A single scheduled or played match between two teams.
/// Immutable once `status` is `Finished`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub fixture_id: i64,
    pub date: DateTime<Utc>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: FixtureStatus,
}

impl FixtureRecord {
    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// A fixture only counts as finished when the provider marked it final
    /// AND both scores are present.
    pub fn is_finished(&self) -> bool {
        self.status == FixtureStatus::Finished
            && self.home_score.is_some()
            && self.away_score.is_some()
    }

    /// Scores from `team_id`'s perspective: (own goals, opponent goals).
    /// None when the team did not play in this fixture or a score is missing.
    pub fn score_for(&self, team_id: i64) -> Option<(u32, u32)> {
        let home = self.home_score?;
        let away = self.away_score?;
        if self.home_team_id == team_id {
            Some((home, away))
        } else if self.away_team_id == team_id {
            Some((away, home))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(home: i64, away: i64, score: Option<(u32, u32)>, status: FixtureStatus) -> FixtureRecord {
        FixtureRecord {
            fixture_id: 1,
            date: Utc::now(),
            home_team_id: home,
            away_team_id: away,
            home_score: score.map(|(h, _)| h),
            away_score: score.map(|(_, a)| a),
            status,
        }
    }

    #[test]
    fn test_status_from_short_code() {
        assert_eq!(FixtureStatus::from_short_code("FT"), FixtureStatus::Finished);
        assert_eq!(FixtureStatus::from_short_code("aet"), FixtureStatus::Finished);
        assert_eq!(FixtureStatus::from_short_code("HT"), FixtureStatus::InProgress);
        assert_eq!(FixtureStatus::from_short_code("PST"), FixtureStatus::Postponed);
        assert_eq!(FixtureStatus::from_short_code("CANC"), FixtureStatus::Cancelled);
        // Unknown codes fall back to scheduled
        assert_eq!(FixtureStatus::from_short_code("NS"), FixtureStatus::Scheduled);
        assert_eq!(FixtureStatus::from_short_code("???"), FixtureStatus::Scheduled);
    }

    #[test]
    fn test_is_finished_requires_both_scores() {
        let done = fixture(10, 20, Some((2, 1)), FixtureStatus::Finished);
        assert!(done.is_finished());

        let mut missing = fixture(10, 20, Some((2, 1)), FixtureStatus::Finished);
        missing.away_score = None;
        assert!(!missing.is_finished());

        let live = fixture(10, 20, Some((1, 1)), FixtureStatus::InProgress);
        assert!(!live.is_finished());
    }

    #[test]
    fn test_score_for_perspective() {
        let f = fixture(10, 20, Some((2, 1)), FixtureStatus::Finished);
        assert_eq!(f.score_for(10), Some((2, 1)));
        assert_eq!(f.score_for(20), Some((1, 2)));
        assert_eq!(f.score_for(99), None);
    }
}
