//! Team form derivation from cached fixtures.
//!
//! Pure computation over an ordered fixture list: no clock, no store, no
//! upstream access. Callers read cached fixtures and pass them through
//! here to enrich standings or display data.

use std::cmp::Ordering;

use crate::models::FixtureRecord;

/// Number of most recent finished fixtures contributing to a form string.
pub const FORM_WINDOW: usize = 5;

/// Which of a team's fixtures contribute to its form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormScope {
    /// Only fixtures where the team was the home side.
    Home,
    /// Only fixtures where the team was the away side.
    Away,
    /// Every fixture the team played.
    All,
}

/// Compute a W/D/L form string for `team_id` from `fixtures`.
///
/// Only finished fixtures with both scores present are considered. The
/// most recent [`FORM_WINDOW`] qualifying fixtures are selected by date and
/// the result characters are emitted oldest first, so the string reads
/// left to right toward the present ("WD" = a win, then a draw).
///
/// A team that appears in no qualifying fixture yields an empty string,
/// never an error.
pub fn calculate_form_from_fixtures(
    fixtures: &[FixtureRecord],
    team_id: i64,
    scope: FormScope,
) -> String {
    let mut played: Vec<&FixtureRecord> = fixtures
        .iter()
        .filter(|f| match scope {
            FormScope::Home => f.home_team_id == team_id,
            FormScope::Away => f.away_team_id == team_id,
            FormScope::All => f.involves(team_id),
        })
        .filter(|f| f.is_finished())
        .collect();

    played.sort_by_key(|f| f.date);

    let start = played.len().saturating_sub(FORM_WINDOW);
    played[start..]
        .iter()
        .filter_map(|f| f.score_for(team_id))
        .map(|(own, opponent)| match own.cmp(&opponent) {
            Ordering::Greater => 'W',
            Ordering::Less => 'L',
            Ordering::Equal => 'D',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FixtureStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn fixture(
        id: i64,
        days_ago: i64,
        home: i64,
        away: i64,
        score: Option<(u32, u32)>,
        status: FixtureStatus,
    ) -> FixtureRecord {
        FixtureRecord {
            fixture_id: id,
            date: Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap() - Duration::days(days_ago),
            home_team_id: home,
            away_team_id: away,
            home_score: score.map(|(h, _)| h),
            away_score: score.map(|(_, a)| a),
            status,
        }
    }

    #[test]
    fn test_unfinished_fixtures_excluded_from_form() {
        // Oldest first: home win 2-1, away draw 0-0, then a scheduled match.
        let fixtures = vec![
            fixture(1, 14, 10, 20, Some((2, 1)), FixtureStatus::Finished),
            fixture(2, 7, 30, 10, Some((0, 0)), FixtureStatus::Finished),
            fixture(3, 0, 10, 40, None, FixtureStatus::Scheduled),
        ];

        assert_eq!(calculate_form_from_fixtures(&fixtures, 10, FormScope::All), "WD");
    }

    #[test]
    fn test_scope_filters_sides() {
        let fixtures = vec![
            // Team 10 away, loses 3-1.
            fixture(1, 10, 40, 10, Some((3, 1)), FixtureStatus::Finished),
            // Team 10 home, wins 2-0.
            fixture(2, 5, 10, 20, Some((2, 0)), FixtureStatus::Finished),
        ];

        assert_eq!(calculate_form_from_fixtures(&fixtures, 10, FormScope::Home), "W");
        assert_eq!(calculate_form_from_fixtures(&fixtures, 10, FormScope::Away), "L");
        assert_eq!(calculate_form_from_fixtures(&fixtures, 10, FormScope::All), "LW");
    }

    #[test]
    fn test_window_keeps_most_recent() {
        // Seven finished fixtures, oldest two are wins; window must drop them.
        let mut fixtures = Vec::new();
        for i in 0..2 {
            fixtures.push(fixture(i, 60 - i, 10, 20 + i, Some((1, 0)), FixtureStatus::Finished));
        }
        for i in 2..7 {
            fixtures.push(fixture(i, 60 - i, 10, 20 + i, Some((0, 1)), FixtureStatus::Finished));
        }

        assert_eq!(calculate_form_from_fixtures(&fixtures, 10, FormScope::All), "LLLLL");
    }

    #[test]
    fn test_order_is_oldest_first() {
        let fixtures = vec![
            fixture(1, 1, 10, 20, Some((0, 2)), FixtureStatus::Finished),
            fixture(2, 20, 10, 30, Some((4, 0)), FixtureStatus::Finished),
        ];
        // The win is 20 days old, the loss is yesterday.
        assert_eq!(calculate_form_from_fixtures(&fixtures, 10, FormScope::All), "WL");
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut fixtures = vec![
            fixture(1, 3, 10, 20, Some((1, 0)), FixtureStatus::Finished),
            fixture(2, 2, 30, 10, Some((2, 2)), FixtureStatus::Finished),
            fixture(3, 1, 10, 40, Some((0, 1)), FixtureStatus::Finished),
        ];
        let forward = calculate_form_from_fixtures(&fixtures, 10, FormScope::All);
        fixtures.reverse();
        let reversed = calculate_form_from_fixtures(&fixtures, 10, FormScope::All);
        assert_eq!(forward, "WDL");
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_deterministic() {
        let fixtures = vec![
            fixture(1, 4, 10, 20, Some((2, 1)), FixtureStatus::Finished),
            fixture(2, 2, 20, 10, Some((1, 1)), FixtureStatus::Finished),
        ];
        let a = calculate_form_from_fixtures(&fixtures, 10, FormScope::All);
        let b = calculate_form_from_fixtures(&fixtures, 10, FormScope::All);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_and_unknown_team_yield_empty() {
        assert_eq!(calculate_form_from_fixtures(&[], 10, FormScope::All), "");

        let fixtures = vec![fixture(1, 3, 20, 30, Some((1, 0)), FixtureStatus::Finished)];
        assert_eq!(calculate_form_from_fixtures(&fixtures, 10, FormScope::All), "");
    }

    #[test]
    fn test_finished_without_scores_excluded() {
        let fixtures = vec![fixture(1, 3, 10, 20, None, FixtureStatus::Finished)];
        assert_eq!(calculate_form_from_fixtures(&fixtures, 10, FormScope::All), "");
    }
}
