use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::fixture::FixtureRecord;

/// Cached recent fixtures for one (team, league, season) key.
/// Replaced wholesale on each successful refresh; never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub team_id: i64,
    pub league_id: i64,
    pub season: i32,
    pub fixtures: Vec<FixtureRecord>,
    pub fetched_at: DateTime<Utc>,
    pub ttl_minutes: i64,
}

impl CacheEntry {
    pub fn new(
        team_id: i64,
        league_id: i64,
        season: i32,
        fixtures: Vec<FixtureRecord>,
        ttl_minutes: i64,
    ) -> Self {
        Self {
            team_id,
            league_id,
            season,
            fixtures,
            fetched_at: Utc::now(),
            ttl_minutes,
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.fetched_at).num_minutes()
    }

    /// An entry is expired once its age exceeds its ttl. Negative ages from
    /// clock skew count as fresh.
    pub fn is_expired(&self) -> bool {
        self.fetched_at + Duration::minutes(self.ttl_minutes) < Utc::now()
    }
}

/// Aggregate counts over the whole store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
}

/// Point-in-time record of cache health, appended on explicit trigger and
/// pruned after the retention horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSnapshot {
    pub recorded_at: DateTime<Utc>,
    pub total_entries: usize,
    pub expired_entries: usize,
}

/// Metadata for an externally scheduled job, reflected read-only from the
/// store. This core never schedules or updates jobs itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronJobStatus {
    pub name: String,
    pub last_run: Option<DateTime<Utc>>,
    pub last_status: Option<String>,
    pub next_run: Option<DateTime<Utc>>,
}

/// Outcome of one batch refresh invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshResult {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    #[serde(default)]
    pub errors: Vec<TeamRefreshError>,
}

/// Per-team failure detail collected during a batch refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRefreshError {
    pub team_id: i64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_not_expired() {
        let entry = CacheEntry::new(10, 39, 2025, vec![], 60);
        assert!(!entry.is_expired());
        assert!(entry.age_minutes() <= 1);
    }

    #[test]
    fn test_entry_expires_past_ttl() {
        let mut entry = CacheEntry::new(10, 39, 2025, vec![], 60);
        entry.fetched_at = Utc::now() - Duration::minutes(61);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_clock_skew_counts_as_fresh() {
        let mut entry = CacheEntry::new(10, 39, 2025, vec![], 60);
        entry.fetched_at = Utc::now() + Duration::minutes(5);
        assert!(!entry.is_expired());
    }
}
