//! Batch refresh orchestration.
//!
//! One logical refresh call fans stale teams out across a bounded worker
//! pool, paced by the upstream rate limiter. Per-team fetch failures are
//! recorded and the batch continues; only whole-batch preconditions
//! (validation, store unavailability) surface as errors to the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{FetchError, FixtureFetcher, RateLimiter};
use crate::models::{CacheEntry, FixtureRecord, RefreshResult, TeamRefreshError};

use super::FixtureStore;

/// Seasons outside this range are rejected as caller mistakes.
const SEASON_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("invalid refresh request: {0}")]
    Validation(String),

    #[error("cache store unavailable: {0}")]
    Store(#[source] anyhow::Error),
}

/// Tunables for a batch refresh.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Worker-pool width: maximum in-flight upstream requests.
    pub max_concurrent: usize,
    /// Minimum spacing between upstream requests across the whole pool.
    pub min_request_spacing: Duration,
    /// Bound on a single fetch; an expired slot marks the team failed.
    pub fetch_timeout: Duration,
    /// Ttl written onto refreshed entries.
    pub ttl_minutes: i64,
    /// How many recent fixtures to request per team. Twice the form window,
    /// so home-only and away-only form still have a full window to draw on.
    pub last_n: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            min_request_spacing: Duration::from_millis(250),
            fetch_timeout: Duration::from_secs(30),
            ttl_minutes: 60,
            last_n: (crate::form::FORM_WINDOW * 2) as u32,
        }
    }
}

/// Drives batch refreshes of the team-fixtures cache.
///
/// Fetcher and store are injected collaborators, so tests run against
/// scripted doubles and the production wiring supplies `SportsApiClient`
/// and `JsonFileStore`.
pub struct RefreshOrchestrator {
    fetcher: Arc<dyn FixtureFetcher>,
    store: Arc<dyn FixtureStore>,
    limiter: Arc<RateLimiter>,
    config: RefreshConfig,
}

impl RefreshOrchestrator {
    pub fn new(
        fetcher: Arc<dyn FixtureFetcher>,
        store: Arc<dyn FixtureStore>,
        config: RefreshConfig,
    ) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.min_request_spacing));
        Self {
            fetcher,
            store,
            limiter,
            config,
        }
    }

    /// Refresh the cached fixtures for `team_ids` in `league_id`/`season`.
    ///
    /// Teams with a non-expired entry are skipped without any upstream
    /// call. Stale teams are fetched with bounded concurrency; each
    /// success overwrites its entry wholesale with `fetched_at = now`.
    /// Immediately re-invoking after a full success yields all-skip.
    ///
    /// Duplicate team ids are processed independently; callers that want
    /// one fetch per team should dedup first.
    pub async fn refresh_team_fixtures_cache(
        &self,
        team_ids: &[i64],
        league_id: i64,
        season: i32,
    ) -> Result<RefreshResult, RefreshError> {
        Self::validate(team_ids, league_id, season)?;

        let mut result = RefreshResult::default();
        let mut stale = Vec::new();

        for &team_id in team_ids {
            match self
                .store
                .get(team_id, league_id, season)
                .map_err(RefreshError::Store)?
            {
                Some(entry) if !entry.is_expired() => {
                    debug!(team_id, age_minutes = entry.age_minutes(), "Entry still fresh, skipping");
                    result.skipped += 1;
                }
                _ => stale.push(team_id),
            }
        }

        if stale.is_empty() {
            debug!(skipped = result.skipped, "All entries fresh, nothing to refresh");
            return Ok(result);
        }

        info!(
            requested = team_ids.len(),
            stale = stale.len(),
            league_id,
            season,
            "Refreshing stale team fixtures"
        );

        let fetch_timeout = self.config.fetch_timeout;
        let last_n = self.config.last_n;

        let outcomes: Vec<(i64, Result<Vec<FixtureRecord>, FetchError>)> = stream::iter(stale)
            .map(|team_id| {
                let fetcher = Arc::clone(&self.fetcher);
                let limiter = Arc::clone(&self.limiter);
                async move {
                    limiter.acquire().await;
                    let outcome = match tokio::time::timeout(
                        fetch_timeout,
                        fetcher.fetch_fixtures_for_team(team_id, league_id, season, last_n),
                    )
                    .await
                    {
                        Ok(fetched) => fetched,
                        Err(_) => Err(FetchError::timed_out()),
                    };
                    (team_id, outcome)
                }
            })
            .buffer_unordered(self.config.max_concurrent)
            .collect()
            .await;

        // Single accumulation pass over the collected outcomes: counters and
        // writes stay race-free without atomics, and a store failure aborts
        // the batch instead of masquerading as a per-team error.
        for (team_id, outcome) in outcomes {
            match outcome {
                Ok(fixtures) => {
                    let entry = CacheEntry::new(
                        team_id,
                        league_id,
                        season,
                        fixtures,
                        self.config.ttl_minutes,
                    );
                    self.store.put(&entry).map_err(RefreshError::Store)?;
                    result.success += 1;
                }
                Err(err) => {
                    warn!(team_id, error = %err, "Fixture refresh failed for team");
                    result.failed += 1;
                    result.errors.push(TeamRefreshError {
                        team_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            success = result.success,
            failed = result.failed,
            skipped = result.skipped,
            "Batch refresh complete"
        );
        Ok(result)
    }

    /// All cached fixtures for a league/season, keyed by team.
    ///
    /// Never blocks on an in-progress refresh: returns whatever is stored,
    /// including stale entries (staleness is observable via `fetched_at`).
    pub fn all_team_fixtures(
        &self,
        league_id: i64,
        season: i32,
    ) -> Result<HashMap<i64, Vec<FixtureRecord>>, RefreshError> {
        self.store
            .list_all(league_id, season)
            .map_err(RefreshError::Store)
    }

    fn validate(team_ids: &[i64], league_id: i64, season: i32) -> Result<(), RefreshError> {
        if team_ids.is_empty() {
            return Err(RefreshError::Validation("team list is empty".to_string()));
        }
        if team_ids.iter().any(|&id| id <= 0) {
            return Err(RefreshError::Validation("team ids must be positive".to_string()));
        }
        if league_id <= 0 {
            return Err(RefreshError::Validation(format!(
                "invalid league id {}",
                league_id
            )));
        }
        if !SEASON_RANGE.contains(&season) {
            return Err(RefreshError::Validation(format!("invalid season {}", season)));
        }
        Ok(())
    }
}
