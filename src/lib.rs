//! fixturecache - team-fixtures cache core.
//!
//! Refreshes cached recent-match data per team from a rate-limited
//! upstream sports-data source, stores it durably, derives W/D/L form
//! strings for home/away/combined views, and exposes token-gated cache
//! health and invalidation operations.
//!
//! - [`api`]: upstream fetcher seam, REST client, request pacing
//! - [`cache`]: durable store seam and the batch refresh orchestrator
//! - [`form`]: pure form-string calculation
//! - [`admin`]: bearer-token-gated administrative surface
//! - [`config`]: environment-driven runtime configuration
//!
//! The upstream client and the durable store are injected behind traits
//! (`FixtureFetcher`, `FixtureStore`), so embedding applications wire the
//! production implementations while tests substitute doubles.

pub mod admin;
pub mod api;
pub mod cache;
pub mod config;
pub mod form;
pub mod models;

pub use admin::{AdminError, CacheAdmin, MAX_SNAPSHOT_LOOKBACK_HOURS};
pub use api::{FetchError, FixtureFetcher, RateLimiter, SportsApiClient};
pub use cache::{FixtureStore, JsonFileStore, RefreshConfig, RefreshError, RefreshOrchestrator};
pub use config::Config;
pub use form::{calculate_form_from_fixtures, FormScope, FORM_WINDOW};
pub use models::{
    CacheEntry, CacheStats, CronJobStatus, FixtureRecord, FixtureStatus, MonitoringSnapshot,
    RefreshResult, TeamRefreshError,
};
