//! Data models for the fixtures cache.
//!
//! This module contains the validated data structures used at the
//! subsystem's boundaries:
//!
//! - `FixtureRecord`, `FixtureStatus`: a single match and its lifecycle
//! - `CacheEntry`: cached fixtures plus fetch timestamp and ttl
//! - `RefreshResult`, `TeamRefreshError`: batch refresh outcome counts
//! - `CacheStats`, `MonitoringSnapshot`: cache health aggregates
//! - `CronJobStatus`: externally scheduled job metadata (read-only)

pub mod cache;
pub mod fixture;

pub use cache::{
    CacheEntry, CacheStats, CronJobStatus, MonitoringSnapshot, RefreshResult, TeamRefreshError,
};
pub use fixture::{FixtureRecord, FixtureStatus};
