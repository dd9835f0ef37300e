//! Upstream sports-data API module.
//!
//! This module provides the `FixtureFetcher` seam to the external fixtures
//! source, the `SportsApiClient` REST implementation, and the request
//! pacing used to stay inside the upstream quota.

pub mod client;
pub mod error;
pub mod ratelimit;

pub use client::{FixtureFetcher, SportsApiClient};
pub use error::FetchError;
pub use ratelimit::RateLimiter;
