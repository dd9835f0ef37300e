//! Fixture caching module.
//!
//! This module provides the durable `FixtureStore` seam with its JSON-file
//! implementation, and the `RefreshOrchestrator` that drives rate-limited
//! batch refreshes against the upstream source.
//!
//! Entries are keyed by (team, league, season), carry their fetch
//! timestamp and ttl, and are replaced wholesale on refresh.

pub mod refresh;
pub mod store;

pub use refresh::{RefreshConfig, RefreshError, RefreshOrchestrator};
pub use store::{FixtureStore, JsonFileStore};
