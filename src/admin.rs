//! Administrative cache surface.
//!
//! Stats, expired-entry cleanup, monitoring snapshots, and cron-status
//! reflection. Every operation requires the configured bearer token and
//! rejects on mismatch before touching the store, so an unauthorized call
//! has no side effects.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::cache::FixtureStore;
use crate::models::{CacheStats, CronJobStatus, MonitoringSnapshot};

/// Longest snapshot look-back honored by `list_snapshots` (one week).
/// Requests for more are clamped, not rejected.
pub const MAX_SNAPSHOT_LOOKBACK_HOURS: i64 = 168;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("invalid or missing admin token")]
    Unauthorized,

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub struct CacheAdmin {
    store: Arc<dyn FixtureStore>,
    admin_token: String,
}

impl CacheAdmin {
    pub fn new(store: Arc<dyn FixtureStore>, admin_token: impl Into<String>) -> Self {
        Self {
            store,
            admin_token: admin_token.into(),
        }
    }

    /// Compare the presented bearer token against the configured secret.
    /// An empty configured secret never matches: a missing deployment
    /// secret must close the surface, not open it.
    fn authorize(&self, token: &str) -> Result<(), AdminError> {
        if self.admin_token.is_empty() || token != self.admin_token {
            return Err(AdminError::Unauthorized);
        }
        Ok(())
    }

    pub fn stats(&self, token: &str) -> Result<CacheStats, AdminError> {
        self.authorize(token)?;
        Ok(self.store.stats()?)
    }

    pub fn cleanup_expired(&self, token: &str) -> Result<usize, AdminError> {
        self.authorize(token)?;
        let deleted = self.store.delete_expired()?;
        info!(deleted, "Expired cache entries cleaned up");
        Ok(deleted)
    }

    pub fn record_snapshot(&self, token: &str) -> Result<MonitoringSnapshot, AdminError> {
        self.authorize(token)?;
        Ok(self.store.record_snapshot()?)
    }

    /// Snapshots within the look-back window, oldest first. The window is
    /// clamped to [`MAX_SNAPSHOT_LOOKBACK_HOURS`].
    pub fn list_snapshots(
        &self,
        token: &str,
        hours_back: i64,
    ) -> Result<Vec<MonitoringSnapshot>, AdminError> {
        self.authorize(token)?;
        let hours = hours_back.clamp(0, MAX_SNAPSHOT_LOOKBACK_HOURS);
        Ok(self.store.list_snapshots(hours)?)
    }

    pub fn prune_snapshots(&self, token: &str) -> Result<usize, AdminError> {
        self.authorize(token)?;
        let pruned = self.store.prune_snapshots()?;
        info!(pruned, "Old monitoring snapshots pruned");
        Ok(pruned)
    }

    /// Read-only reflection of externally scheduled job metadata.
    pub fn cron_status(&self, token: &str) -> Result<Vec<CronJobStatus>, AdminError> {
        self.authorize(token)?;
        Ok(self.store.cron_status()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;

    use crate::models::{CacheEntry, FixtureRecord};

    /// Store double that records whether it was touched and which
    /// look-back window it was asked for.
    #[derive(Default)]
    struct RecordingStore {
        touched: AtomicBool,
        requested_hours: Mutex<Option<i64>>,
    }

    impl RecordingStore {
        fn touch(&self) {
            self.touched.store(true, Ordering::SeqCst);
        }
    }

    impl FixtureStore for RecordingStore {
        fn get(&self, _: i64, _: i64, _: i32) -> anyhow::Result<Option<CacheEntry>> {
            self.touch();
            Ok(None)
        }

        fn put(&self, _: &CacheEntry) -> anyhow::Result<()> {
            self.touch();
            Ok(())
        }

        fn delete_expired(&self) -> anyhow::Result<usize> {
            self.touch();
            Ok(3)
        }

        fn list_all(&self, _: i64, _: i32) -> anyhow::Result<HashMap<i64, Vec<FixtureRecord>>> {
            self.touch();
            Ok(HashMap::new())
        }

        fn stats(&self) -> anyhow::Result<CacheStats> {
            self.touch();
            Ok(CacheStats {
                total_entries: 5,
                expired_entries: 2,
            })
        }

        fn record_snapshot(&self) -> anyhow::Result<MonitoringSnapshot> {
            self.touch();
            Ok(MonitoringSnapshot {
                recorded_at: Utc::now(),
                total_entries: 5,
                expired_entries: 2,
            })
        }

        fn list_snapshots(&self, hours_back: i64) -> anyhow::Result<Vec<MonitoringSnapshot>> {
            self.touch();
            *self.requested_hours.lock().unwrap() = Some(hours_back);
            Ok(Vec::new())
        }

        fn prune_snapshots(&self) -> anyhow::Result<usize> {
            self.touch();
            Ok(1)
        }

        fn cron_status(&self) -> anyhow::Result<Vec<CronJobStatus>> {
            self.touch();
            Ok(Vec::new())
        }
    }

    fn admin_with_store() -> (CacheAdmin, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::default());
        let admin = CacheAdmin::new(Arc::clone(&store) as Arc<dyn FixtureStore>, "s3cret");
        (admin, store)
    }

    #[test]
    fn test_valid_token_is_accepted() {
        let (admin, _) = admin_with_store();
        let stats = admin.stats("s3cret").expect("stats failed");
        assert_eq!(stats.total_entries, 5);
        assert_eq!(admin.cleanup_expired("s3cret").expect("cleanup failed"), 3);
    }

    #[test]
    fn test_bad_token_rejected_before_store_access() {
        let (admin, store) = admin_with_store();

        assert!(matches!(admin.stats("wrong"), Err(AdminError::Unauthorized)));
        assert!(matches!(admin.cleanup_expired(""), Err(AdminError::Unauthorized)));
        assert!(matches!(
            admin.list_snapshots("nope", 24),
            Err(AdminError::Unauthorized)
        ));
        assert!(matches!(admin.cron_status("nope"), Err(AdminError::Unauthorized)));

        assert!(!store.touched.load(Ordering::SeqCst));
    }

    #[test]
    fn test_empty_secret_never_matches() {
        let store = Arc::new(RecordingStore::default());
        let admin = CacheAdmin::new(Arc::clone(&store) as Arc<dyn FixtureStore>, "");

        assert!(matches!(admin.stats(""), Err(AdminError::Unauthorized)));
        assert!(!store.touched.load(Ordering::SeqCst));
    }

    #[test]
    fn test_lookback_clamped_to_maximum() {
        let (admin, store) = admin_with_store();

        admin.list_snapshots("s3cret", 200).expect("list failed");
        assert_eq!(*store.requested_hours.lock().unwrap(), Some(MAX_SNAPSHOT_LOOKBACK_HOURS));

        admin.list_snapshots("s3cret", 24).expect("list failed");
        assert_eq!(*store.requested_hours.lock().unwrap(), Some(24));

        admin.list_snapshots("s3cret", -5).expect("list failed");
        assert_eq!(*store.requested_hours.lock().unwrap(), Some(0));
    }
}
