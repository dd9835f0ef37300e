//! Durable fixture store.
//!
//! The `FixtureStore` trait is the seam to the durable backing store; the
//! `JsonFileStore` implementation keeps one JSON file per cached
//! (team, league, season) key plus sibling files for monitoring snapshots
//! and externally written cron-job metadata.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use tracing::debug;

use crate::models::{
    CacheEntry, CacheStats, CronJobStatus, FixtureRecord, MonitoringSnapshot,
};

/// Snapshots older than this horizon are dropped by `prune_snapshots`.
const SNAPSHOT_RETENTION_DAYS: i64 = 30;

/// File name prefix for cached fixture entries.
const ENTRY_PREFIX: &str = "fixtures_";

/// Monitoring snapshot time series, append-only until pruned.
const SNAPSHOT_FILE: &str = "snapshots.json";

/// Cron-job metadata written by the external scheduler; read-only here.
const CRON_STATUS_FILE: &str = "cron_status.json";

/// Durable store for cached fixtures and monitoring metadata.
///
/// Keys are (team, league, season); at most one entry exists per key and
/// `put` overwrites wholesale. Reads never coordinate with writers:
/// concurrent same-key refreshes race last-write-wins, which is acceptable
/// because entries are derived state.
pub trait FixtureStore: Send + Sync {
    fn get(&self, team_id: i64, league_id: i64, season: i32) -> Result<Option<CacheEntry>>;
    fn put(&self, entry: &CacheEntry) -> Result<()>;
    /// Delete every expired entry; returns the number actually deleted.
    fn delete_expired(&self) -> Result<usize>;
    fn list_all(&self, league_id: i64, season: i32) -> Result<HashMap<i64, Vec<FixtureRecord>>>;
    fn stats(&self) -> Result<CacheStats>;
    /// Record a point-in-time snapshot of current stats and return it.
    fn record_snapshot(&self) -> Result<MonitoringSnapshot>;
    /// Snapshots recorded within the last `hours_back` hours, oldest first.
    fn list_snapshots(&self, hours_back: i64) -> Result<Vec<MonitoringSnapshot>>;
    /// Drop snapshots past the retention horizon; returns the pruned count.
    fn prune_snapshots(&self) -> Result<usize>;
    fn cron_status(&self) -> Result<Vec<CronJobStatus>>;
}

pub struct JsonFileStore {
    cache_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, team_id: i64, league_id: i64, season: i32) -> PathBuf {
        self.cache_dir
            .join(format!("{}{}_{}_{}.json", ENTRY_PREFIX, league_id, season, team_id))
    }

    fn load_entry(path: &Path) -> Result<Option<CacheEntry>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cache file {}", path.display()))?;

        let entry: CacheEntry = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file {}", path.display()))?;

        Ok(Some(entry))
    }

    /// Walk the cache directory and parse every fixture entry file.
    /// Unparseable files are skipped rather than failing the whole scan.
    fn scan_entries(&self) -> Result<Vec<(PathBuf, CacheEntry)>> {
        let mut entries = Vec::new();

        let dir = std::fs::read_dir(&self.cache_dir)
            .with_context(|| format!("Failed to read cache directory {}", self.cache_dir.display()))?;

        for dirent in dir {
            let path = dirent?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n,
                None => continue,
            };
            if !name.starts_with(ENTRY_PREFIX) || !name.ends_with(".json") {
                continue;
            }

            match Self::load_entry(&path) {
                Ok(Some(entry)) => entries.push((path, entry)),
                Ok(None) => {}
                Err(e) => {
                    debug!(file = %path.display(), error = %e, "Skipping unreadable cache file");
                }
            }
        }

        Ok(entries)
    }

    fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(SNAPSHOT_FILE)
    }

    fn load_snapshots(&self) -> Result<Vec<MonitoringSnapshot>> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&path)
            .context("Failed to read snapshot file")?;
        let snapshots: Vec<MonitoringSnapshot> = serde_json::from_str(&contents)
            .context("Failed to parse snapshot file")?;
        Ok(snapshots)
    }

    fn save_snapshots(&self, snapshots: &[MonitoringSnapshot]) -> Result<()> {
        let contents = serde_json::to_string_pretty(snapshots)?;
        std::fs::write(self.snapshot_path(), contents)
            .context("Failed to write snapshot file")?;
        Ok(())
    }
}

impl FixtureStore for JsonFileStore {
    fn get(&self, team_id: i64, league_id: i64, season: i32) -> Result<Option<CacheEntry>> {
        Self::load_entry(&self.entry_path(team_id, league_id, season))
    }

    fn put(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.entry_path(entry.team_id, entry.league_id, entry.season);
        let contents = serde_json::to_string_pretty(entry)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file {}", path.display()))?;
        Ok(())
    }

    fn delete_expired(&self) -> Result<usize> {
        let mut deleted = 0;
        for (path, entry) in self.scan_entries()? {
            if entry.is_expired() {
                // A concurrent refresh may have already replaced the file;
                // a missing file at this point still counts as cleaned up.
                match std::fs::remove_file(&path) {
                    Ok(()) => deleted += 1,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => deleted += 1,
                    Err(e) => {
                        return Err(e).with_context(|| {
                            format!("Failed to delete cache file {}", path.display())
                        })
                    }
                }
            }
        }
        debug!(deleted, "Expired cache entries removed");
        Ok(deleted)
    }

    fn list_all(&self, league_id: i64, season: i32) -> Result<HashMap<i64, Vec<FixtureRecord>>> {
        let mut all = HashMap::new();
        for (_, entry) in self.scan_entries()? {
            if entry.league_id == league_id && entry.season == season {
                all.insert(entry.team_id, entry.fixtures);
            }
        }
        Ok(all)
    }

    fn stats(&self) -> Result<CacheStats> {
        let entries = self.scan_entries()?;
        let expired = entries.iter().filter(|(_, e)| e.is_expired()).count();
        Ok(CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
        })
    }

    fn record_snapshot(&self) -> Result<MonitoringSnapshot> {
        let stats = self.stats()?;
        let snapshot = MonitoringSnapshot {
            recorded_at: Utc::now(),
            total_entries: stats.total_entries,
            expired_entries: stats.expired_entries,
        };

        let mut snapshots = self.load_snapshots()?;
        snapshots.push(snapshot.clone());
        self.save_snapshots(&snapshots)?;
        Ok(snapshot)
    }

    fn list_snapshots(&self, hours_back: i64) -> Result<Vec<MonitoringSnapshot>> {
        let cutoff = Utc::now() - Duration::hours(hours_back);
        let mut snapshots: Vec<MonitoringSnapshot> = self
            .load_snapshots()?
            .into_iter()
            .filter(|s| s.recorded_at >= cutoff)
            .collect();
        snapshots.sort_by_key(|s| s.recorded_at);
        Ok(snapshots)
    }

    fn prune_snapshots(&self) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(SNAPSHOT_RETENTION_DAYS);
        let snapshots = self.load_snapshots()?;
        let before = snapshots.len();
        let kept: Vec<MonitoringSnapshot> = snapshots
            .into_iter()
            .filter(|s| s.recorded_at >= cutoff)
            .collect();
        let pruned = before - kept.len();
        if pruned > 0 {
            self.save_snapshots(&kept)?;
        }
        Ok(pruned)
    }

    fn cron_status(&self) -> Result<Vec<CronJobStatus>> {
        let path = self.cache_dir.join(CRON_STATUS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&path)
            .context("Failed to read cron status file")?;
        let jobs: Vec<CronJobStatus> = serde_json::from_str(&contents)
            .context("Failed to parse cron status file")?;
        Ok(jobs)
    }
}
