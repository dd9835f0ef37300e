//! Runtime configuration.
//!
//! Configuration is read from environment variables, with `.env` file
//! support for development. Every knob has a sensible default except the
//! upstream API key and the admin token, which have no usable defaults
//! and stay empty when unset.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::RefreshConfig;
use crate::form::FORM_WINDOW;

/// Application name used for cache directory paths
const APP_NAME: &str = "fixturecache";

/// Default upstream base URL (API-Football v3 compatible).
const DEFAULT_API_BASE_URL: &str = "https://v3.football.api-sports.io";

/// Consider cached fixtures stale after 1 hour. Balances freshness with
/// quota use for data that only changes on match days.
const DEFAULT_TTL_MINUTES: i64 = 60;

/// Small worker pool keeps a batch refresh well inside upstream
/// per-minute quotas even before spacing kicks in.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Minimum spacing between upstream requests in milliseconds.
const DEFAULT_SPACING_MS: u64 = 250;

/// Per-fetch timeout in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: String,
    pub admin_token: String,
    pub cache_ttl_minutes: i64,
    pub max_concurrent_fetches: usize,
    pub min_request_spacing_ms: u64,
    pub fetch_timeout_secs: u64,
    /// Recent fixtures requested per team.
    pub fixture_window: u32,
    /// Overrides the platform cache directory when set.
    pub cache_dir_override: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            admin_token: String::new(),
            cache_ttl_minutes: DEFAULT_TTL_MINUTES,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT,
            min_request_spacing_ms: DEFAULT_SPACING_MS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            fixture_window: (FORM_WINDOW * 2) as u32,
            cache_dir_override: None,
        }
    }
}

impl Config {
    /// Load configuration, reading a `.env` file first when present.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            api_base_url: env_string("FIXTURES_API_URL", &defaults.api_base_url),
            api_key: env_string("FIXTURES_API_KEY", ""),
            admin_token: env_string("CACHE_ADMIN_TOKEN", ""),
            cache_ttl_minutes: env_parse("FIXTURES_CACHE_TTL_MINUTES", defaults.cache_ttl_minutes)?,
            max_concurrent_fetches: env_parse(
                "FIXTURES_MAX_CONCURRENT",
                defaults.max_concurrent_fetches,
            )?,
            min_request_spacing_ms: env_parse(
                "FIXTURES_REQUEST_SPACING_MS",
                defaults.min_request_spacing_ms,
            )?,
            fetch_timeout_secs: env_parse(
                "FIXTURES_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout_secs,
            )?,
            fixture_window: env_parse("FIXTURES_WINDOW", defaults.fixture_window)?,
            cache_dir_override: std::env::var("FIXTURES_CACHE_DIR").ok().map(PathBuf::from),
        })
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir_override {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Bridge into the orchestrator's tunables.
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            max_concurrent: self.max_concurrent_fetches.max(1),
            min_request_spacing: Duration::from_millis(self.min_request_spacing_ms),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            ttl_minutes: self.cache_ttl_minutes,
            last_n: self.fixture_window,
        }
    }
}

fn env_string(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value
            .parse()
            .with_context(|| format!("Invalid value for {}: {}", name, value)),
        _ => Ok(default),
    }
}
