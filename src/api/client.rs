//! HTTP client for the upstream sports-data API.
//!
//! This module provides the `FixtureFetcher` trait consumed by the refresh
//! orchestrator, and `SportsApiClient`, the production implementation that
//! fetches a team's recent fixtures over REST.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{FixtureRecord, FixtureStatus};

use super::FetchError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow upstream responses while freeing the worker slot
/// fast enough that one dead request cannot stall a batch.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Header carrying the upstream API key.
const API_KEY_HEADER: &str = "x-apisports-key";

/// Interface to the upstream fixtures source.
///
/// Implementations return the team's most recent fixtures ordered as the
/// provider reports them, or one of the three failure classes in
/// [`FetchError`]. The orchestrator injects this as a collaborator, so
/// tests substitute scripted doubles.
#[async_trait]
pub trait FixtureFetcher: Send + Sync {
    async fn fetch_fixtures_for_team(
        &self,
        team_id: i64,
        league_id: i64,
        season: i32,
        last_n: u32,
    ) -> Result<Vec<FixtureRecord>, FetchError>;
}

/// Upstream API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SportsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SportsApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl FixtureFetcher for SportsApiClient {
    async fn fetch_fixtures_for_team(
        &self,
        team_id: i64,
        league_id: i64,
        season: i32,
        last_n: u32,
    ) -> Result<Vec<FixtureRecord>, FetchError> {
        let url = format!("{}/fixtures", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("team", team_id.to_string()),
                ("league", league_id.to_string()),
                ("season", season.to_string()),
                ("last", last_n.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status, &body));
        }

        let text = response.text().await?;
        let payload: FixturesResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::BadResponse(format!("invalid fixtures payload: {}", e)))?;

        // The provider reports request-level problems (bad key, parameter
        // errors) inside a 200 body.
        if payload.has_errors() {
            warn!(team_id, errors = %payload.errors, "Upstream reported request errors");
            return Err(FetchError::BadResponse(format!(
                "upstream errors: {}",
                payload.errors
            )));
        }

        let fixtures = payload
            .response
            .iter()
            .map(FixtureApiItem::to_record)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(team_id, league_id, season, count = fixtures.len(), "Fetched fixtures");
        Ok(fixtures)
    }
}

// Internal API response types for parsing

#[derive(Debug, Deserialize)]
struct FixturesResponse {
    #[serde(default)]
    errors: serde_json::Value,
    #[serde(default)]
    response: Vec<FixtureApiItem>,
}

impl FixturesResponse {
    fn has_errors(&self) -> bool {
        match &self.errors {
            serde_json::Value::Null => false,
            serde_json::Value::Array(a) => !a.is_empty(),
            serde_json::Value::Object(o) => !o.is_empty(),
            _ => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FixtureApiItem {
    fixture: FixtureMeta,
    teams: FixtureTeams,
    goals: FixtureGoals,
}

#[derive(Debug, Deserialize)]
struct FixtureMeta {
    id: i64,
    date: String,
    status: FixtureStatusRaw,
}

#[derive(Debug, Deserialize)]
struct FixtureStatusRaw {
    short: String,
}

#[derive(Debug, Deserialize)]
struct FixtureTeams {
    home: TeamRef,
    away: TeamRef,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct FixtureGoals {
    home: Option<u32>,
    away: Option<u32>,
}

impl FixtureApiItem {
    fn to_record(&self) -> Result<FixtureRecord, FetchError> {
        let date = DateTime::parse_from_rfc3339(&self.fixture.date)
            .map_err(|e| {
                FetchError::BadResponse(format!(
                    "invalid fixture date {:?}: {}",
                    self.fixture.date, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(FixtureRecord {
            fixture_id: self.fixture.id,
            date,
            home_team_id: self.teams.home.id,
            away_team_id: self.teams.away.id,
            home_score: self.goals.home,
            away_score: self.goals.away,
            status: FixtureStatus::from_short_code(&self.fixture.status.short),
        })
    }
}
