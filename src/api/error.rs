use thiserror::Error;

/// Failure modes of the upstream fixtures source.
///
/// Transport failures and 5xx responses surface as `Network`, quota
/// exhaustion as `RateLimited`, and everything else non-2xx (or a payload
/// we cannot make sense of) as `BadResponse`. All three are handled as
/// per-team failures by the refresh orchestrator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited - upstream quota exhausted")]
    RateLimited,

    #[error("bad response: {0}")]
    BadResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FetchError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            429 => FetchError::RateLimited,
            500..=599 => FetchError::Network(format!("server error {}: {}", status, truncated)),
            _ => FetchError::BadResponse(format!("status {}: {}", status, truncated)),
        }
    }

    pub fn timed_out() -> Self {
        FetchError::Network("request timed out".to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::timed_out()
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
