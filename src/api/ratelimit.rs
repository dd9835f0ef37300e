//! Request pacing for the rate-limited upstream.
//!
//! The upstream quota is the scarcest resource in a batch refresh, so the
//! spacing between requests is an explicit, parameterized limiter rather
//! than ad-hoc sleeps at call sites.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Hands out request slots separated by a minimum spacing.
///
/// `acquire` reserves the next free slot under the lock, then sleeps
/// outside it, so concurrent callers queue up without serializing their
/// actual requests beyond the configured spacing.
pub struct RateLimiter {
    spacing: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until a request may be issued. Returns immediately when the
    /// previous slot is already `spacing` in the past (or none was taken).
    pub async fn acquire(&self) {
        let wait = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(at) if at > now => at,
                _ => now,
            };
            *next_slot = Some(slot + self.spacing);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_spacing_never_waits() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_acquires_are_spaced_out() {
        let limiter = RateLimiter::new(Duration::from_millis(30));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        // First slot is free; the next two must each wait the spacing.
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_concurrent_acquires_share_the_schedule() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(25)));
        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..3 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move { limiter.acquire().await }));
        }
        for handle in handles {
            handle.await.expect("acquire task panicked");
        }
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
