//! Fixed-window request rate limiting.
//!
//! The limiter is an explicit struct constructed once at process start
//! with its configuration; nothing here is global. State is per-process
//! memory: it under-counts across restarts and is a best-effort throttle,
//! not a security boundary on its own. Keys are arbitrary strings (a user
//! identifier when authenticated, a source address otherwise).

use dashmap::DashMap;
use time::{Duration, OffsetDateTime};

use crate::AuthResult;
use crate::config::RateLimitConfig;
use crate::error::AuthError;

#[derive(Debug)]
struct Window {
    started_at: OffsetDateTime,
    count: u32,
}

/// Fixed-window counter keyed by identity or source address.
///
/// Window reset is lazy: the first request after a window's end
/// reinitializes the counter rather than relying on active expiry.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    /// Creates a limiter from configuration.
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::try_from(config.window).unwrap_or(Duration::seconds(60)),
            max_requests: config.max_requests,
            windows: DashMap::new(),
        }
    }

    /// Admits or rejects one request for the given key.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RateLimited` with the seconds remaining in the
    /// current window once the ceiling is reached.
    pub fn check(&self, key: &str) -> AuthResult<()> {
        let now = OffsetDateTime::now_utc();

        let mut entry = self.windows.entry(key.to_string()).or_insert_with(|| Window {
            started_at: now,
            count: 0,
        });

        if now >= entry.started_at + self.window {
            entry.started_at = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            let remaining = entry.started_at + self.window - now;
            let retry_after = remaining.whole_seconds().max(1) as u64;
            tracing::debug!(key, retry_after, "request rate limited");
            return Err(AuthError::rate_limited(retry_after));
        }

        entry.count += 1;
        Ok(())
    }

    /// Drops windows that ended long enough ago to be irrelevant.
    ///
    /// The map otherwise grows with every distinct key ever seen; callers
    /// run this on a periodic maintenance tick.
    pub fn prune(&self) {
        let now = OffsetDateTime::now_utc();
        let horizon = self.window * 2;
        self.windows.retain(|_, w| now < w.started_at + horizon);
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
