//! Account lockout tracking.
//!
//! The failed-attempt counter and lock-until timestamp live on the user's
//! persisted record, so lockout survives process restarts and session
//! store outages. Lockout is evaluated before the password result is
//! consulted: a locked account answers identically whether or not the
//! supplied password was correct.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use crate::AuthResult;
use crate::config::LockoutConfig;
use crate::storage::user::{AuthUser, UserStore};

/// Per-identity failed-attempt tracker with a cool-down window.
pub struct LockoutTracker {
    users: Arc<dyn UserStore>,
    max_failed_attempts: u32,
    lockout_duration: Duration,
}

impl LockoutTracker {
    /// Creates a tracker over the given user store.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, config: &LockoutConfig) -> Self {
        Self {
            users,
            max_failed_attempts: config.max_failed_attempts,
            lockout_duration: Duration::seconds(config.lockout_duration.as_secs() as i64),
        }
    }

    /// Returns `true` if the account's lockout window is still open.
    #[must_use]
    pub fn is_locked(&self, user: &AuthUser) -> bool {
        user.is_locked()
    }

    /// Records a failed login attempt.
    ///
    /// Increments the persisted counter; once it reaches the configured
    /// threshold, sets lock-until to now plus the cool-down. Returns `true`
    /// if this failure locked the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the user record cannot be updated. The mutation
    /// is on the primary record and does not involve the session store.
    pub async fn record_failure(&self, user_id: &str) -> AuthResult<bool> {
        let attempts = self.users.record_failed_attempt(user_id).await?;

        if attempts >= self.max_failed_attempts {
            let until = OffsetDateTime::now_utc() + self.lockout_duration;
            self.users.set_lock_until(user_id, until).await?;
            tracing::warn!(user_id, attempts, "account locked after repeated failures");
            return Ok(true);
        }

        tracing::debug!(user_id, attempts, "failed login attempt recorded");
        Ok(false)
    }

    /// Records a successful authentication: counter to zero, lock cleared.
    pub async fn record_success(&self, user_id: &str) -> AuthResult<()> {
        self.users.reset_failed_attempts(user_id).await
    }
}
