//! User record storage trait.
//!
//! The user document is owned by the platform's record store; this trait
//! exposes only the slice the auth subsystem reads and writes: identity,
//! account status, and the lockout counters. Lockout lives here rather
//! than in the session store so it survives process restarts and session
//! store outages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::types::Role;

/// The auth-relevant slice of a user document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Unique identifier (the document id).
    pub id: String,

    /// Email address used for login.
    pub email: String,

    /// Platform role.
    pub role: Role,

    /// Whether the account may authenticate at all.
    pub active: bool,

    /// Consecutive failed login attempts since the last success.
    #[serde(default)]
    pub failed_attempts: u32,

    /// If set and in the future, authentication is blocked outright.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub lock_until: Option<OffsetDateTime>,
}

impl AuthUser {
    /// Returns `true` if the lockout window is still open.
    ///
    /// The counter value is irrelevant once `lock_until` is set: the
    /// timestamp alone decides.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_until
            .map(|until| OffsetDateTime::now_utc() < until)
            .unwrap_or(false)
    }
}

/// Storage trait over the externally-owned user record.
///
/// All operations are single-document and assumed strongly consistent.
/// Password verification is not part of this interface; the routing layer
/// performs it against the document store directly.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by id.
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<AuthUser>>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<AuthUser>>;

    /// Increments the failed-attempt counter and returns the new value.
    ///
    /// Durable on the primary user record even when the session store is
    /// down.
    async fn record_failed_attempt(&self, id: &str) -> AuthResult<u32>;

    /// Sets the lock-until timestamp.
    async fn set_lock_until(&self, id: &str, until: OffsetDateTime) -> AuthResult<()>;

    /// Resets the failed-attempt counter and clears any lock.
    async fn reset_failed_attempts(&self, id: &str) -> AuthResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn user(lock_until: Option<OffsetDateTime>) -> AuthUser {
        AuthUser {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Patient,
            active: true,
            failed_attempts: 0,
            lock_until,
        }
    }

    #[test]
    fn test_is_locked() {
        let now = OffsetDateTime::now_utc();

        assert!(!user(None).is_locked());
        assert!(user(Some(now + Duration::minutes(30))).is_locked());
        // An elapsed lock no longer blocks, whatever the counter says.
        assert!(!user(Some(now - Duration::seconds(1))).is_locked());
    }

    #[test]
    fn test_serde_defaults() {
        // Documents written before lockout existed have neither field.
        let json = r#"{"id":"u1","email":"a@b.c","role":"admin","active":true}"#;
        let parsed: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.failed_attempts, 0);
        assert!(parsed.lock_until.is_none());
    }
}
