//! In-memory user record store.
//!
//! Stands in for the platform's document store in tests and development.
//! Only the auth-relevant slice of the user document is modeled; password
//! hashes never pass through this interface.

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use carebridge_auth::AuthResult;
use carebridge_auth::error::AuthError;
use carebridge_auth::storage::{AuthUser, UserStore};

/// In-memory user store with an email lookup index.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<String, AuthUser>,
    by_email: DashMap<String, String>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user.
    pub fn insert(&self, user: AuthUser) {
        self.by_email.insert(user.email.clone(), user.id.clone());
        self.users.insert(user.id.clone(), user);
    }

    fn missing(id: &str) -> AuthError {
        AuthError::internal(format!("user {id} not found"))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<AuthUser>> {
        Ok(self.users.get(id).map(|user| user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<AuthUser>> {
        let Some(id) = self.by_email.get(email).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn record_failed_attempt(&self, id: &str) -> AuthResult<u32> {
        let mut user = self.users.get_mut(id).ok_or_else(|| Self::missing(id))?;
        user.failed_attempts += 1;
        Ok(user.failed_attempts)
    }

    async fn set_lock_until(&self, id: &str, until: OffsetDateTime) -> AuthResult<()> {
        let mut user = self.users.get_mut(id).ok_or_else(|| Self::missing(id))?;
        user.lock_until = Some(until);
        Ok(())
    }

    async fn reset_failed_attempts(&self, id: &str) -> AuthResult<()> {
        let mut user = self.users.get_mut(id).ok_or_else(|| Self::missing(id))?;
        user.failed_attempts = 0;
        user.lock_until = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebridge_auth::types::Role;
    use time::Duration;

    fn user(id: &str, email: &str) -> AuthUser {
        AuthUser {
            id: id.to_string(),
            email: email.to_string(),
            role: Role::Patient,
            active: true,
            failed_attempts: 0,
            lock_until: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_email() {
        let store = MemoryUserStore::new();
        store.insert(user("u1", "alice@example.com"));

        assert!(store.find_by_id("u1").await.unwrap().is_some());
        assert_eq!(
            store
                .find_by_email("alice@example.com")
                .await
                .unwrap()
                .unwrap()
                .id,
            "u1"
        );
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failure_counter_lifecycle() {
        let store = MemoryUserStore::new();
        store.insert(user("u1", "alice@example.com"));

        assert_eq!(store.record_failed_attempt("u1").await.unwrap(), 1);
        assert_eq!(store.record_failed_attempt("u1").await.unwrap(), 2);

        let until = OffsetDateTime::now_utc() + Duration::minutes(30);
        store.set_lock_until("u1", until).await.unwrap();
        assert!(store.find_by_id("u1").await.unwrap().unwrap().is_locked());

        store.reset_failed_attempts("u1").await.unwrap();
        let reset = store.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(reset.failed_attempts, 0);
        assert!(reset.lock_until.is_none());
    }

    #[tokio::test]
    async fn test_counter_update_on_missing_user_fails() {
        let store = MemoryUserStore::new();
        assert!(store.record_failed_attempt("ghost").await.is_err());
    }
}
