//! Fail-fast stub for deployments without a configured shared store.
//!
//! Every operation returns `StoreUnavailable`. The orchestrator's own
//! degraded-mode policy then decides what that means per call site: writes
//! fail closed, the liveness read may fail open. Wiring code selects this
//! implementation at startup instead of branching on "is the store
//! configured" anywhere in the request path.

use async_trait::async_trait;
use std::time::Duration;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::error::AuthError;
use crate::session::SessionRecord;
use crate::storage::handshake::{HandshakeState, HandshakeStore};
use crate::storage::refresh_token::{RefreshEntry, RefreshTokenStore};
use crate::storage::session::SessionStore;
use crate::storage::user::{AuthUser, UserStore};

/// A store that is permanently unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn err<T>() -> AuthResult<T> {
        Err(AuthError::store_unavailable("no store configured"))
    }
}

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn put_record(&self, _record: &SessionRecord, _ttl: Duration) -> AuthResult<()> {
        Self::err()
    }

    async fn get_record(&self, _session_id: &str) -> AuthResult<Option<SessionRecord>> {
        Self::err()
    }

    async fn touch_record(&self, _session_id: &str, _ip: &str, _device: &str) -> AuthResult<()> {
        Self::err()
    }

    async fn delete_record(&self, _session_id: &str) -> AuthResult<()> {
        Self::err()
    }

    async fn expire_record(&self, _session_id: &str, _ttl: Duration) -> AuthResult<()> {
        Self::err()
    }

    async fn index_add(&self, _user_id: &str, _session_id: &str) -> AuthResult<()> {
        Self::err()
    }

    async fn index_remove(&self, _user_id: &str, _session_id: &str) -> AuthResult<()> {
        Self::err()
    }

    async fn index_list(&self, _user_id: &str) -> AuthResult<Vec<String>> {
        Self::err()
    }

    async fn index_clear(&self, _user_id: &str) -> AuthResult<()> {
        Self::err()
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        Self::err()
    }
}

#[async_trait]
impl RefreshTokenStore for UnavailableStore {
    async fn put(&self, _entry: &RefreshEntry) -> AuthResult<()> {
        Self::err()
    }

    async fn consume(&self, _token_hash: &str) -> AuthResult<Option<RefreshEntry>> {
        Self::err()
    }

    async fn delete_for_session(&self, _session_id: &str) -> AuthResult<()> {
        Self::err()
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        Self::err()
    }
}

#[async_trait]
impl HandshakeStore for UnavailableStore {
    async fn put(&self, _state: &HandshakeState) -> AuthResult<()> {
        Self::err()
    }

    async fn consume(&self, _state: &str) -> AuthResult<Option<HandshakeState>> {
        Self::err()
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        Self::err()
    }
}

#[async_trait]
impl UserStore for UnavailableStore {
    async fn find_by_id(&self, _id: &str) -> AuthResult<Option<AuthUser>> {
        Self::err()
    }

    async fn find_by_email(&self, _email: &str) -> AuthResult<Option<AuthUser>> {
        Self::err()
    }

    async fn record_failed_attempt(&self, _id: &str) -> AuthResult<u32> {
        Self::err()
    }

    async fn set_lock_until(&self, _id: &str, _until: OffsetDateTime) -> AuthResult<()> {
        Self::err()
    }

    async fn reset_failed_attempts(&self, _id: &str) -> AuthResult<()> {
        Self::err()
    }
}
