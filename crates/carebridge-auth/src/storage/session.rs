//! Session record storage trait.
//!
//! Records and the user index are deliberately separate operations: the
//! backing store offers no cross-key transaction, so the orchestrator
//! orders the two writes and tolerates divergence between them. An index
//! entry whose record is gone reads as an already-expired session; a
//! record missing from the index is invisible to bulk revocation but
//! harmless otherwise.

use std::time::Duration;

use async_trait::async_trait;

use crate::AuthResult;
use crate::session::SessionRecord;

/// Storage trait for session records and the per-user session index.
///
/// # Implementations
///
/// - `carebridge-auth-memory` - in-memory TTL-based backend
/// - [`crate::storage::UnavailableStore`] - fail-fast stub for wiring
///   without a configured store
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a session record with the given TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable. Callers on the login
    /// and refresh paths must treat this as fatal (fail closed).
    async fn put_record(&self, record: &SessionRecord, ttl: Duration) -> AuthResult<()>;

    /// Looks up a live session record.
    ///
    /// Returns `None` for unknown and expired sessions alike; the caller
    /// cannot distinguish the two, and does not need to.
    async fn get_record(&self, session_id: &str) -> AuthResult<Option<SessionRecord>>;

    /// Updates last-activity, IP, and device on a live record.
    ///
    /// Missing records are ignored: the touch is best-effort by contract
    /// and races benignly with logout.
    async fn touch_record(&self, session_id: &str, ip: &str, device: &str) -> AuthResult<()>;

    /// Deletes a session record. Deleting an absent record is not an error.
    async fn delete_record(&self, session_id: &str) -> AuthResult<()>;

    /// Caps a record's remaining TTL.
    ///
    /// Never extends a shorter remaining lifetime. Used by rotation to let
    /// a superseded session drain for exactly as long as access tokens
    /// issued against it can still be presented. Absent records are
    /// ignored.
    async fn expire_record(&self, session_id: &str, ttl: Duration) -> AuthResult<()>;

    /// Adds a session id to a user's index.
    async fn index_add(&self, user_id: &str, session_id: &str) -> AuthResult<()>;

    /// Removes a session id from a user's index.
    async fn index_remove(&self, user_id: &str, session_id: &str) -> AuthResult<()>;

    /// Lists the session ids currently in a user's index.
    ///
    /// May include ids whose records have already expired; callers must
    /// treat a subsequent failed record lookup as "already logged out".
    async fn index_list(&self, user_id: &str) -> AuthResult<Vec<String>>;

    /// Clears a user's entire index.
    async fn index_clear(&self, user_id: &str) -> AuthResult<()>;

    /// Deletes expired records and prunes them from indexes.
    ///
    /// Returns the number of records deleted. Called periodically by the
    /// owning process.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
