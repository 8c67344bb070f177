//! Refresh-token revocation storage trait.
//!
//! Presence of an entry means "this refresh token has not been consumed";
//! absence means revoked, rotated, or expired. Consuming the entry IS the
//! act of using the token, which is why `consume` must be atomic.
//!
//! # Security Considerations
//!
//! - Tokens are keyed by SHA-256 hash, never by raw value
//! - `consume` must be a single check-and-delete, not a read then a delete
//! - Exactly one live entry exists per active session

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;

/// A live refresh-token entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshEntry {
    /// SHA-256 hash of the raw refresh token.
    pub token_hash: String,

    /// User the token was issued to.
    pub user_id: String,

    /// Session the token rotates.
    pub session_id: String,

    /// When the token (and this entry) expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl RefreshEntry {
    /// Returns `true` if this entry has outlived its token.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    /// Hashes a raw token value for use as the entry key.
    ///
    /// Used both when storing new entries and when consuming them, so the
    /// raw token never reaches the store.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Storage trait for refresh-token revocation entries.
///
/// # Implementations
///
/// - `carebridge-auth-memory` - in-memory TTL-based backend
/// - [`crate::storage::UnavailableStore`] - fail-fast stub
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Stores a new entry. Rotation writes exactly one entry per new pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable; the refresh path must
    /// fail closed on it.
    async fn put(&self, entry: &RefreshEntry) -> AuthResult<()>;

    /// Atomically consumes an entry by token hash.
    ///
    /// Returns the entry if it was present and live, `None` if absent,
    /// already consumed, or expired. Of two racing consumers at most one
    /// receives the entry; the other must be told the token is invalid.
    ///
    /// # Atomicity
    ///
    /// Implementations must make the presence check and the delete a single
    /// operation (an atomic map removal, `GETDEL`, a conditional
    /// `DELETE ... RETURNING`). A separate read followed by a separate
    /// delete reopens the double-use window this entry exists to close.
    async fn consume(&self, token_hash: &str) -> AuthResult<Option<RefreshEntry>>;

    /// Deletes the entry belonging to a session, if any.
    ///
    /// Used by logout paths, which know the session id but not the token.
    async fn delete_for_session(&self, session_id: &str) -> AuthResult<()>;

    /// Deletes expired entries. Returns the number deleted.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
