//! OAuth handshake state storage trait.
//!
//! State tokens bind a third-party login callback to the request that
//! started it. They are short-lived and strictly single-use: consuming a
//! state must be atomic so a replayed or guessed callback never passes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;

/// An in-flight third-party login handshake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeState {
    /// Opaque CSRF state value round-tripped through the provider.
    pub state: String,

    /// S256 PKCE challenge bound at handshake start, if PKCE is in use.
    /// The verifier itself is never stored server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pkce_challenge: Option<String>,

    /// When the handshake was started.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the state stops being consumable.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl HandshakeState {
    /// Returns `true` if the state can no longer be consumed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }
}

/// Storage trait for handshake state tokens.
///
/// # Implementations
///
/// - `carebridge-auth-memory` - in-memory TTL-based backend
/// - [`crate::storage::UnavailableStore`] - fail-fast stub
#[async_trait]
pub trait HandshakeStore: Send + Sync {
    /// Stores a newly issued state.
    async fn put(&self, state: &HandshakeState) -> AuthResult<()>;

    /// Atomically consumes a state value.
    ///
    /// Returns the state if it was present and live, `None` if it was never
    /// issued, already consumed, or expired. Single-use is mandatory: the
    /// check and the delete must be one operation.
    async fn consume(&self, state: &str) -> AuthResult<Option<HandshakeState>>;

    /// Deletes expired states. Returns the number deleted.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
