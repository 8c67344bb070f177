//! In-memory OAuth handshake state store.

use async_trait::async_trait;
use dashmap::DashMap;

use carebridge_auth::AuthResult;
use carebridge_auth::storage::{HandshakeState, HandshakeStore};

/// In-memory single-use state registry.
///
/// `consume` is the map's atomic removal, so a state value can be redeemed
/// at most once no matter how callbacks race.
#[derive(Debug, Default)]
pub struct MemoryHandshakeStore {
    states: DashMap<String, HandshakeState>,
}

impl MemoryHandshakeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HandshakeStore for MemoryHandshakeStore {
    async fn put(&self, state: &HandshakeState) -> AuthResult<()> {
        self.states.insert(state.state.clone(), state.clone());
        Ok(())
    }

    async fn consume(&self, state: &str) -> AuthResult<Option<HandshakeState>> {
        match self.states.remove(state) {
            Some((_, record)) if !record.is_expired() => Ok(Some(record)),
            _ => Ok(None),
        }
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let before = self.states.len();
        self.states.retain(|_, record| !record.is_expired());
        Ok((before - self.states.len()) as u64)
    }
}
