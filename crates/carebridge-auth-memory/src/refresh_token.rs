//! In-memory refresh-token revocation store.

use async_trait::async_trait;
use dashmap::DashMap;

use carebridge_auth::AuthResult;
use carebridge_auth::storage::{RefreshEntry, RefreshTokenStore};

/// In-memory revocation registry keyed by token hash.
///
/// `consume` rides on the map's atomic removal: the presence check and the
/// delete are one operation, so two racing consumers of the same token
/// hash can never both receive the entry. A secondary session-id index
/// serves the logout paths, which know the session but not the token.
#[derive(Debug, Default)]
pub struct MemoryRefreshTokenStore {
    entries: DashMap<String, RefreshEntry>,
    by_session: DashMap<String, String>,
}

impl MemoryRefreshTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, for tests and diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn put(&self, entry: &RefreshEntry) -> AuthResult<()> {
        self.by_session
            .insert(entry.session_id.clone(), entry.token_hash.clone());
        self.entries.insert(entry.token_hash.clone(), entry.clone());
        Ok(())
    }

    async fn consume(&self, token_hash: &str) -> AuthResult<Option<RefreshEntry>> {
        match self.entries.remove(token_hash) {
            Some((_, entry)) => {
                self.by_session.remove(&entry.session_id);
                if entry.is_expired() {
                    Ok(None)
                } else {
                    Ok(Some(entry))
                }
            }
            None => Ok(None),
        }
    }

    async fn delete_for_session(&self, session_id: &str) -> AuthResult<()> {
        if let Some((_, token_hash)) = self.by_session.remove(session_id) {
            self.entries.remove(&token_hash);
        }
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let expired: Vec<(String, String)> = self
            .entries
            .iter()
            .filter(|entry| entry.is_expired())
            .map(|entry| (entry.key().clone(), entry.session_id.clone()))
            .collect();

        for (token_hash, session_id) in &expired {
            self.entries.remove(token_hash);
            self.by_session.remove(session_id);
        }

        Ok(expired.len() as u64)
    }
}
