//! In-memory session record store.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use carebridge_auth::AuthResult;
use carebridge_auth::session::SessionRecord;
use carebridge_auth::storage::SessionStore;

#[derive(Debug, Clone)]
struct StoredSession {
    record: SessionRecord,
    expires_at: OffsetDateTime,
}

/// In-memory session store with lazy TTL expiry.
///
/// Records and the user index are separate maps, mirroring the two-key
/// layout of the shared store this backend stands in for. Expired records
/// are dropped on read and swept by [`SessionStore::cleanup_expired`].
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: DashMap<String, StoredSession>,
    index: DashMap<String, HashSet<String>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ttl_to_deadline(ttl: Duration) -> OffsetDateTime {
        let ttl = time::Duration::try_from(ttl).unwrap_or(time::Duration::days(3650));
        OffsetDateTime::now_utc() + ttl
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put_record(&self, record: &SessionRecord, ttl: Duration) -> AuthResult<()> {
        self.records.insert(
            record.id.clone(),
            StoredSession {
                record: record.clone(),
                expires_at: Self::ttl_to_deadline(ttl),
            },
        );
        Ok(())
    }

    async fn get_record(&self, session_id: &str) -> AuthResult<Option<SessionRecord>> {
        let now = OffsetDateTime::now_utc();

        if let Some(entry) = self.records.get(session_id) {
            if entry.expires_at > now {
                return Ok(Some(entry.record.clone()));
            }
        } else {
            return Ok(None);
        }

        // Expired: drop it lazily, after the read guard is released.
        self.records.remove(session_id);
        Ok(None)
    }

    async fn touch_record(&self, session_id: &str, ip: &str, device: &str) -> AuthResult<()> {
        let now = OffsetDateTime::now_utc();

        if let Some(mut entry) = self.records.get_mut(session_id) {
            if entry.expires_at > now {
                entry.record.last_activity = now;
                entry.record.ip = ip.to_string();
                entry.record.device = device.to_string();
            }
        }
        Ok(())
    }

    async fn delete_record(&self, session_id: &str) -> AuthResult<()> {
        self.records.remove(session_id);
        Ok(())
    }

    async fn expire_record(&self, session_id: &str, ttl: Duration) -> AuthResult<()> {
        let deadline = Self::ttl_to_deadline(ttl);

        if let Some(mut entry) = self.records.get_mut(session_id) {
            if deadline < entry.expires_at {
                entry.expires_at = deadline;
            }
        }
        Ok(())
    }

    async fn index_add(&self, user_id: &str, session_id: &str) -> AuthResult<()> {
        self.index
            .entry(user_id.to_string())
            .or_default()
            .insert(session_id.to_string());
        Ok(())
    }

    async fn index_remove(&self, user_id: &str, session_id: &str) -> AuthResult<()> {
        if let Some(mut set) = self.index.get_mut(user_id) {
            set.remove(session_id);
        }
        self.index.remove_if(user_id, |_, set| set.is_empty());
        Ok(())
    }

    async fn index_list(&self, user_id: &str) -> AuthResult<Vec<String>> {
        Ok(self
            .index
            .get(user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn index_clear(&self, user_id: &str) -> AuthResult<()> {
        self.index.remove(user_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now = OffsetDateTime::now_utc();

        let expired: Vec<(String, String)> = self
            .records
            .iter()
            .filter(|entry| entry.expires_at <= now)
            .map(|entry| (entry.key().clone(), entry.record.user_id.clone()))
            .collect();

        for (session_id, user_id) in &expired {
            self.records.remove(session_id);
            if let Some(mut set) = self.index.get_mut(user_id) {
                set.remove(session_id);
            }
            self.index.remove_if(user_id, |_, set| set.is_empty());
        }

        Ok(expired.len() as u64)
    }
}
