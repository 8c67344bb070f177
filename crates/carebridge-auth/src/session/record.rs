//! Session record domain type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A server-tracked login instance.
///
/// Created at successful login or refresh, touched on every authenticated
/// request, deleted on logout or TTL expiry. Owned exclusively by the
/// session store; the orchestrator never caches records across requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Opaque, globally unique session identifier.
    pub id: String,

    /// Owning user identifier.
    pub user_id: String,

    /// When the session was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the session last served an authenticated request.
    #[serde(with = "time::serde::rfc3339")]
    pub last_activity: OffsetDateTime,

    /// Last-seen client address.
    pub ip: String,

    /// Last-seen device string.
    pub device: String,
}

impl SessionRecord {
    /// Creates a new record with creation and activity stamped to now.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        ip: impl Into<String>,
        device: impl Into<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            created_at: now,
            last_activity: now,
            ip: ip.into(),
            device: device.into(),
        }
    }
}
