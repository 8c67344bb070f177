//! Security event audit triggers.
//!
//! Emits structured events for authentication and session lifecycle
//! changes. Persistence of the audit trail is owned elsewhere; this module
//! only raises the events, as `tracing` records on a dedicated target that
//! a subscriber can route to the audit pipeline.

/// A security-relevant event in the authentication subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// A login completed and a session was registered.
    LoginSucceeded {
        /// Authenticated user.
        user_id: String,
        /// Newly created session.
        session_id: String,
        /// Client address.
        ip: String,
    },

    /// A login attempt failed credential verification.
    LoginFailed {
        /// Attempted identifier (as presented by the caller).
        email: String,
        /// Client address.
        ip: String,
    },

    /// Repeated failures locked the account.
    AccountLocked {
        /// Locked user.
        user_id: String,
    },

    /// A refresh rotated the token pair onto a new session.
    TokenRefreshed {
        /// Owning user.
        user_id: String,
        /// Session retired by the rotation.
        old_session_id: String,
        /// Session created by the rotation.
        new_session_id: String,
    },

    /// A single session was revoked.
    SessionRevoked {
        /// Revoked session.
        session_id: String,
    },

    /// Every session of a user was revoked.
    SessionsRevokedAll {
        /// Affected user.
        user_id: String,
        /// Number of sessions removed.
        count: usize,
    },

    /// An OAuth callback presented an unknown, reused, or expired state.
    HandshakeRejected,
}

/// Emits an audit event.
///
/// Never logs tokens or passwords; identifiers only.
pub fn record(event: &AuditEvent) {
    match event {
        AuditEvent::LoginSucceeded {
            user_id,
            session_id,
            ip,
        } => {
            tracing::info!(
                target: "carebridge_auth::audit",
                event = "login_succeeded",
                %user_id,
                %session_id,
                %ip,
            );
        }
        AuditEvent::LoginFailed { email, ip } => {
            tracing::info!(
                target: "carebridge_auth::audit",
                event = "login_failed",
                %email,
                %ip,
            );
        }
        AuditEvent::AccountLocked { user_id } => {
            tracing::warn!(
                target: "carebridge_auth::audit",
                event = "account_locked",
                %user_id,
            );
        }
        AuditEvent::TokenRefreshed {
            user_id,
            old_session_id,
            new_session_id,
        } => {
            tracing::info!(
                target: "carebridge_auth::audit",
                event = "token_refreshed",
                %user_id,
                %old_session_id,
                %new_session_id,
            );
        }
        AuditEvent::SessionRevoked { session_id } => {
            tracing::info!(
                target: "carebridge_auth::audit",
                event = "session_revoked",
                %session_id,
            );
        }
        AuditEvent::SessionsRevokedAll { user_id, count } => {
            tracing::info!(
                target: "carebridge_auth::audit",
                event = "sessions_revoked_all",
                %user_id,
                count,
            );
        }
        AuditEvent::HandshakeRejected => {
            tracing::warn!(
                target: "carebridge_auth::audit",
                event = "handshake_rejected",
            );
        }
    }
}
