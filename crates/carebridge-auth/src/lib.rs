//! # carebridge-auth
//!
//! Authentication and session lifecycle subsystem for the CareBridge
//! platform.
//!
//! This crate provides:
//! - Access/refresh token pair issuance and verification
//! - Session registry with per-user indexing and bulk revocation
//! - Refresh-token rotation with single-use revocation entries
//! - Account lockout backed by the persisted user record
//! - Per-identity fixed-window rate limiting
//! - OAuth handshake state (CSRF + PKCE) validation
//!
//! ## Overview
//!
//! The subsystem is built around a stateless [`session::SessionService`]
//! invoked once per request; all cross-request state lives behind the
//! [`storage`] traits in a shared, TTL-based store. Refresh tokens rotate
//! on every use: consuming the revocation entry is the act of using the
//! token, so a captured refresh token becomes worthless the moment its
//! legitimate owner uses it.
//!
//! ## Modules
//!
//! - [`config`] - Subsystem configuration
//! - [`token`] - Credential signing and verification
//! - [`session`] - Session records and the orchestrating service
//! - [`lockout`] - Account lockout tracking
//! - [`rate_limit`] - Fixed-window request throttling
//! - [`oauth`] - OAuth handshake guard and PKCE
//! - [`storage`] - Storage traits for auth-related data
//! - [`background`] - Bounded queue for detached side effects
//! - [`audit`] - Security event audit triggers

pub mod audit;
pub mod background;
pub mod config;
pub mod error;
pub mod lockout;
pub mod oauth;
pub mod rate_limit;
pub mod session;
pub mod storage;
pub mod token;
pub mod types;

pub use background::BackgroundQueue;
pub use config::{
    AuthConfig, ConfigError, DegradedPolicy, HandshakeConfig, LockoutConfig, RateLimitConfig,
    StoreConfig, TokenConfig,
};
pub use error::{AuthError, ErrorCategory};
pub use lockout::LockoutTracker;
pub use oauth::{Handshake, HandshakeGuard, PkceChallenge, PkceError, PkceVerifier};
pub use rate_limit::RateLimiter;
pub use session::{LoginAttempt, SessionRecord, SessionService};
pub use storage::{
    AuthUser, HandshakeState, HandshakeStore, RefreshEntry, RefreshTokenStore, SessionStore,
    UnavailableStore, UserStore,
};
pub use token::{AccessClaims, IssuedTokens, RefreshClaims, TokenSigner};
pub use types::{Identity, Role};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use carebridge_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::background::BackgroundQueue;
    pub use crate::config::{AuthConfig, DegradedPolicy};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::oauth::{Handshake, HandshakeGuard};
    pub use crate::session::{LoginAttempt, SessionRecord, SessionService};
    pub use crate::storage::{
        AuthUser, HandshakeState, HandshakeStore, RefreshEntry, RefreshTokenStore, SessionStore,
        UserStore,
    };
    pub use crate::token::{IssuedTokens, TokenSigner};
    pub use crate::types::{Identity, Role};
}
