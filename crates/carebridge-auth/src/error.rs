//! Authentication and session lifecycle error types.
//!
//! This module defines all error types that can occur while issuing
//! credentials, validating sessions, and gating the login entry point.

use std::fmt;

/// Errors that can occur during authentication and session operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The supplied credentials do not match any account.
    ///
    /// Deliberately carries no detail: the response shape must not reveal
    /// whether the account exists or which part of the credential failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The account is locked out after repeated failed attempts.
    #[error("Account locked")]
    AccountLocked,

    /// The account has been deactivated and cannot authenticate.
    #[error("Account inactive")]
    AccountInactive,

    /// The token's signature is valid but its expiry has passed.
    ///
    /// Distinguished from [`AuthError::TokenInvalid`] so callers can prompt
    /// a refresh instead of forcing full re-authentication.
    #[error("Token expired")]
    TokenExpired,

    /// The token is malformed, has a bad signature, or was already consumed.
    #[error("Invalid token")]
    TokenInvalid,

    /// The token verified but its session no longer exists.
    #[error("Session revoked")]
    SessionRevoked,

    /// The caller exceeded the request ceiling for the current window.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited {
        /// Seconds until the current window ends.
        retry_after: u64,
    },

    /// The OAuth handshake state was never issued, already consumed, or expired.
    #[error("Invalid handshake state")]
    HandshakeStateInvalid,

    /// The shared store (or the user record store) could not be reached.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the infrastructure failure.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `RateLimited` error.
    #[must_use]
    pub fn rate_limited(retry_after: u64) -> Self {
        Self::RateLimited { retry_after }
    }

    /// Creates a new `StoreUnavailable` error.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::AccountLocked
                | Self::AccountInactive
                | Self::TokenExpired
                | Self::TokenInvalid
                | Self::SessionRevoked
                | Self::RateLimited { .. }
                | Self::HandshakeStateInvalid
        )
    }

    /// Returns `true` if retrying the same request later may succeed.
    ///
    /// Write-path store failures are surfaced as retryable so the routing
    /// layer can translate them into a 503 with a retry hint.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. } | Self::RateLimited { .. })
    }

    /// Returns `true` if the caller should prompt a token refresh.
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        matches!(self, Self::TokenExpired)
    }

    /// Returns `true` if the caller must force a full re-login.
    #[must_use]
    pub fn needs_login(&self) -> bool {
        matches!(self, Self::TokenInvalid | Self::SessionRevoked)
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCredentials => ErrorCategory::Authentication,
            Self::AccountLocked => ErrorCategory::Authentication,
            Self::AccountInactive => ErrorCategory::Authentication,
            Self::TokenExpired => ErrorCategory::Token,
            Self::TokenInvalid => ErrorCategory::Token,
            Self::SessionRevoked => ErrorCategory::Session,
            Self::RateLimited { .. } => ErrorCategory::Throttle,
            Self::HandshakeStateInvalid => ErrorCategory::Handshake,
            Self::StoreUnavailable { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of authentication errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credential and account-state errors.
    Authentication,
    /// Token validation errors.
    Token,
    /// Session liveness errors.
    Session,
    /// Rate limiting.
    Throttle,
    /// OAuth handshake errors.
    Handshake,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Token => write!(f, "token"),
            Self::Session => write!(f, "session"),
            Self::Throttle => write!(f, "throttle"),
            Self::Handshake => write!(f, "handshake"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
        assert_eq!(
            AuthError::rate_limited(42).to_string(),
            "Rate limited, retry after 42 seconds"
        );
        assert_eq!(
            AuthError::store_unavailable("connection refused").to_string(),
            "Store unavailable: connection refused"
        );
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::InvalidCredentials;
        assert!(err.is_client_error());
        assert!(!err.is_retryable());

        let err = AuthError::TokenExpired;
        assert!(err.needs_refresh());
        assert!(!err.needs_login());

        let err = AuthError::SessionRevoked;
        assert!(err.needs_login());
        assert!(!err.needs_refresh());

        let err = AuthError::store_unavailable("down");
        assert!(!err.is_client_error());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::AccountLocked.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(AuthError::TokenInvalid.category(), ErrorCategory::Token);
        assert_eq!(
            AuthError::SessionRevoked.category(),
            ErrorCategory::Session
        );
        assert_eq!(
            AuthError::rate_limited(1).category(),
            ErrorCategory::Throttle
        );
        assert_eq!(
            AuthError::store_unavailable("x").category(),
            ErrorCategory::Infrastructure
        );
    }

    #[test]
    fn test_invalid_credentials_and_locked_share_shape() {
        // Both surface as unit variants with a fixed message: nothing about
        // the account leaks through formatting.
        let bad = AuthError::InvalidCredentials.to_string();
        let locked = AuthError::AccountLocked.to_string();
        assert!(!bad.contains('@'));
        assert!(!locked.contains('@'));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Authentication.to_string(), "authentication");
        assert_eq!(ErrorCategory::Session.to_string(), "session");
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}
