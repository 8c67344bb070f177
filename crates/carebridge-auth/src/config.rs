//! Authentication subsystem configuration.
//!
//! Configuration types for token signing, account lockout, rate limiting,
//! OAuth handshake state, and degraded-mode behavior of the shared store.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the auth subsystem.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// issuer = "https://auth.carebridge.example"
///
/// [auth.tokens]
/// access_token_lifetime = "15m"
/// refresh_token_lifetime = "14d"
///
/// [auth.store]
/// call_timeout = "2s"
/// degraded = "fail_open"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Server issuer URL (used in token `iss` claims).
    pub issuer: String,

    /// Token signing configuration.
    pub tokens: TokenConfig,

    /// Account lockout configuration.
    pub lockout: LockoutConfig,

    /// Login rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// OAuth handshake configuration.
    pub handshake: HandshakeConfig,

    /// Shared store behavior configuration.
    pub store: StoreConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "https://auth.carebridge.example".to_string(),
            tokens: TokenConfig::default(),
            lockout: LockoutConfig::default(),
            rate_limit: RateLimitConfig::default(),
            handshake: HandshakeConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Token signing configuration.
///
/// Access and refresh tokens are signed with distinct secrets and carry
/// distinct audiences, so a leak of one secret cannot forge the other
/// token kind.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Secret used to sign access tokens.
    pub access_secret: String,

    /// Secret used to sign refresh tokens. Must differ from `access_secret`.
    pub refresh_secret: String,

    /// Audience embedded in access tokens.
    pub access_audience: String,

    /// Audience embedded in refresh tokens.
    pub refresh_audience: String,

    /// Access token lifetime.
    /// Short by design; expiry is the normal path to a refresh.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime. Also bounds the session record TTL.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_audience: "carebridge-api".to_string(),
            refresh_audience: "carebridge-refresh".to_string(),
            access_token_lifetime: Duration::from_secs(15 * 60), // 15 minutes
            refresh_token_lifetime: Duration::from_secs(14 * 24 * 3600), // 14 days
        }
    }
}

/// Account lockout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LockoutConfig {
    /// Failed attempts before the account is locked.
    pub max_failed_attempts: u32,

    /// How long a locked account stays locked.
    #[serde(with = "humantime_serde")]
    pub lockout_duration: Duration,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_duration: Duration::from_secs(30 * 60), // 30 minutes
        }
    }
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length.
    #[serde(with = "humantime_serde")]
    pub window: Duration,

    /// Requests allowed per key per window.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 10,
        }
    }
}

/// OAuth handshake configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HandshakeConfig {
    /// How long an issued state token stays consumable.
    #[serde(with = "humantime_serde")]
    pub state_lifetime: Duration,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            state_lifetime: Duration::from_secs(600), // 10 minutes
        }
    }
}

/// Behavior of a session whose backing store is degraded.
///
/// Applies only to the liveness read on already-issued access tokens.
/// Login, refresh, and logout always fail closed: no token is issued or
/// rotated without a registered session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedPolicy {
    /// Treat tokens as valid when the store cannot answer.
    ///
    /// Trades strict revocation for availability: a store outage does not
    /// log out every active user. Operators are warned on every such pass.
    FailOpen,

    /// Reject requests when the store cannot answer the liveness check.
    FailClosed,
}

/// Shared store behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Timeout applied to every store round trip.
    #[serde(with = "humantime_serde")]
    pub call_timeout: Duration,

    /// Liveness-check behavior when the store is unreachable.
    pub degraded: DegradedPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(2),
            degraded: DegradedPolicy::FailOpen,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The issuer URL is empty
    /// - Either signing secret is empty, or the two secrets are equal
    /// - The access and refresh audiences are equal
    /// - Any lifetime, window, or ceiling is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "issuer cannot be empty".to_string(),
            ));
        }

        if self.tokens.access_secret.is_empty() {
            return Err(ConfigError::Missing("tokens.access_secret".to_string()));
        }

        if self.tokens.refresh_secret.is_empty() {
            return Err(ConfigError::Missing("tokens.refresh_secret".to_string()));
        }

        if self.tokens.access_secret == self.tokens.refresh_secret {
            return Err(ConfigError::InvalidValue(
                "access_secret and refresh_secret must differ".to_string(),
            ));
        }

        if self.tokens.access_audience == self.tokens.refresh_audience {
            return Err(ConfigError::InvalidValue(
                "access_audience and refresh_audience must differ".to_string(),
            ));
        }

        if self.tokens.access_token_lifetime.is_zero()
            || self.tokens.refresh_token_lifetime.is_zero()
        {
            return Err(ConfigError::InvalidValue(
                "token lifetimes must be > 0".to_string(),
            ));
        }

        if self.lockout.max_failed_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "lockout.max_failed_attempts must be > 0".to_string(),
            ));
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::InvalidValue(
                "rate_limit.max_requests must be > 0".to_string(),
            ));
        }

        if self.rate_limit.window.is_zero() {
            return Err(ConfigError::InvalidValue(
                "rate_limit.window must be > 0".to_string(),
            ));
        }

        if self.handshake.state_lifetime.is_zero() {
            return Err(ConfigError::InvalidValue(
                "handshake.state_lifetime must be > 0".to_string(),
            ));
        }

        if self.store.call_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "store.call_timeout must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AuthConfig {
        let mut config = AuthConfig::default();
        config.tokens.access_secret = "access-secret".to_string();
        config.tokens.refresh_secret = "refresh-secret".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.issuer, "https://auth.carebridge.example");
        assert_eq!(
            config.tokens.access_token_lifetime,
            Duration::from_secs(900)
        );
        assert_eq!(config.lockout.max_failed_attempts, 5);
        assert_eq!(config.store.degraded, DegradedPolicy::FailOpen);
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_config_missing_secrets() {
        // Secrets have no usable default; validation must force them.
        let err = AuthConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_equal_secrets_fail_validation() {
        let mut config = valid_config();
        config.tokens.refresh_secret = config.tokens.access_secret.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_equal_audiences_fail_validation() {
        let mut config = valid_config();
        config.tokens.refresh_audience = config.tokens.access_audience.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("audience"));
    }

    #[test]
    fn test_empty_issuer_fails_validation() {
        let mut config = valid_config();
        config.issuer = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("issuer"));
    }

    #[test]
    fn test_zero_ceiling_fails_validation() {
        let mut config = valid_config();
        config.rate_limit.max_requests = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_requests"));
    }

    #[test]
    fn test_zero_lockout_attempts_fails_validation() {
        let mut config = valid_config();
        config.lockout.max_failed_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_failed_attempts"));
    }

    #[test]
    fn test_degraded_policy_serde() {
        let json = serde_json::to_string(&DegradedPolicy::FailOpen).unwrap();
        assert_eq!(json, "\"fail_open\"");
        let parsed: DegradedPolicy = serde_json::from_str("\"fail_closed\"").unwrap();
        assert_eq!(parsed, DegradedPolicy::FailClosed);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = valid_config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AuthConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.issuer, parsed.issuer);
        assert_eq!(
            config.tokens.refresh_token_lifetime,
            parsed.tokens.refresh_token_lifetime
        );
        assert_eq!(config.store.degraded, parsed.store.degraded);
    }
}
