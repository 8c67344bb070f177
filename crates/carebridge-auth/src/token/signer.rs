//! Signed token pair issuance and verification.
//!
//! The signer is purely computational: it holds the signing keys and
//! lifetimes, generates a fresh session id per issued pair, and verifies
//! tokens against the matching secret namespace. All cross-request state
//! (session records, revocation entries) lives in the session store.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::AuthResult;
use crate::config::TokenConfig;
use crate::error::AuthError;
use crate::token::claims::{AccessClaims, RefreshClaims};
use crate::types::Role;

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    /// Short-lived access token (compact JWS).
    pub access_token: String,

    /// Long-lived refresh token (compact JWS), single-use under rotation.
    pub refresh_token: String,

    /// The session id embedded in both tokens.
    pub session_id: String,

    /// Access token lifetime in seconds, for the client's benefit.
    pub expires_in: u64,
}

/// Stateless signer for access and refresh tokens.
///
/// Access and refresh tokens use distinct secrets and distinct audiences:
/// a leaked refresh secret cannot forge access tokens and vice versa.
pub struct TokenSigner {
    issuer: String,
    access_audience: String,
    refresh_audience: String,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_validation: Validation,
    refresh_validation: Validation,
}

impl TokenSigner {
    /// Creates a signer from token configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if either secret is empty or the
    /// two secrets are identical.
    pub fn from_config(issuer: impl Into<String>, config: &TokenConfig) -> AuthResult<Self> {
        if config.access_secret.is_empty() || config.refresh_secret.is_empty() {
            return Err(AuthError::configuration("signing secrets must be set"));
        }
        if config.access_secret == config.refresh_secret {
            return Err(AuthError::configuration(
                "access and refresh secrets must differ",
            ));
        }

        let issuer = issuer.into();

        let mut access_validation = Validation::new(Algorithm::HS256);
        access_validation.leeway = 0;
        access_validation.set_issuer(&[&issuer]);
        access_validation.set_audience(&[&config.access_audience]);

        let mut refresh_validation = Validation::new(Algorithm::HS256);
        refresh_validation.leeway = 0;
        refresh_validation.set_issuer(&[&issuer]);
        refresh_validation.set_audience(&[&config.refresh_audience]);

        Ok(Self {
            issuer,
            access_audience: config.access_audience.clone(),
            refresh_audience: config.refresh_audience.clone(),
            access_lifetime: Duration::seconds(config.access_token_lifetime.as_secs() as i64),
            refresh_lifetime: Duration::seconds(config.refresh_token_lifetime.as_secs() as i64),
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_validation,
            refresh_validation,
        })
    }

    /// Issues a new token pair bound to a freshly generated session id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if encoding fails (malformed key data;
    /// not expected from validated configuration).
    pub fn issue(&self, user_id: &str, email: &str, role: Role) -> AuthResult<IssuedTokens> {
        let session_id = Uuid::new_v4().to_string();
        let now = OffsetDateTime::now_utc();

        let access_claims = AccessClaims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            aud: self.access_audience.clone(),
            exp: (now + self.access_lifetime).unix_timestamp(),
            iat: now.unix_timestamp(),
            jti: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
            sid: session_id.clone(),
        };

        let refresh_claims = RefreshClaims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            aud: self.refresh_audience.clone(),
            exp: (now + self.refresh_lifetime).unix_timestamp(),
            iat: now.unix_timestamp(),
            sid: session_id.clone(),
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_encoding)
            .map_err(|e| AuthError::internal(format!("failed to encode access token: {e}")))?;

        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_encoding)
            .map_err(|e| AuthError::internal(format!("failed to encode refresh token: {e}")))?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            session_id,
            expires_in: self.access_lifetime.whole_seconds() as u64,
        })
    }

    /// Verifies an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// - `AuthError::TokenExpired` if the signature is valid but the expiry
    ///   has passed
    /// - `AuthError::TokenInvalid` for any structural failure (bad signature,
    ///   wrong audience or issuer, malformed token)
    pub fn verify_access(&self, token: &str) -> AuthResult<AccessClaims> {
        decode::<AccessClaims>(token, &self.access_decoding, &self.access_validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "access token rejected");
                map_jwt_error(&e)
            })
    }

    /// Verifies a refresh token and returns its claims.
    ///
    /// Same error discipline as [`TokenSigner::verify_access`], in the
    /// refresh secret namespace.
    pub fn verify_refresh(&self, token: &str) -> AuthResult<RefreshClaims> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &self.refresh_validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "refresh token rejected");
                map_jwt_error(&e)
            })
    }

    /// Lifetime of issued refresh tokens.
    ///
    /// Session records and revocation entries share this TTL: a session
    /// lives exactly as long as its current refresh token can rotate it.
    #[must_use]
    pub fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }

    /// Lifetime of issued access tokens.
    #[must_use]
    pub fn access_lifetime(&self) -> Duration {
        self.access_lifetime
    }
}

/// Maps library errors onto the two caller-visible kinds.
///
/// Expired is the only recoverable case; everything else requires a full
/// re-authentication and is reported uniformly.
fn map_jwt_error(err: &jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;

    fn test_signer() -> TokenSigner {
        let config = TokenConfig {
            access_secret: "test-access-secret-0123456789".to_string(),
            refresh_secret: "test-refresh-secret-0123456789".to_string(),
            ..TokenConfig::default()
        };
        TokenSigner::from_config("https://auth.test", &config).unwrap()
    }

    #[test]
    fn test_issue_and_verify_access_round_trip() {
        let signer = test_signer();
        let issued = signer
            .issue("user-1", "alice@example.com", Role::Patient)
            .unwrap();

        let claims = signer.verify_access(&issued.access_token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::Patient);
        assert_eq!(claims.sid, issued.session_id);
        assert_eq!(issued.expires_in, 900);
    }

    #[test]
    fn test_issue_and_verify_refresh_round_trip() {
        let signer = test_signer();
        let issued = signer.issue("user-1", "a@b.c", Role::Admin).unwrap();

        let claims = signer.verify_refresh(&issued.refresh_token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.sid, issued.session_id);
    }

    #[test]
    fn test_each_issue_gets_a_fresh_session_id() {
        let signer = test_signer();
        let a = signer.issue("u", "a@b.c", Role::Patient).unwrap();
        let b = signer.issue("u", "a@b.c", Role::Patient).unwrap();
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_secret_namespaces_are_disjoint() {
        let signer = test_signer();
        let issued = signer.issue("u", "a@b.c", Role::Patient).unwrap();

        // A refresh token never verifies as an access token, and vice versa.
        assert!(matches!(
            signer.verify_access(&issued.refresh_token),
            Err(AuthError::TokenInvalid)
        ));
        assert!(matches!(
            signer.verify_refresh(&issued.access_token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let signer = test_signer();
        let issued = signer.issue("u", "a@b.c", Role::Patient).unwrap();

        let mut tampered = issued.access_token.clone();
        // Flip the final signature character.
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            signer.verify_access(&tampered),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let signer = test_signer();
        assert!(matches!(
            signer.verify_access("not.a.token"),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let signer = test_signer();
        let now = OffsetDateTime::now_utc();

        let claims = AccessClaims {
            iss: "https://auth.test".to_string(),
            sub: "user-1".to_string(),
            aud: "carebridge-api".to_string(),
            exp: (now - Duration::minutes(5)).unix_timestamp(),
            iat: (now - Duration::minutes(20)).unix_timestamp(),
            jti: "jti-1".to_string(),
            email: "a@b.c".to_string(),
            role: Role::Patient,
            sid: "sess-1".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-access-secret-0123456789"),
        )
        .unwrap();

        assert!(matches!(
            signer.verify_access(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let config = TokenConfig {
            access_secret: "test-access-secret-0123456789".to_string(),
            refresh_secret: "test-refresh-secret-0123456789".to_string(),
            ..TokenConfig::default()
        };
        let other = TokenSigner::from_config("https://other.test", &config).unwrap();
        let signer = test_signer();

        let issued = other.issue("u", "a@b.c", Role::Patient).unwrap();
        assert!(matches!(
            signer.verify_access(&issued.access_token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let config = TokenConfig {
            access_secret: "same".to_string(),
            refresh_secret: "same".to_string(),
            ..TokenConfig::default()
        };
        assert!(matches!(
            TokenSigner::from_config("https://auth.test", &config),
            Err(AuthError::Configuration { .. })
        ));
    }
}
