//! Token claim structures.
//!
//! Claims are reconstructed by verifying a token's signature and are never
//! persisted as rows. The access and refresh claim sets deliberately share
//! no audience so the verifier for one rejects the other.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Issuer (auth server URL).
    pub iss: String,

    /// Subject (user identifier).
    pub sub: String,

    /// Audience (the API surface this token is valid for).
    pub aud: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// JWT ID (unique per issued token).
    pub jti: String,

    /// Email address of the subject.
    pub email: String,

    /// Platform role of the subject.
    pub role: Role,

    /// Session identifier this token is bound to.
    pub sid: String,
}

/// Claims embedded in a refresh token.
///
/// Carries only what rotation needs: the owning user and the session being
/// rotated. Email and role are re-read from the user record at refresh time
/// so a role change takes effect on the next rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshClaims {
    /// Issuer (auth server URL).
    pub iss: String,

    /// Subject (user identifier).
    pub sub: String,

    /// Audience (the refresh endpoint namespace).
    pub aud: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Session identifier this token rotates.
    pub sid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_serde_round_trip() {
        let claims = AccessClaims {
            iss: "https://auth.test".to_string(),
            sub: "user-1".to_string(),
            aud: "carebridge-api".to_string(),
            exp: 2_000_000_000,
            iat: 1_999_999_100,
            jti: "b2f6e1d4".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Counselor,
            sid: "sess-1".to_string(),
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"role\":\"counselor\""));
        let parsed: AccessClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, claims);
    }
}
