//! PKCE (Proof Key for Code Exchange), RFC 7636, S256 method only.
//!
//! The verifier is generated server-side at handshake start, handed to the
//! client, and round-tripped back on the callback; only the one-way S256
//! challenge is ever stored.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

/// Errors that can occur during PKCE operations.
#[derive(Debug, thiserror::Error)]
pub enum PkceError {
    /// Verifier is outside the 43-128 character range or uses characters
    /// beyond the RFC 3986 unreserved set.
    #[error("Invalid verifier: must be 43-128 unreserved characters")]
    InvalidVerifier,

    /// Challenge is not valid base64url.
    #[error("Invalid challenge format")]
    InvalidChallenge,

    /// Verifier does not hash to the stored challenge.
    #[error("PKCE verification failed")]
    VerificationFailed,
}

/// PKCE code verifier.
///
/// RFC 7636 §4.1: a high-entropy random string of 43-128 characters drawn
/// from `[A-Za-z0-9-._~]`.
#[derive(Debug, Clone)]
pub struct PkceVerifier(String);

impl PkceVerifier {
    /// Validates a verifier received from a client.
    ///
    /// # Errors
    ///
    /// Returns `PkceError::InvalidVerifier` on bad length or characters.
    pub fn new(verifier: String) -> Result<Self, PkceError> {
        if !(43..=128).contains(&verifier.len()) {
            return Err(PkceError::InvalidVerifier);
        }

        if !verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
        {
            return Err(PkceError::InvalidVerifier);
        }

        Ok(Self(verifier))
    }

    /// Generates a cryptographically random verifier.
    ///
    /// 32 random bytes base64url-encoded: 43 characters, the RFC minimum.
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Returns the verifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the verifier and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PkceVerifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// PKCE code challenge: `BASE64URL(SHA256(ASCII(code_verifier)))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge(String);

impl PkceChallenge {
    /// Derives the S256 challenge for a verifier.
    #[must_use]
    pub fn from_verifier(verifier: &PkceVerifier) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(verifier.0.as_bytes());
        Self(URL_SAFE_NO_PAD.encode(hasher.finalize()))
    }

    /// Wraps a stored challenge value.
    ///
    /// # Errors
    ///
    /// Returns `PkceError::InvalidChallenge` if the value is not base64url.
    pub fn new(challenge: String) -> Result<Self, PkceError> {
        if URL_SAFE_NO_PAD.decode(&challenge).is_err() {
            return Err(PkceError::InvalidChallenge);
        }
        Ok(Self(challenge))
    }

    /// Checks a presented verifier against this challenge.
    ///
    /// # Errors
    ///
    /// Returns `PkceError::VerificationFailed` on mismatch.
    pub fn verify(&self, verifier: &PkceVerifier) -> Result<(), PkceError> {
        if *self == Self::from_verifier(verifier) {
            Ok(())
        } else {
            Err(PkceError::VerificationFailed)
        }
    }

    /// Returns the challenge as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the challenge and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PkceChallenge {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
