//! Third-party login handshake guard.
//!
//! Issues single-use CSRF state tokens bound to an in-flight external
//! login, optionally carrying an S256 PKCE challenge. A state value not
//! found in the store (never issued, already consumed, or expired) rejects
//! the callback.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use time::{Duration, OffsetDateTime};

use crate::AuthResult;
use crate::audit::{self, AuditEvent};
use crate::config::HandshakeConfig;
use crate::error::AuthError;
use crate::oauth::pkce::{PkceChallenge, PkceVerifier};
use crate::storage::handshake::{HandshakeState, HandshakeStore};

/// A freshly started handshake, returned to the routing layer.
///
/// The state and challenge go to the identity provider; the verifier goes
/// to the client and comes back on the callback. Nothing but the challenge
/// is retained server-side.
#[derive(Debug)]
pub struct Handshake {
    /// CSRF state value.
    pub state: String,
    /// PKCE verifier for the client to round-trip.
    pub verifier: PkceVerifier,
    /// S256 challenge derived from the verifier.
    pub challenge: PkceChallenge,
}

/// Guard over the OAuth handshake state store.
pub struct HandshakeGuard {
    store: Arc<dyn HandshakeStore>,
    state_lifetime: Duration,
    call_timeout: StdDuration,
}

impl HandshakeGuard {
    /// Creates a guard over the given store.
    #[must_use]
    pub fn new(
        store: Arc<dyn HandshakeStore>,
        config: &HandshakeConfig,
        call_timeout: StdDuration,
    ) -> Self {
        Self {
            store,
            state_lifetime: Duration::seconds(config.state_lifetime.as_secs() as i64),
            call_timeout,
        }
    }

    /// Starts a handshake: issues a state token and a PKCE pair.
    ///
    /// # Errors
    ///
    /// Fails closed with `StoreUnavailable` if the state cannot be stored;
    /// a handshake whose state is not registered can never be completed.
    pub async fn start(&self) -> AuthResult<Handshake> {
        let state = generate_state();
        let verifier = PkceVerifier::generate();
        let challenge = PkceChallenge::from_verifier(&verifier);

        let now = OffsetDateTime::now_utc();
        let record = HandshakeState {
            state: state.clone(),
            pkce_challenge: Some(challenge.as_str().to_string()),
            created_at: now,
            expires_at: now + self.state_lifetime,
        };

        self.store_call(self.store.put(&record)).await?;

        Ok(Handshake {
            state,
            verifier,
            challenge,
        })
    }

    /// Completes a handshake by consuming its state token.
    ///
    /// Single-use: re-presenting a consumed or guessed state always fails.
    ///
    /// # Errors
    ///
    /// - `AuthError::HandshakeStateInvalid` if the state was never issued,
    ///   already consumed, or expired
    /// - `AuthError::StoreUnavailable` if the store cannot answer
    pub async fn complete(&self, state: &str) -> AuthResult<HandshakeState> {
        let consumed = self.store_call(self.store.consume(state)).await?;

        match consumed {
            Some(record) if !record.is_expired() => Ok(record),
            _ => {
                audit::record(&AuditEvent::HandshakeRejected);
                Err(AuthError::HandshakeStateInvalid)
            }
        }
    }

    /// Completes a handshake and checks the PKCE verifier against the
    /// challenge stored at start.
    ///
    /// # Errors
    ///
    /// As [`HandshakeGuard::complete`], plus `HandshakeStateInvalid` when
    /// the verifier is malformed, missing, or does not match.
    pub async fn complete_with_verifier(
        &self,
        state: &str,
        verifier: &str,
    ) -> AuthResult<HandshakeState> {
        let record = self.complete(state).await?;

        let Some(ref stored_challenge) = record.pkce_challenge else {
            audit::record(&AuditEvent::HandshakeRejected);
            return Err(AuthError::HandshakeStateInvalid);
        };

        let result = PkceChallenge::new(stored_challenge.clone())
            .and_then(|challenge| {
                PkceVerifier::new(verifier.to_string()).map(|v| (challenge, v))
            })
            .and_then(|(challenge, verifier)| challenge.verify(&verifier));

        if let Err(error) = result {
            tracing::debug!(%error, "PKCE verification failed");
            audit::record(&AuditEvent::HandshakeRejected);
            return Err(AuthError::HandshakeStateInvalid);
        }

        Ok(record)
    }

    async fn store_call<T>(
        &self,
        fut: impl std::future::Future<Output = AuthResult<T>>,
    ) -> AuthResult<T> {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::store_unavailable("handshake store timed out")),
        }
    }
}

/// Generates a cryptographically random state token (32 bytes, base64url).
fn generate_state() -> String {
    use rand::Rng;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
