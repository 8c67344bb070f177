//! Session orchestration: login, authenticate, refresh, logout.
//!
//! The service is stateless across requests; every piece of cross-request
//! state lives behind the storage traits, so it is safe to call from any
//! number of concurrent request handlers. No in-process lock is held
//! across a store round trip.
//!
//! # Degraded-mode policy
//!
//! Login, refresh, and logout fail closed when the store is unreachable:
//! no token exists without a registered session. The liveness check on
//! already-issued access tokens follows the configured [`DegradedPolicy`]
//! (fail-open by default) so a store outage does not log out every active
//! user at once.

use std::future::Future;
use std::sync::Arc;

use time::OffsetDateTime;

use crate::AuthResult;
use crate::audit::{self, AuditEvent};
use crate::background::BackgroundQueue;
use crate::config::{AuthConfig, DegradedPolicy, StoreConfig};
use crate::error::AuthError;
use crate::lockout::LockoutTracker;
use crate::rate_limit::RateLimiter;
use crate::session::SessionRecord;
use crate::storage::refresh_token::{RefreshEntry, RefreshTokenStore};
use crate::storage::session::SessionStore;
use crate::storage::user::UserStore;
use crate::token::{IssuedTokens, TokenSigner};
use crate::types::Identity;

/// A login request after external password verification.
///
/// Password checking belongs to the platform's user store; the routing
/// layer performs it and passes the outcome here. The service still owns
/// the ordering: rate limit, account status, and lockout are all applied
/// before the password outcome is consulted.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    /// Email the caller presented.
    pub email: String,

    /// Whether the external password check succeeded.
    pub password_verified: bool,

    /// Client address.
    pub ip: String,

    /// Client device string.
    pub device: String,
}

/// Configuration subset the service keeps at hand.
#[derive(Debug, Clone)]
pub struct SessionServiceConfig {
    /// Store call behavior (timeout, degraded policy).
    pub store: StoreConfig,
}

/// The session lifecycle façade.
pub struct SessionService {
    signer: TokenSigner,
    sessions: Arc<dyn SessionStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    users: Arc<dyn UserStore>,
    lockout: LockoutTracker,
    rate_limiter: RateLimiter,
    queue: BackgroundQueue,
    config: SessionServiceConfig,
}

impl SessionService {
    /// Creates the service from configuration and storage backends.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the token configuration is
    /// unusable (empty or identical secrets).
    pub fn new(
        config: &AuthConfig,
        sessions: Arc<dyn SessionStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        users: Arc<dyn UserStore>,
        queue: BackgroundQueue,
    ) -> AuthResult<Self> {
        let signer = TokenSigner::from_config(&config.issuer, &config.tokens)?;
        let lockout = LockoutTracker::new(Arc::clone(&users), &config.lockout);
        let rate_limiter = RateLimiter::new(&config.rate_limit);

        Ok(Self {
            signer,
            sessions,
            refresh_tokens,
            users,
            lockout,
            rate_limiter,
            queue,
            config: SessionServiceConfig {
                store: config.store.clone(),
            },
        })
    }

    /// Authenticates credentials and opens a session.
    ///
    /// Gate order: rate limit, account existence, account status, lockout,
    /// then the password outcome. Lockout is checked before the password
    /// result so a locked account answers identically either way.
    ///
    /// # Errors
    ///
    /// - `RateLimited` when the identity exceeded the login window ceiling
    /// - `InvalidCredentials` for unknown accounts and wrong passwords alike
    /// - `AccountInactive` / `AccountLocked` for blocked accounts
    /// - `StoreUnavailable` when session registration fails (fail closed)
    pub async fn login(&self, attempt: &LoginAttempt) -> AuthResult<IssuedTokens> {
        self.rate_limiter.check(&attempt.email)?;

        let user = self
            .store_call("user lookup", self.users.find_by_email(&attempt.email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.active {
            return Err(AuthError::AccountInactive);
        }

        if self.lockout.is_locked(&user) {
            return Err(AuthError::AccountLocked);
        }

        if !attempt.password_verified {
            let locked = self.lockout.record_failure(&user.id).await?;
            audit::record(&AuditEvent::LoginFailed {
                email: attempt.email.clone(),
                ip: attempt.ip.clone(),
            });
            if locked {
                audit::record(&AuditEvent::AccountLocked {
                    user_id: user.id.clone(),
                });
            }
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.signer.issue(&user.id, &user.email, user.role)?;
        self.register_session(&issued, &user.id, &attempt.ip, &attempt.device)
            .await?;
        self.lockout.record_success(&user.id).await?;

        audit::record(&AuditEvent::LoginSucceeded {
            user_id: user.id.clone(),
            session_id: issued.session_id.clone(),
            ip: attempt.ip.clone(),
        });

        Ok(issued)
    }

    /// Validates an access token and the liveness of its session.
    ///
    /// A token whose session record is gone is rejected with
    /// `SessionRevoked` even while its signature and expiry are still
    /// valid; that is what makes logout effective. On success a
    /// last-activity touch is dispatched off the request path.
    ///
    /// # Errors
    ///
    /// - `TokenExpired` / `TokenInvalid` from signature verification
    /// - `SessionRevoked` when the session record is absent
    /// - `StoreUnavailable` only under `DegradedPolicy::FailClosed`
    pub async fn authenticate(
        &self,
        access_token: &str,
        ip: &str,
        device: &str,
    ) -> AuthResult<Identity> {
        let claims = self.signer.verify_access(access_token)?;

        let liveness = self
            .store_call("liveness check", self.sessions.get_record(&claims.sid))
            .await;

        match liveness {
            Ok(Some(_)) => {
                let sessions = Arc::clone(&self.sessions);
                let session_id = claims.sid.clone();
                let ip = ip.to_string();
                let device = device.to_string();
                self.queue.dispatch("session touch", async move {
                    sessions.touch_record(&session_id, &ip, &device).await
                });
            }
            Ok(None) => {
                tracing::debug!(session_id = %claims.sid, "access token for revoked session");
                return Err(AuthError::SessionRevoked);
            }
            Err(AuthError::StoreUnavailable { message }) => match self.config.store.degraded {
                DegradedPolicy::FailOpen => {
                    tracing::warn!(
                        session_id = %claims.sid,
                        %message,
                        "session store unreachable, accepting token without liveness check"
                    );
                }
                DegradedPolicy::FailClosed => {
                    return Err(AuthError::StoreUnavailable { message });
                }
            },
            Err(other) => return Err(other),
        }

        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            session_id: claims.sid,
        })
    }

    /// Rotates a refresh token onto a brand-new session and token pair.
    ///
    /// Consuming the revocation entry is the act of using the token: the
    /// atomic check-and-delete in the store guarantees that of two racing
    /// refreshes with the same token, at most one succeeds. The superseded
    /// session is not hard-deleted; its TTL is capped at the access-token
    /// lifetime so access tokens already issued against it stay valid
    /// until their own expiry, while the record stays in the user's index
    /// and remains revocable by logout and logout-all.
    ///
    /// # Errors
    ///
    /// - `TokenExpired` / `TokenInvalid` from signature verification
    /// - `TokenInvalid` when the entry is already consumed (replay) or does
    ///   not match the token's user and session
    /// - `AccountInactive` when the owner was deactivated since issuance
    /// - `StoreUnavailable` on any store failure (fail closed, no silent
    ///   retry: retrying with side effects risks double session creation)
    pub async fn refresh(
        &self,
        refresh_token: &str,
        ip: &str,
        device: &str,
    ) -> AuthResult<IssuedTokens> {
        let claims = self.signer.verify_refresh(refresh_token)?;

        let token_hash = RefreshEntry::hash_token(refresh_token);
        let entry = self
            .store_call("refresh consume", self.refresh_tokens.consume(&token_hash))
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if entry.user_id != claims.sub || entry.session_id != claims.sid {
            tracing::warn!(
                session_id = %claims.sid,
                "refresh entry does not match token claims"
            );
            return Err(AuthError::TokenInvalid);
        }

        let user = self
            .store_call("user lookup", self.users.find_by_id(&claims.sub))
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if !user.active {
            return Err(AuthError::AccountInactive);
        }

        // Retire the old session before the new one exists. A crash in
        // between leaves a consumed refresh token and a draining session,
        // which the client resolves by logging in again; it never leaves
        // two live refresh tokens for one session.
        let drain_ttl = self.signer.access_lifetime().unsigned_abs();
        self.store_call(
            "session expire",
            self.sessions.expire_record(&claims.sid, drain_ttl),
        )
        .await?;

        let issued = self.signer.issue(&user.id, &user.email, user.role)?;
        self.register_session(&issued, &user.id, ip, device).await?;

        audit::record(&AuditEvent::TokenRefreshed {
            user_id: user.id.clone(),
            old_session_id: claims.sid,
            new_session_id: issued.session_id.clone(),
        });

        Ok(issued)
    }

    /// Ends a single session.
    ///
    /// Deletes the record, its index entry, and its refresh entry. An
    /// unknown session id is already logged out and is not an error.
    pub async fn logout(&self, session_id: &str) -> AuthResult<()> {
        let record = self
            .store_call("session lookup", self.sessions.get_record(session_id))
            .await?;

        if let Some(record) = record {
            self.store_call(
                "index remove",
                self.sessions.index_remove(&record.user_id, session_id),
            )
            .await?;
        }

        self.store_call("session delete", self.sessions.delete_record(session_id))
            .await?;
        self.store_call(
            "refresh delete",
            self.refresh_tokens.delete_for_session(session_id),
        )
        .await?;

        audit::record(&AuditEvent::SessionRevoked {
            session_id: session_id.to_string(),
        });

        Ok(())
    }

    /// Ends every session of a user.
    ///
    /// Index entries whose records are already gone count as already
    /// logged out, never as errors; the index and the records are two
    /// separate keys and may diverge after a partial failure.
    ///
    /// Returns the number of index entries processed.
    pub async fn logout_all(&self, user_id: &str) -> AuthResult<usize> {
        let session_ids = self
            .store_call("index list", self.sessions.index_list(user_id))
            .await?;

        for session_id in &session_ids {
            self.store_call("session delete", self.sessions.delete_record(session_id))
                .await?;
            self.store_call(
                "refresh delete",
                self.refresh_tokens.delete_for_session(session_id),
            )
            .await?;
        }

        self.store_call("index clear", self.sessions.index_clear(user_id))
            .await?;

        audit::record(&AuditEvent::SessionsRevokedAll {
            user_id: user_id.to_string(),
            count: session_ids.len(),
        });

        Ok(session_ids.len())
    }

    /// Lists a user's live sessions.
    ///
    /// Indexed ids whose records have expired are skipped.
    pub async fn list_sessions(&self, user_id: &str) -> AuthResult<Vec<SessionRecord>> {
        let session_ids = self
            .store_call("index list", self.sessions.index_list(user_id))
            .await?;

        let mut records = Vec::with_capacity(session_ids.len());
        for session_id in session_ids {
            if let Some(record) = self
                .store_call("session lookup", self.sessions.get_record(&session_id))
                .await?
            {
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Writes the session record, index entry, and refresh entry for a
    /// freshly issued pair. All three share the refresh lifetime as TTL.
    async fn register_session(
        &self,
        issued: &IssuedTokens,
        user_id: &str,
        ip: &str,
        device: &str,
    ) -> AuthResult<()> {
        let ttl = self.signer.refresh_lifetime().unsigned_abs();
        let record = SessionRecord::new(&issued.session_id, user_id, ip, device);

        self.store_call("session write", self.sessions.put_record(&record, ttl))
            .await?;
        self.store_call(
            "index write",
            self.sessions.index_add(user_id, &issued.session_id),
        )
        .await?;

        let entry = RefreshEntry {
            token_hash: RefreshEntry::hash_token(&issued.refresh_token),
            user_id: user_id.to_string(),
            session_id: issued.session_id.clone(),
            expires_at: OffsetDateTime::now_utc() + self.signer.refresh_lifetime(),
        };
        self.store_call("refresh entry write", self.refresh_tokens.put(&entry))
            .await?;

        Ok(())
    }

    /// Applies the configured store timeout to one round trip.
    async fn store_call<T>(
        &self,
        what: &'static str,
        fut: impl Future<Output = AuthResult<T>>,
    ) -> AuthResult<T> {
        match tokio::time::timeout(self.config.store.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::store_unavailable(format!("{what} timed out"))),
        }
    }
}
