//! Shared test harness: a session service wired to in-memory backends.

#![allow(dead_code)]

use std::sync::Arc;

use carebridge_auth::background::BackgroundQueue;
use carebridge_auth::config::AuthConfig;
use carebridge_auth::session::{LoginAttempt, SessionService};
use carebridge_auth::storage::{AuthUser, RefreshTokenStore, SessionStore, UserStore};
use carebridge_auth::types::Role;
use carebridge_auth_memory::{MemoryRefreshTokenStore, MemorySessionStore, MemoryUserStore};

pub struct TestHarness {
    pub service: SessionService,
    pub users: Arc<MemoryUserStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub refresh_tokens: Arc<MemoryRefreshTokenStore>,
}

pub fn test_config() -> AuthConfig {
    let mut config = AuthConfig::default();
    config.tokens.access_secret = "test-access-secret-0123456789".to_string();
    config.tokens.refresh_secret = "test-refresh-secret-0123456789".to_string();
    // High enough that ordinary tests never trip the limiter.
    config.rate_limit.max_requests = 100;
    config
}

pub fn harness() -> TestHarness {
    harness_with_config(test_config())
}

pub fn harness_with_config(config: AuthConfig) -> TestHarness {
    let users = Arc::new(MemoryUserStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let refresh_tokens = Arc::new(MemoryRefreshTokenStore::new());

    let service = service_with_stores(
        &config,
        Arc::clone(&sessions) as Arc<dyn SessionStore>,
        Arc::clone(&refresh_tokens) as Arc<dyn RefreshTokenStore>,
        Arc::clone(&users) as Arc<dyn UserStore>,
    );

    TestHarness {
        service,
        users,
        sessions,
        refresh_tokens,
    }
}

pub fn service_with_stores(
    config: &AuthConfig,
    sessions: Arc<dyn SessionStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    users: Arc<dyn UserStore>,
) -> SessionService {
    SessionService::new(
        config,
        sessions,
        refresh_tokens,
        users,
        BackgroundQueue::new(16),
    )
    .unwrap()
}

pub fn patient(id: &str, email: &str) -> AuthUser {
    AuthUser {
        id: id.to_string(),
        email: email.to_string(),
        role: Role::Patient,
        active: true,
        failed_attempts: 0,
        lock_until: None,
    }
}

pub fn good_login(email: &str) -> LoginAttempt {
    LoginAttempt {
        email: email.to_string(),
        password_verified: true,
        ip: "10.0.0.1".to_string(),
        device: "web/1.0".to_string(),
    }
}

pub fn bad_login(email: &str) -> LoginAttempt {
    LoginAttempt {
        password_verified: false,
        ..good_login(email)
    }
}
