//! Degraded-mode policy tests: write paths fail closed, the liveness
//! check follows the configured policy.

mod common;

use std::sync::Arc;

use carebridge_auth::config::DegradedPolicy;
use carebridge_auth::error::AuthError;
use carebridge_auth::storage::{RefreshTokenStore, SessionStore, UnavailableStore, UserStore};
use common::{good_login, harness, patient, service_with_stores, test_config};

#[tokio::test]
async fn test_login_fails_closed_without_a_store() {
    let config = test_config();
    let users = Arc::new(carebridge_auth_memory::MemoryUserStore::new());
    users.insert(patient("u1", "alice@example.com"));

    let service = service_with_stores(
        &config,
        Arc::new(UnavailableStore) as Arc<dyn SessionStore>,
        Arc::new(UnavailableStore) as Arc<dyn RefreshTokenStore>,
        Arc::clone(&users) as Arc<dyn UserStore>,
    );

    // No token issuance without a registered session.
    let err = service.login(&good_login("alice@example.com")).await.unwrap_err();
    assert!(matches!(err, AuthError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn test_liveness_check_fails_open_by_default() {
    // Obtain a genuine token from a healthy deployment first.
    let healthy = harness();
    healthy.users.insert(patient("u1", "alice@example.com"));
    let issued = healthy
        .service
        .login(&good_login("alice@example.com"))
        .await
        .unwrap();

    // Same signing config, session store gone.
    let degraded = service_with_stores(
        &test_config(),
        Arc::new(UnavailableStore) as Arc<dyn SessionStore>,
        Arc::new(UnavailableStore) as Arc<dyn RefreshTokenStore>,
        Arc::new(UnavailableStore) as Arc<dyn UserStore>,
    );

    let identity = degraded
        .authenticate(&issued.access_token, "10.0.0.1", "web/1.0")
        .await
        .unwrap();
    assert_eq!(identity.user_id, "u1");
}

#[tokio::test]
async fn test_liveness_check_fails_closed_when_configured() {
    let healthy = harness();
    healthy.users.insert(patient("u1", "alice@example.com"));
    let issued = healthy
        .service
        .login(&good_login("alice@example.com"))
        .await
        .unwrap();

    let mut config = test_config();
    config.store.degraded = DegradedPolicy::FailClosed;
    let degraded = service_with_stores(
        &config,
        Arc::new(UnavailableStore) as Arc<dyn SessionStore>,
        Arc::new(UnavailableStore) as Arc<dyn RefreshTokenStore>,
        Arc::new(UnavailableStore) as Arc<dyn UserStore>,
    );

    let err = degraded
        .authenticate(&issued.access_token, "10.0.0.1", "web/1.0")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn test_refresh_fails_closed_without_a_store() {
    let healthy = harness();
    healthy.users.insert(patient("u1", "alice@example.com"));
    let issued = healthy
        .service
        .login(&good_login("alice@example.com"))
        .await
        .unwrap();

    let degraded = service_with_stores(
        &test_config(),
        Arc::new(UnavailableStore) as Arc<dyn SessionStore>,
        Arc::new(UnavailableStore) as Arc<dyn RefreshTokenStore>,
        Arc::new(UnavailableStore) as Arc<dyn UserStore>,
    );

    let err = degraded
        .refresh(&issued.refresh_token, "10.0.0.1", "web/1.0")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn test_logout_fails_closed_without_a_store() {
    let degraded = service_with_stores(
        &test_config(),
        Arc::new(UnavailableStore) as Arc<dyn SessionStore>,
        Arc::new(UnavailableStore) as Arc<dyn RefreshTokenStore>,
        Arc::new(UnavailableStore) as Arc<dyn UserStore>,
    );

    let err = degraded.logout("some-session").await.unwrap_err();
    assert!(matches!(err, AuthError::StoreUnavailable { .. }));
}
