//! # Authentication Flow Tests
//!
//! Login, credential attachment and the global logout on 401.

mod common;

use std::sync::atomic::Ordering;

use common::*;
use shared::LoginRequest;
use toagro_client::{AppEvent, ClassifiedError, Session};

#[tokio::test]
async fn test_login_authenticates_store_and_attaches_token() {
    // Arrange
    let h = Harness::start().await;

    // Act
    let user = h
        .store
        .login(LoginRequest {
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .expect("login should succeed");

    // Assert
    assert_eq!(user.email, EMAIL);
    assert!(h.store.read(|s| s.auth.is_authenticated));
    assert_eq!(h.session.token().as_deref(), Some(VALID_TOKEN));
    assert_eq!(h.store.storage().token().as_deref(), Some(VALID_TOKEN));

    // The profile endpoint only answers with a bearer token
    let profile = h.store.load_profile().await.expect("token should be attached");
    assert_eq!(profile.id, USER_ID);
    assert_eq!(h.backend.rejected_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_password_is_an_inline_error_without_logout_event() {
    // Arrange
    let h = Harness::start().await;

    // Act
    let result = h
        .store
        .login(LoginRequest {
            email: EMAIL.to_string(),
            password: "Wrong1234".to_string(),
        })
        .await;

    // Assert
    assert_eq!(result.unwrap_err(), ClassifiedError::Auth);
    let auth = h.store.read(|s| s.auth.clone());
    assert!(!auth.is_authenticated);
    assert!(auth.request.error.is_some());
    assert!(!auth.request.is_loading());
    assert!(h.drain_events().is_empty());
}

#[tokio::test]
async fn test_concurrent_unauthorized_responses_log_out_once() {
    // Arrange
    let h = Harness::start().await;
    h.sign_in().await;
    h.session.set(Session::restored("revoked-token"));

    // Act
    let (unread, payments, conversations) = tokio::join!(
        h.store.fetch_unread_count(),
        h.store.fetch_payments(),
        h.store.fetch_conversations(),
    );

    // Assert
    assert!(unread.unwrap_err().is_auth());
    assert!(payments.unwrap_err().is_auth());
    assert!(conversations.unwrap_err().is_auth());
    assert_eq!(h.backend.rejected_requests.load(Ordering::SeqCst), 3);

    let events = h.drain_events();
    let expired = events.iter().filter(|e| **e == AppEvent::SessionExpired).count();
    let redirects = events
        .iter()
        .filter(|e| matches!(e, AppEvent::Navigate(path) if path == "/login"))
        .count();
    assert_eq!(expired, 1);
    assert_eq!(redirects, 1);

    assert!(!h.session.is_authenticated());
    assert!(!h.store.read(|s| s.auth.is_authenticated));
    assert!(h.store.storage().token().is_none());
}

#[tokio::test]
async fn test_expiry_applied_after_fresh_login_keeps_new_session() {
    // Arrange: a revoked token expires, then the user signs in again
    let h = Harness::start().await;
    h.sign_in().await;
    h.session.set(Session::restored("revoked-token"));
    let rejected = h.store.fetch_payments().await;
    h.sign_in().await;

    // Act: the queued expiry is only processed now
    let events = h.drain_events();
    for event in &events {
        h.store.apply_event(event);
    }

    // Assert
    assert!(rejected.unwrap_err().is_auth());
    assert!(events.contains(&AppEvent::SessionExpired));
    assert!(h.session.is_authenticated());
    assert!(h.store.read(|s| s.auth.is_authenticated));
    assert_eq!(h.store.storage().token().as_deref(), Some(VALID_TOKEN));
}

#[tokio::test]
async fn test_restore_session_with_revoked_token_clears_it() {
    // Arrange
    let h = Harness::start().await;
    h.store.storage().set_token("revoked-token");

    // Act
    let restored = h.store.restore_session().await;

    // Assert
    assert!(restored.is_err());
    assert!(!h.session.is_authenticated());
    for event in h.drain_events() {
        h.store.apply_event(&event);
    }
    assert!(h.store.storage().token().is_none());
    assert!(!h.store.read(|s| s.auth.is_authenticated));
}

#[tokio::test]
async fn test_restore_session_with_valid_token_loads_profile() {
    // Arrange
    let h = Harness::start().await;
    h.store.storage().set_token(VALID_TOKEN);

    // Act
    let restored = h.store.restore_session().await.expect("profile should load");

    // Assert
    assert!(restored);
    assert_eq!(h.store.read(|s| s.auth.user_id()), Some(USER_ID));
    assert_eq!(h.session.current().and_then(|s| s.user_id), Some(USER_ID));
}
