// ==========================
// tests/internal_errors.rs
// ==========================
//! Store failures surface as opaque 500s.
mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::*;
use std::sync::Arc;
use tempfile::TempDir;
use userauth_backend_lib::{
    error::{AppError, INTERNAL_ERROR_BODY},
    routes,
    storage::{CredentialStore, Document, StoreSession},
    AppState,
};

/// Store whose sessions fail every operation
struct BrokenStore;

struct BrokenSession;

#[async_trait]
impl CredentialStore for BrokenStore {
    async fn checkout(&self) -> Result<Box<dyn StoreSession>, AppError> {
        Ok(Box::new(BrokenSession))
    }
}

#[async_trait]
impl StoreSession for BrokenSession {
    async fn insert(&self, _collection: &str, _doc: Document) -> Result<(), AppError> {
        Err(AppError::Internal("connection reset by peer 10.0.0.7".to_string()))
    }

    async fn find(&self, _collection: &str, _filter: &Document) -> Result<Vec<Document>, AppError> {
        Err(AppError::Internal("connection reset by peer 10.0.0.7".to_string()))
    }
}

/// Store that cannot hand out sessions at all
struct UnreachableStore;

#[async_trait]
impl CredentialStore for UnreachableStore {
    async fn checkout(&self) -> Result<Box<dyn StoreSession>, AppError> {
        Err(AppError::Internal("timed out waiting for a store session".to_string()))
    }
}

fn router_over<S: CredentialStore + 'static>(storage: S) -> (axum::Router, Arc<AppState<S>>) {
    let temp_dir = TempDir::new().unwrap();
    let state = Arc::new(AppState::new(storage, test_settings(&temp_dir)).unwrap());
    (routes::create_router(state.clone()), state)
}

async fn assert_opaque_500(response: axum::http::Response<axum::body::Body>) {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_bytes(response).await;
    assert_eq!(body, INTERNAL_ERROR_BODY.as_bytes());
}

#[tokio::test]
async fn test_signup_store_failure() {
    let (router, _state) = router_over(BrokenStore);
    let body = r#"{"username":"bob","email":"b@x.com","password":"pw1"}"#;
    assert_opaque_500(send(&router, post_json("/api/auth/signup", body)).await).await;
}

#[tokio::test]
async fn test_signin_store_failure() {
    let (router, _state) = router_over(BrokenStore);
    let body = r#"{"username":"bob","password":"pw1"}"#;
    assert_opaque_500(send(&router, post_json("/api/auth/signin", body)).await).await;
}

#[tokio::test]
async fn test_user_content_store_failure() {
    let (router, state) = router_over(BrokenStore);
    let token = state
        .tokens
        .issue(&userauth_common::Claims {
            username: "bob".to_string(),
        })
        .unwrap();

    let response = send(
        &router,
        get_with_auth("/api/user/userContent", Some(&format!("Bearer {token}"))),
    )
    .await;
    assert_opaque_500(response).await;
}

#[tokio::test]
async fn test_checkout_failure() {
    let (router, _state) = router_over(UnreachableStore);
    let body = r#"{"username":"bob","password":"pw1"}"#;
    assert_opaque_500(send(&router, post_json("/api/auth/signin", body)).await).await;
}

#[tokio::test]
async fn test_bad_request_wins_over_store_failure() {
    // Bodies are decoded before a session is checked out
    let (router, _state) = router_over(UnreachableStore);
    let response = send(&router, post_json("/api/auth/signup", "{}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
