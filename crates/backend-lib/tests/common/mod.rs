//! Test utilities for the userauth integration tests
//!
//! Builds a router over a flat-file store in a temporary directory and
//! offers small helpers for driving it with `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use userauth_backend_lib::{config::Settings, routes, storage::FlatFileStorage, AppState};

pub const TEST_SECRET: &str = "test-secret";

/// Settings with a signing secret and the store rooted in `temp_dir`
pub fn test_settings(temp_dir: &TempDir) -> Settings {
    let mut settings = Settings {
        jwt_secret: TEST_SECRET.to_string(),
        ..Settings::default()
    };
    settings.store.data_dir = temp_dir.path().to_path_buf();
    settings
}

/// Sets up a router over a fresh store.
///
/// Keep the returned `TempDir` in scope for the duration of the test.
pub fn setup_test_env() -> (Router, Arc<AppState<FlatFileStorage>>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = Arc::new(AppState::from_settings(test_settings(&temp_dir)).unwrap());
    let router = routes::create_router(state.clone());
    (router, state, temp_dir)
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
