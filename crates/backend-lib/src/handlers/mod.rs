// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers. Each one checks out a store session for the duration of
//! the request and hands it to the auth or profile component.
pub mod auth;
pub mod user;

use crate::error::AppError;
use axum::body::Bytes;
use serde::de::DeserializeOwned;

/// Decode a JSON request body into `T`.
///
/// Any failure (bad JSON, missing field, wrong type) is a `BadRequest`.
pub fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}
