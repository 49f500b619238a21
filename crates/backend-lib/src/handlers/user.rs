//! Handlers for `/api/user`, behind [`require_bearer`](crate::middleware::require_bearer).
use crate::error::AppError;
use crate::profile;
use crate::storage::{CredentialStore, Document};
use crate::AppState;
use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use userauth_common::Claims;

/// `GET /api/user/userContent`
pub async fn user_content<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Document>, AppError> {
    let session = state.storage.checkout().await?;
    let record = profile::get_profile(session.as_ref(), &claims).await?;
    Ok(Json(record))
}
