//! Handlers for `/api/auth`.
use super::decode_body;
use crate::auth;
use crate::error::AppError;
use crate::storage::CredentialStore;
use crate::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use std::sync::Arc;
use userauth_common::{SigninRequest, SignupRequest, TokenResponse};

/// `POST /api/auth/signup`
pub async fn signup<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let request: SignupRequest = decode_body(&body)?;
    let session = state.storage.checkout().await?;
    auth::signup(session.as_ref(), request).await?;
    Ok(StatusCode::OK)
}

/// `POST /api/auth/signin`
pub async fn signin<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Json<TokenResponse>, AppError> {
    let request: SigninRequest = decode_body(&body)?;
    let session = state.storage.checkout().await?;
    let response = auth::signin(session.as_ref(), &state.tokens, request).await?;
    Ok(Json(response))
}
