//! Bearer token gate for the `/api/user` routes.
use crate::metrics::TOKEN_REJECTED;
use crate::storage::CredentialStore;
use crate::{error::AppError, AppState};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use metrics::counter;
use std::sync::Arc;

const BEARER_SCHEME: &str = "Bearer";

/// Validate the `Authorization: Bearer <token>` header and attach the
/// token's [`Claims`](userauth_common::Claims) to the request extensions.
///
/// A missing or malformed header is a 400; a token that fails validation
/// is a 401.
pub async fn require_bearer<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;

    let claims = state.tokens.validate(token).inspect_err(|e| {
        counter!(TOKEN_REJECTED).increment(1);
        tracing::warn!(error = %e, "bearer token rejected");
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::BadRequest("missing or malformed jwt".to_string()))
}
