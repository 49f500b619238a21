// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! Signup and signin.
//!
//! Passwords are stored and compared in clear text and usernames are not
//! deduplicated; both are existing client-visible behavior.
use super::TokenService;
use crate::error::AppError;
use crate::metrics::{SIGNIN_FAILURE, SIGNIN_SUCCESS, SIGNUP};
use crate::storage::{filter, to_document, StoreSession, USERS_COLLECTION};
use metrics::counter;
use serde_json::Value;
use tracing::instrument;
use userauth_common::{Claims, SigninRequest, SignupRequest, TokenResponse, UserRecord};

/// Insert a new user record verbatim.
#[instrument(skip_all, fields(username = %request.username))]
pub async fn signup(session: &dyn StoreSession, request: SignupRequest) -> Result<(), AppError> {
    let record = UserRecord::from(request);
    session
        .insert(USERS_COLLECTION, to_document(&record)?)
        .await?;

    counter!(SIGNUP).increment(1);
    tracing::info!("user registered");
    Ok(())
}

/// Check username and password against the store and issue a token.
#[instrument(skip_all, fields(username = %request.username))]
pub async fn signin(
    session: &dyn StoreSession,
    tokens: &TokenService,
    request: SigninRequest,
) -> Result<TokenResponse, AppError> {
    let query = filter([
        ("username", Value::String(request.username)),
        ("password", Value::String(request.password)),
    ]);

    let Some(doc) = session.find_one(USERS_COLLECTION, &query).await? else {
        counter!(SIGNIN_FAILURE).increment(1);
        tracing::info!("signin rejected");
        return Err(AppError::Unauthorized);
    };

    // The token carries the stored username, not the submitted one
    let username = doc
        .get("username")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Internal("stored user has no username".to_string()))?
        .to_string();

    let access_token = tokens.issue(&Claims { username })?;

    counter!(SIGNIN_SUCCESS).increment(1);
    tracing::info!("signin accepted");
    Ok(TokenResponse { access_token })
}
