// ============================
// crates/backend-lib/src/profile.rs
// ============================
//! Profile lookup for an already validated token.
use crate::error::AppError;
use crate::metrics::PROFILE_READ;
use crate::storage::{filter, Document, StoreSession, USERS_COLLECTION};
use metrics::counter;
use serde_json::Value;
use tracing::instrument;
use userauth_common::Claims;

/// Fetch the stored record for the token's `username` claim.
///
/// The full document is returned as stored, password included.
#[instrument(skip_all, fields(username = %claims.username))]
pub async fn get_profile(session: &dyn StoreSession, claims: &Claims) -> Result<Document, AppError> {
    let query = filter([("username", Value::String(claims.username.clone()))]);
    let doc = session
        .find_one(USERS_COLLECTION, &query)
        .await?
        .ok_or(AppError::Unauthorized)?;

    counter!(PROFILE_READ).increment(1);
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CredentialStore, FlatFileStorage};
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_profile_returns_stored_record() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
        let session = storage.checkout().await.unwrap();

        let alice = json!({ "username": "alice", "email": "a@x.com", "password": "pw" });
        session
            .insert(USERS_COLLECTION, alice.as_object().unwrap().clone())
            .await
            .unwrap();

        let claims = Claims {
            username: "alice".to_string(),
        };
        let doc = get_profile(session.as_ref(), &claims).await.unwrap();
        assert_eq!(Value::Object(doc), alice);
    }

    #[tokio::test]
    async fn test_profile_missing_user() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
        let session = storage.checkout().await.unwrap();

        let claims = Claims {
            username: "ghost".to_string(),
        };
        let result = get_profile(session.as_ref(), &claims).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
