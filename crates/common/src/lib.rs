// ================
// common/src/lib.rs
// ================
//! Wire types shared between the userauth server and its clients.
//! Request bodies, the signin response, token claims and the
//! persisted user record layout.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/signup`
/// # Fields
/// * `username` - Identifier of the new user (uniqueness is not checked)
/// * `email` - Contact address, stored as given
/// * `password` - Stored as given
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/signin`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Successful signin response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed bearer token
    pub access_token: String,
}

/// Claims carried by a session token.
///
/// Only `username` is set. There is no `exp` or `iat`, so a token stays
/// valid for as long as the signing secret does.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub username: String,
}

/// A user as persisted in the `users` collection.
///
/// The password is kept in clear text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<SignupRequest> for UserRecord {
    fn from(req: SignupRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}
