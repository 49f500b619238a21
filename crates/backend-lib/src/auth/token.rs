// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Session token issuing and validation (HS256 JWT).
use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashSet;
use userauth_common::Claims;

/// Signing algorithm for every token this service issues or accepts
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and validates bearer tokens with a shared secret.
///
/// Holds no state beyond the key material; tokens are never stored.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Build a token service from the shared secret.
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Internal(
                "token signing secret is not configured".to_string(),
            ));
        }

        // Tokens carry no exp/iat, so nothing is required or time-checked
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Sign `claims` into a compact JWT
    pub fn issue(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(TOKEN_ALGORITHM), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify signature and algorithm, returning the embedded claims
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthenticated(format!("{:?}", e.kind())))
    }
}
