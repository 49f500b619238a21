// ============================
// userauth-backend-lib/src/lib.rs
// ============================
//! Core functionality for the userauth server: signup, signin and the
//! bearer-protected profile endpoint.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod profile;
pub mod routes;
pub mod storage;

use crate::auth::TokenService;
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::FlatFileStorage;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Credential store
    pub storage: S,
    /// Token issuing and validation
    pub tokens: Arc<TokenService>,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
}

impl<S> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, settings: Settings) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::new(&settings.jwt_secret)?);
        Ok(Self {
            storage,
            tokens,
            settings: Arc::new(settings),
        })
    }
}

impl AppState<FlatFileStorage> {
    /// Open the flat-file store described by `settings` and build the state
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let storage = FlatFileStorage::from_settings(&settings.store)?;
        Ok(Self::new(storage, settings)?)
    }
}
