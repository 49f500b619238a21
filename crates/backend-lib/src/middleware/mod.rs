// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the userauth server.

pub mod bearer;
pub mod cors;

pub use bearer::require_bearer;
pub use cors::cors_layer;
