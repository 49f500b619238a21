// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod service;
pub mod token;

pub use service::{signin, signup};
pub use token::{TokenService, TOKEN_ALGORITHM};
