// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNUP: &str = "auth.signup";
pub const SIGNIN_SUCCESS: &str = "auth.signin.success";
pub const SIGNIN_FAILURE: &str = "auth.signin.failure";
pub const PROFILE_READ: &str = "user.profile.read";
pub const TOKEN_REJECTED: &str = "auth.token.rejected";
