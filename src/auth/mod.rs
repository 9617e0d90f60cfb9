//! Authentication and authorization module entry point.
//!
//! Bearer token verification, account provisioning, the axum middleware that
//! guards the forms API, and the ownership predicate used by mutations.

pub mod auth_service;
pub mod authorization;
mod hashing;
pub mod middleware;
pub mod models;
pub mod user_service;

pub use auth_service::AuthService;
pub use authorization::is_owner;
pub use models::{AuthContext, AuthError, IssuedToken, User};
pub use user_service::UserService;
