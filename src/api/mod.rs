//! # REST API Components
//!
//! HTTP routing, handlers, and error mapping for the forms API.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{build_router, ApiState};
pub use server::start_api_server;
