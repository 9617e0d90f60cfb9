//! # formkeeper
//!
//! A REST service for managing forms. Authenticated users create forms, list
//! and read them, and update or delete the ones they own.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum) → auth middleware → FormService → FormRepository → SQLite
//!                     ↓                ↓
//!               AuthService     ownership / visibility rules
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use formkeeper::{api::start_api_server, config::AppConfig, storage::create_pool, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let pool = create_pool(&config.database).await?;
//!     start_api_server(config.api, pool).await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod services;
pub mod storage;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
