//! # Configuration Management
//!
//! Environment-driven configuration for the API server, the SQLite store, and
//! the logging/metrics stack.

mod settings;

pub use settings::{ApiServerConfig, AppConfig, DatabaseConfig, ObservabilityConfig};
