//! Repository modules for data access
//!
//! Each repository handles CRUD operations for a specific resource type.

pub mod form;
pub mod user;

pub use form::{FormRepository, SqlxFormRepository};
pub use user::{SqlxUserRepository, UserRepository};
