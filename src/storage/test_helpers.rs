//! Test database utilities for in-library tests.
//!
//! Each call to [`memory_pool`] opens a private in-memory SQLite database with
//! all migrations applied. The pool holds a single connection so the database
//! lives exactly as long as the pool.
//!
//! This module is only available in test builds (`#[cfg(test)]`).

use crate::auth::models::{NewUser, User};
use crate::config::DatabaseConfig;
use crate::storage::repositories::{SqlxUserRepository, UserRepository};
use crate::storage::{create_pool, DbPool};

/// Fresh, migrated in-memory database.
pub async fn memory_pool() -> DbPool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        idle_timeout_seconds: 0,
        auto_migrate: true,
        ..Default::default()
    };

    create_pool(&config).await.expect("create in-memory test pool")
}

/// Insert a user with a placeholder credential.
pub async fn seed_user(pool: &DbPool, email: &str) -> User {
    SqlxUserRepository::new(pool.clone())
        .create_user(NewUser { email: email.to_string(), token_hash: "unused".to_string() })
        .await
        .expect("seed user")
}
