//! Authentication models shared by the services, middleware, and repositories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::UserId;
use crate::errors::Error;

/// Prefix carried by every bearer token issued by this service.
pub const TOKEN_PREFIX: &str = "fk_";

/// A registered account. The credential hash is never part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub token_hash: String,
}

/// Request-scoped identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub email: String,
}

impl AuthContext {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self { user_id, email: email.into() }
    }
}

impl From<&User> for AuthContext {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.email.clone())
    }
}

/// A freshly issued credential. The plaintext is shown once and never stored.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub user: User,
    pub token: String,
}

/// Errors returned by authentication middleware/services.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: bearer token missing")]
    MissingBearer,
    #[error("unauthorized: malformed bearer token")]
    MalformedBearer,
    #[error("unauthorized: unknown user")]
    UnknownUser,
    #[error("unauthorized: invalid credential")]
    InvalidCredential,
    #[error(transparent)]
    Persistence(#[from] Error),
}

impl AuthError {
    /// Label used for the `status` dimension of authentication metrics.
    pub fn metric_status(&self) -> &'static str {
        match self {
            AuthError::MissingBearer => "missing_bearer",
            AuthError::MalformedBearer => "malformed",
            AuthError::UnknownUser => "not_found",
            AuthError::InvalidCredential => "invalid_secret",
            AuthError::Persistence(_) => "error",
        }
    }
}
