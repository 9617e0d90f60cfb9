//! Account provisioning and bearer token issuance.
//!
//! A token is `fk_<user_id>.<secret>`. Only the argon2 hash of the secret is
//! stored, so the plaintext token is returned exactly once.

use std::sync::Arc;

use argon2::Argon2;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::{
    hashing,
    models::{IssuedToken, NewUser, User, TOKEN_PREFIX},
};
use crate::errors::{Error, Result};
use crate::observability::metrics;
use crate::storage::repositories::{SqlxUserRepository, UserRepository};

const SECRET_LENGTH: usize = 48;

#[derive(Debug, Validate)]
struct EmailInput {
    #[validate(email(message = "email must be a valid address"))]
    email: String,
}

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    argon2: Arc<Argon2<'static>>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository, argon2: Arc::new(hashing::password_hasher()) }
    }

    pub fn with_sqlx(pool: crate::storage::DbPool) -> Self {
        Self::new(Arc::new(SqlxUserRepository::new(pool)))
    }

    /// Register a user and issue its first token.
    #[instrument(skip(self))]
    pub async fn create_user(&self, email: &str) -> Result<IssuedToken> {
        let email = normalize_email(email)?;
        let secret = generate_secret();
        let token_hash = hashing::hash_secret(&self.argon2, &secret)?;

        let user = self.repository.create_user(NewUser { email, token_hash }).await?;
        metrics::record_token_issued(false).await;
        info!(user_id = %user.id, "user created");

        Ok(issued(user, &secret))
    }

    /// Replace a user's credential; the previous token stops working immediately.
    #[instrument(skip(self))]
    pub async fn rotate_token(&self, email: &str) -> Result<IssuedToken> {
        let email = normalize_email(email)?;
        let user = self
            .repository
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| Error::not_found(format!("User with email '{}' not found", email)))?;

        let secret = generate_secret();
        let token_hash = hashing::hash_secret(&self.argon2, &secret)?;
        self.repository.update_token_hash(user.id, token_hash).await?;
        metrics::record_token_issued(true).await;
        info!(user_id = %user.id, "user token rotated");

        Ok(issued(user, &secret))
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let input = EmailInput { email: email.trim().to_lowercase() };
    input.validate()?;
    Ok(input.email)
}

fn generate_secret() -> String {
    OsRng.sample_iter(&Alphanumeric).take(SECRET_LENGTH).map(char::from).collect()
}

fn issued(user: User, secret: &str) -> IssuedToken {
    let token = format!("{}{}.{}", TOKEN_PREFIX, user.id, secret);
    IssuedToken { user, token }
}
