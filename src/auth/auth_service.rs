//! Authentication of `Authorization: Bearer fk_<user_id>.<secret>` headers.

use std::sync::Arc;

use argon2::Argon2;
use tracing::{field, info, instrument};

use crate::auth::{
    hashing,
    models::{AuthContext, AuthError, TOKEN_PREFIX},
};
use crate::domain::UserId;
use crate::observability::metrics;
use crate::storage::repositories::{SqlxUserRepository, UserRepository};

#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    argon2: Arc<Argon2<'static>>,
}

impl AuthService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository, argon2: Arc::new(hashing::password_hasher()) }
    }

    pub fn with_sqlx(pool: crate::storage::DbPool) -> Self {
        Self::new(Arc::new(SqlxUserRepository::new(pool)))
    }

    /// Resolve an `Authorization` header value into the caller's identity.
    #[instrument(skip(self, header), fields(user_id = field::Empty))]
    pub async fn authenticate(&self, header: &str) -> Result<AuthContext, AuthError> {
        match self.verify(header).await {
            Ok(context) => {
                tracing::Span::current().record("user_id", context.user_id.as_i64());
                metrics::record_authentication("success").await;
                info!(user_id = %context.user_id, "bearer token authenticated");
                Ok(context)
            }
            Err(err) => {
                metrics::record_authentication(err.metric_status()).await;
                Err(err)
            }
        }
    }

    async fn verify(&self, header: &str) -> Result<AuthContext, AuthError> {
        let (user_id, secret) = parse_bearer(header)?;

        let (user, stored_hash) = self
            .repository
            .get_user_with_credential(user_id)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if !hashing::verify_secret(&self.argon2, secret, &stored_hash) {
            return Err(AuthError::InvalidCredential);
        }

        Ok(AuthContext::from(&user))
    }
}

/// Split a header value into the user id and secret it carries.
pub(crate) fn parse_bearer(header: &str) -> Result<(UserId, &str), AuthError> {
    let token = header.trim();
    if token.is_empty() {
        return Err(AuthError::MissingBearer);
    }

    let token = token.strip_prefix("Bearer ").ok_or(AuthError::MalformedBearer)?.trim();
    let stripped = token.strip_prefix(TOKEN_PREFIX).ok_or(AuthError::MalformedBearer)?;
    let (id, secret) = stripped.split_once('.').ok_or(AuthError::MalformedBearer)?;

    if secret.is_empty() {
        return Err(AuthError::MalformedBearer);
    }

    let user_id = id.parse::<UserId>().map_err(|_| AuthError::MalformedBearer)?;
    Ok((user_id, secret))
}
