//! User repository
//!
//! Persists accounts together with the argon2 hash of their current bearer secret.

use crate::auth::models::{NewUser, User};
use crate::domain::UserId;
use crate::errors::{Error, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    pub id: UserId,
    pub email: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_parts(self) -> (User, String) {
        let user = User {
            id: self.id,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (user, self.token_hash)
    }
}

const USER_COLUMNS: &str = "id, email, token_hash, created_at, updated_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get a user by ID
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Get a user by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get a user with its credential hash for authentication
    async fn get_user_with_credential(&self, id: UserId) -> Result<Option<(User, String)>>;

    /// Replace a user's credential hash
    async fn update_token_hash(&self, id: UserId, token_hash: String) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_row(&self, id: UserId) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::database(e, format!("Failed to fetch user {}", id)))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(skip(self, user), fields(user_email = %user.email), name = "db_create_user")]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (email, token_hash, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&user.email)
        .bind(&user.token_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let err = Error::database(e, format!("Failed to create user '{}'", user.email));
            if err.is_unique_violation() {
                Error::conflict(format!("User with email '{}' already exists", user.email))
            } else {
                err
            }
        })?;

        let id = UserId::from_i64(result.last_insert_rowid());
        self.get_user(id)
            .await?
            .ok_or_else(|| Error::internal(format!("User {} missing after insert", id)))
    }

    #[instrument(skip(self), name = "db_get_user")]
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.fetch_row(id).await?.map(|row| row.into_parts().0))
    }

    #[instrument(skip(self), name = "db_get_user_by_email")]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::database(e, format!("Failed to fetch user by email '{}'", email)))?;

        Ok(row.map(|row| row.into_parts().0))
    }

    #[instrument(skip(self), name = "db_get_user_with_credential")]
    async fn get_user_with_credential(&self, id: UserId) -> Result<Option<(User, String)>> {
        Ok(self.fetch_row(id).await?.map(UserRow::into_parts))
    }

    #[instrument(skip(self, token_hash), name = "db_update_token_hash")]
    async fn update_token_hash(&self, id: UserId, token_hash: String) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET token_hash = $1, updated_at = $2 WHERE id = $3")
                .bind(token_hash)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| Error::database(e, format!("Failed to update credential for {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("User {} not found", id)));
        }

        Ok(())
    }
}
