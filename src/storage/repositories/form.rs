//! Form repository
//!
//! CRUD access to the `forms` table. Questions are stored as JSON text and
//! listing order follows the autoincrement key, which is creation order.

use crate::domain::{Form, FormChanges, FormId, NewForm, UserId};
use crate::errors::{Error, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct FormRow {
    pub id: FormId,
    pub friendly_id: String,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub questions: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FormRow> for Form {
    type Error = Error;

    fn try_from(row: FormRow) -> Result<Self> {
        let questions = serde_json::from_str(&row.questions).map_err(|e| {
            Error::internal(format!("Corrupt questions for form '{}': {}", row.friendly_id, e))
        })?;

        Ok(Form {
            id: row.id,
            friendly_id: row.friendly_id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            questions,
            enabled: row.enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const FORM_COLUMNS: &str =
    "id, friendly_id, user_id, title, description, questions, enabled, created_at, updated_at";

#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Insert a new form. A taken friendly id surfaces as a UNIQUE violation.
    async fn create(&self, form: NewForm) -> Result<Form>;

    /// Look a form up by its public identifier, regardless of `enabled`.
    async fn find_by_friendly_id(&self, friendly_id: &str) -> Result<Option<Form>>;

    /// Every form, oldest first.
    async fn list_all(&self) -> Result<Vec<Form>>;

    async fn friendly_id_exists(&self, friendly_id: &str) -> Result<bool>;

    /// Apply changes in place; untouched columns keep their values.
    async fn update(&self, id: FormId, changes: FormChanges) -> Result<Form>;

    async fn delete(&self, id: FormId) -> Result<()>;

    async fn count(&self) -> Result<i64>;
}

#[derive(Debug, Clone)]
pub struct SqlxFormRepository {
    pool: DbPool,
}

impl SqlxFormRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn get_by_id(&self, id: FormId) -> Result<Form> {
        let row = sqlx::query_as::<_, FormRow>(&format!(
            "SELECT {} FROM forms WHERE id = $1",
            FORM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::database(e, format!("Failed to fetch form {}", id)))?;

        match row {
            Some(row) => Form::try_from(row),
            None => Err(Error::not_found(format!("Form {} not found", id))),
        }
    }
}

#[async_trait]
impl FormRepository for SqlxFormRepository {
    #[instrument(skip(self, form), fields(friendly_id = %form.friendly_id, user_id = %form.user_id), name = "db_create_form")]
    async fn create(&self, form: NewForm) -> Result<Form> {
        let now = Utc::now();
        let questions = serde_json::to_string(&form.questions)?;

        let result = sqlx::query(
            "INSERT INTO forms (friendly_id, user_id, title, description, questions, enabled, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&form.friendly_id)
        .bind(form.user_id)
        .bind(&form.title)
        .bind(form.description.as_ref())
        .bind(questions)
        .bind(form.enabled)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::database(e, format!("Failed to create form '{}'", form.friendly_id)))?;

        self.get_by_id(FormId::from_i64(result.last_insert_rowid())).await
    }

    #[instrument(skip(self), name = "db_find_form")]
    async fn find_by_friendly_id(&self, friendly_id: &str) -> Result<Option<Form>> {
        let row = sqlx::query_as::<_, FormRow>(&format!(
            "SELECT {} FROM forms WHERE friendly_id = $1",
            FORM_COLUMNS
        ))
        .bind(friendly_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::database(e, format!("Failed to fetch form '{}'", friendly_id)))?;

        row.map(Form::try_from).transpose()
    }

    #[instrument(skip(self), name = "db_list_forms")]
    async fn list_all(&self) -> Result<Vec<Form>> {
        let rows = sqlx::query_as::<_, FormRow>(&format!(
            "SELECT {} FROM forms ORDER BY id ASC",
            FORM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::database(e, "Failed to list forms"))?;

        rows.into_iter().map(Form::try_from).collect()
    }

    #[instrument(skip(self), name = "db_form_exists")]
    async fn friendly_id_exists(&self, friendly_id: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM forms WHERE friendly_id = $1)")
                .bind(friendly_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    Error::database(e, format!("Failed to check friendly id '{}'", friendly_id))
                })?;

        Ok(exists)
    }

    #[instrument(skip(self, changes), name = "db_update_form")]
    async fn update(&self, id: FormId, changes: FormChanges) -> Result<Form> {
        let questions = changes.questions.as_ref().map(serde_json::to_string).transpose()?;
        let (clear_description, description) = match changes.description {
            Some(value) => (true, value),
            None => (false, None),
        };

        let result = sqlx::query(
            "UPDATE forms SET \
                title = COALESCE($1, title), \
                description = CASE WHEN $2 THEN $3 ELSE description END, \
                questions = COALESCE($4, questions), \
                enabled = COALESCE($5, enabled), \
                updated_at = $6 \
             WHERE id = $7",
        )
        .bind(changes.title)
        .bind(clear_description)
        .bind(description)
        .bind(questions)
        .bind(changes.enabled)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::database(e, format!("Failed to update form {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("Form {} not found", id)));
        }

        self.get_by_id(id).await
    }

    #[instrument(skip(self), name = "db_delete_form")]
    async fn delete(&self, id: FormId) -> Result<()> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::database(e, format!("Failed to delete form {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!("Form {} not found", id)));
        }

        Ok(())
    }

    #[instrument(skip(self), name = "db_count_forms")]
    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM forms")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::database(e, "Failed to count forms"))
    }
}
