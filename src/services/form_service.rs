//! Form business logic service
//!
//! Enforces ownership, visibility, and payload rules around the form
//! repository. Authentication has already happened by the time a call lands
//! here; every operation receives the caller's [`AuthContext`] explicitly.
//!
//! Checks run in a fixed order for mutations: existence, then ownership, then
//! payload validity. A disabled form is hidden from single-form reads only.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    auth::{is_owner, AuthContext},
    domain::{
        friendly_id::MAX_ATTEMPTS, Form, FormAttributes, FormChanges, FriendlyIdGenerator, NewForm,
    },
    errors::{Error, Result},
    observability::metrics,
    storage::{DbPool, FormRepository, SqlxFormRepository},
};

/// Service for managing form business logic
#[derive(Clone)]
pub struct FormService {
    repository: Arc<dyn FormRepository>,
    friendly_ids: FriendlyIdGenerator,
}

impl FormService {
    pub fn new(repository: Arc<dyn FormRepository>) -> Self {
        Self { repository, friendly_ids: FriendlyIdGenerator::new() }
    }

    pub fn with_sqlx(pool: DbPool) -> Self {
        Self::new(Arc::new(SqlxFormRepository::new(pool)))
    }

    /// All forms in creation order, regardless of owner or `enabled`.
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn list(&self, requester: &AuthContext) -> Result<Vec<Form>> {
        let result = self.repository.list_all().await;
        if let Ok(forms) = &result {
            metrics::set_forms_total(forms.len() as i64).await;
        }
        record("list", &result).await;
        result
    }

    /// A single enabled form. Missing and disabled forms are reported identically.
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn get(&self, friendly_id: &str, requester: &AuthContext) -> Result<Form> {
        let result = self
            .repository
            .find_by_friendly_id(friendly_id)
            .await
            .and_then(|found| found.filter(Form::is_visible).ok_or_else(|| not_found(friendly_id)));
        record("get", &result).await;
        result
    }

    /// Create a form owned by the requester.
    #[instrument(skip(self, attributes, requester), fields(user_id = %requester.user_id))]
    pub async fn create(
        &self,
        attributes: Option<FormAttributes>,
        requester: &AuthContext,
    ) -> Result<Form> {
        let result = self.create_inner(attributes, requester).await;
        record("create", &result).await;
        if result.is_ok() {
            self.refresh_forms_total().await;
        }
        result
    }

    /// Update a form in place. Identity columns never change.
    #[instrument(skip(self, attributes, requester), fields(user_id = %requester.user_id))]
    pub async fn update(
        &self,
        friendly_id: &str,
        attributes: Option<FormAttributes>,
        requester: &AuthContext,
    ) -> Result<Form> {
        let result = self.update_inner(friendly_id, attributes, requester).await;
        record("update", &result).await;
        result
    }

    /// Permanently delete a form.
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn delete(&self, friendly_id: &str, requester: &AuthContext) -> Result<()> {
        let result = self.delete_inner(friendly_id, requester).await;
        record("delete", &result).await;
        if result.is_ok() {
            self.refresh_forms_total().await;
        }
        result
    }

    /// Number of stored forms, enabled or not.
    pub async fn count(&self) -> Result<i64> {
        self.repository.count().await
    }

    async fn refresh_forms_total(&self) {
        match self.count().await {
            Ok(total) => metrics::set_forms_total(total).await,
            Err(err) => warn!(error = %err, "failed to refresh forms gauge"),
        }
    }

    async fn create_inner(
        &self,
        attributes: Option<FormAttributes>,
        requester: &AuthContext,
    ) -> Result<Form> {
        let attributes = require_attributes(attributes)?;
        let title = attributes.title.clone().flatten().ok_or_else(|| Error::validation("title is required"))?;

        for attempt in 0..MAX_ATTEMPTS {
            let friendly_id = self.friendly_ids.candidate(&title, attempt);
            if self.repository.friendly_id_exists(&friendly_id).await? {
                continue;
            }

            let new_form = NewForm {
                user_id: requester.user_id,
                friendly_id,
                title: title.clone(),
                description: attributes.description.clone().flatten(),
                questions: attributes.questions.clone().unwrap_or_else(|| serde_json::json!([])),
                enabled: attributes.enabled.unwrap_or(true),
            };

            match self.repository.create(new_form).await {
                Ok(form) => {
                    info!(friendly_id = %form.friendly_id, form_id = %form.id, "Form created");
                    return Ok(form);
                }
                Err(err) if err.is_unique_violation() => {
                    warn!(attempt, "friendly id taken during insert, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(Error::internal(format!(
            "Could not allocate a unique friendly id after {} attempts",
            MAX_ATTEMPTS
        )))
    }

    async fn update_inner(
        &self,
        friendly_id: &str,
        attributes: Option<FormAttributes>,
        requester: &AuthContext,
    ) -> Result<Form> {
        let existing = self.find_owned(friendly_id, requester).await?;
        let attributes = require_attributes(attributes)?;

        let updated = self.repository.update(existing.id, FormChanges::from(attributes)).await?;
        info!(friendly_id = %updated.friendly_id, form_id = %updated.id, "Form updated");
        Ok(updated)
    }

    async fn delete_inner(&self, friendly_id: &str, requester: &AuthContext) -> Result<()> {
        let existing = self.find_owned(friendly_id, requester).await?;

        self.repository.delete(existing.id).await?;
        info!(friendly_id = %existing.friendly_id, form_id = %existing.id, "Form deleted");
        Ok(())
    }

    /// Existence first, then ownership. `enabled` plays no part here.
    async fn find_owned(&self, friendly_id: &str, requester: &AuthContext) -> Result<Form> {
        let form = self
            .repository
            .find_by_friendly_id(friendly_id)
            .await?
            .ok_or_else(|| not_found(friendly_id))?;

        if !is_owner(&form, requester) {
            warn!(
                friendly_id = %form.friendly_id,
                owner_id = %form.user_id,
                "requester does not own form"
            );
            return Err(Error::forbidden(format!(
                "You are not allowed to modify form '{}'",
                friendly_id
            )));
        }

        Ok(form)
    }
}

fn not_found(friendly_id: &str) -> Error {
    Error::not_found(format!("Form '{}' not found", friendly_id))
}

fn require_attributes(attributes: Option<FormAttributes>) -> Result<FormAttributes> {
    let attributes = attributes
        .filter(|attributes| !attributes.is_empty())
        .ok_or_else(|| Error::validation("form attributes are required"))?;
    attributes.check()?;
    Ok(attributes)
}

fn outcome<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(Error::Validation(_)) => "invalid",
        Err(Error::NotFound(_)) => "not_found",
        Err(Error::Forbidden(_)) => "forbidden",
        Err(Error::Conflict(_)) => "conflict",
        Err(_) => "error",
    }
}

async fn record<T>(operation: &str, result: &Result<T>) {
    metrics::record_form_operation(operation, outcome(result)).await;
}
