//! Form resource model and its write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{FormId, UserId};
use crate::errors::{Error, Result};

/// A stored form. Serializes with exactly these keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Form {
    pub id: FormId,
    pub friendly_id: String,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub questions: Value,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    pub fn is_visible(&self) -> bool {
        self.enabled
    }
}

/// Writable form attributes as submitted by a client.
///
/// Every field is optional so the same shape serves create and update; the
/// service decides which ones are required. An explicit `null` is kept apart
/// from an absent key (`Some(None)` vs `None`). Unknown keys such as `id`,
/// `user_id`, or `friendly_id` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormAttributes {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub questions: Option<Value>,

    pub enabled: Option<bool>,
}

impl FormAttributes {
    /// True when no writable attribute was supplied. A key sent as `null` counts.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.questions.is_none()
            && self.enabled.is_none()
    }

    /// Field-level validation shared by create and update.
    pub fn check(&self) -> Result<()> {
        match &self.title {
            Some(None) => return Err(Error::validation("title cannot be null")),
            Some(Some(title)) if !(1..=MAX_TITLE_LENGTH).contains(&title.chars().count()) => {
                return Err(Error::validation(format!(
                    "title must be between 1 and {} characters",
                    MAX_TITLE_LENGTH
                )));
            }
            _ => {}
        }

        if let Some(Some(description)) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(Error::validation(format!(
                    "description must be at most {} characters",
                    MAX_DESCRIPTION_LENGTH
                )));
            }
        }

        if let Some(questions) = &self.questions {
            let items = questions
                .as_array()
                .ok_or_else(|| Error::validation("questions must be an array"))?;
            if items.iter().any(|item| !item.is_object()) {
                return Err(Error::validation("each question must be an object"));
            }
        }

        Ok(())
    }
}

const MAX_TITLE_LENGTH: usize = 255;
const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// `null` becomes `Some(None)`; a missing key falls back to `None` via `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Keeps an explicit `null` as `Some(Value::Null)` so validation can reject it.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Request envelope: `{"form": {...}}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FormEnvelope {
    #[serde(default)]
    pub form: Option<FormAttributes>,
}

/// Insert payload for a new form.
#[derive(Debug, Clone)]
pub struct NewForm {
    pub user_id: UserId,
    pub friendly_id: String,
    pub title: String,
    pub description: Option<String>,
    pub questions: Value,
    pub enabled: bool,
}

/// In-place changes to an existing form; `None` leaves a column untouched.
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct FormChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub questions: Option<Value>,
    pub enabled: Option<bool>,
}

impl From<FormAttributes> for FormChanges {
    fn from(attributes: FormAttributes) -> Self {
        Self {
            title: attributes.title.flatten(),
            description: attributes.description,
            questions: attributes.questions,
            enabled: attributes.enabled,
        }
    }
}
