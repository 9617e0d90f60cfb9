//! Ownership checks for form mutations.

use crate::auth::models::AuthContext;
use crate::domain::Form;

/// True when `requester` owns `form`.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use formkeeper::auth::authorization::is_owner;
/// use formkeeper::auth::models::AuthContext;
/// use formkeeper::domain::{Form, FormId, UserId};
///
/// let form = Form {
///     id: FormId::from_i64(1),
///     friendly_id: "contact".into(),
///     user_id: UserId::from_i64(7),
///     title: "Contact".into(),
///     description: None,
///     questions: serde_json::json!([]),
///     enabled: true,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
///
/// assert!(is_owner(&form, &AuthContext::new(UserId::from_i64(7), "owner@example.com")));
/// assert!(!is_owner(&form, &AuthContext::new(UserId::from_i64(8), "other@example.com")));
/// ```
pub fn is_owner(form: &Form, requester: &AuthContext) -> bool {
    form.user_id == requester.user_id
}
