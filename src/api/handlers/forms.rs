//! Handlers for `/api/v1/forms`.
//!
//! Request bodies use the `{"form": {...}}` envelope. A body that is missing,
//! not JSON, or lacks the envelope reaches the service as "no attributes", so
//! update still reports a missing or foreign form before complaining about
//! the payload.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{debug, instrument};

use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::auth::AuthContext;
use crate::domain::{Form, FormAttributes, FormEnvelope};

fn attributes_from(payload: Result<Json<FormEnvelope>, JsonRejection>) -> Option<FormAttributes> {
    match payload {
        Ok(Json(envelope)) => envelope.form,
        Err(rejection) => {
            debug!(error = %rejection, "request body rejected");
            None
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/forms",
    responses(
        (status = 200, description = "All forms in creation order", body = [Form]),
        (status = 401, description = "Missing or invalid bearer token", body = crate::api::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "forms"
)]
#[instrument(skip(state, context), fields(user_id = %context.user_id))]
pub async fn list_forms_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<Vec<Form>>, ApiError> {
    let forms = state.form_service.list(&context).await?;
    Ok(Json(forms))
}

#[utoipa::path(
    get,
    path = "/api/v1/forms/{friendly_id}",
    params(("friendly_id" = String, Path, description = "Public identifier of the form")),
    responses(
        (status = 200, description = "Form details", body = Form),
        (status = 401, description = "Missing or invalid bearer token", body = crate::api::error::ErrorBody),
        (status = 404, description = "Form not found or disabled", body = crate::api::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "forms"
)]
#[instrument(skip(state, context), fields(user_id = %context.user_id))]
pub async fn get_form_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(friendly_id): Path<String>,
) -> Result<Json<Form>, ApiError> {
    let form = state.form_service.get(&friendly_id, &context).await?;
    Ok(Json(form))
}

#[utoipa::path(
    post,
    path = "/api/v1/forms",
    request_body = FormEnvelope,
    responses(
        (status = 200, description = "Form created", body = Form),
        (status = 400, description = "Missing, empty, or invalid attributes", body = crate::api::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::api::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "forms"
)]
#[instrument(skip(state, context, payload), fields(user_id = %context.user_id))]
pub async fn create_form_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    payload: Result<Json<FormEnvelope>, JsonRejection>,
) -> Result<Json<Form>, ApiError> {
    let form = state.form_service.create(attributes_from(payload), &context).await?;
    Ok(Json(form))
}

#[utoipa::path(
    put,
    path = "/api/v1/forms/{friendly_id}",
    params(("friendly_id" = String, Path, description = "Public identifier of the form")),
    request_body = FormEnvelope,
    responses(
        (status = 200, description = "Form updated", body = Form),
        (status = 400, description = "Missing, empty, or invalid attributes", body = crate::api::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::api::error::ErrorBody),
        (status = 403, description = "Form belongs to another user", body = crate::api::error::ErrorBody),
        (status = 404, description = "Form not found", body = crate::api::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "forms"
)]
#[instrument(skip(state, context, payload), fields(user_id = %context.user_id))]
pub async fn update_form_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(friendly_id): Path<String>,
    payload: Result<Json<FormEnvelope>, JsonRejection>,
) -> Result<Json<Form>, ApiError> {
    let form = state.form_service.update(&friendly_id, attributes_from(payload), &context).await?;
    Ok(Json(form))
}

#[utoipa::path(
    delete,
    path = "/api/v1/forms/{friendly_id}",
    params(("friendly_id" = String, Path, description = "Public identifier of the form")),
    responses(
        (status = 200, description = "Form deleted; empty body"),
        (status = 401, description = "Missing or invalid bearer token", body = crate::api::error::ErrorBody),
        (status = 403, description = "Form belongs to another user", body = crate::api::error::ErrorBody),
        (status = 404, description = "Form not found", body = crate::api::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "forms"
)]
#[instrument(skip(state, context), fields(user_id = %context.user_id))]
pub async fn delete_form_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(friendly_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.form_service.delete(&friendly_id, &context).await?;
    Ok(StatusCode::OK)
}
