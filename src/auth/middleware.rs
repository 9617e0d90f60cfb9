//! Axum middleware for bearer token authentication.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::{field, info_span, warn, Instrument};

use crate::api::error::ApiError;
use crate::auth::auth_service::AuthService;

pub type AuthServiceState = Arc<AuthService>;

/// Middleware entry point that authenticates requests using the configured [`AuthService`].
///
/// On success the caller's [`AuthContext`](crate::auth::models::AuthContext) is
/// inserted into the request extensions for handlers to extract.
pub async fn authenticate(
    State(auth_service): State<AuthServiceState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let correlation_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "auth_middleware.authenticate",
        http.method = %request.method(),
        http.path = %request.uri().path(),
        auth.user_id = field::Empty,
        correlation_id = %correlation_id
    );

    async move {
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        match auth_service.authenticate(&header).await {
            Ok(context) => {
                tracing::Span::current().record("auth.user_id", context.user_id.as_i64());
                request.extensions_mut().insert(context);
                Ok(next.run(request).await)
            }
            Err(err) => {
                warn!(%correlation_id, error = %err, "authentication failed");
                Err(ApiError::from(err))
            }
        }
    }
    .instrument(span)
    .await
}
