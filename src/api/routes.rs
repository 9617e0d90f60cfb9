use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::auth::{auth_service::AuthService, middleware::authenticate};
use crate::observability::record_http_metrics;
use crate::services::FormService;
use crate::storage::DbPool;

use super::{
    docs::openapi_handler,
    handlers::{
        create_form_handler, delete_form_handler, get_form_handler, health_handler,
        list_forms_handler, update_form_handler,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub pool: DbPool,
    pub form_service: Arc<FormService>,
}

impl ApiState {
    pub fn new(pool: DbPool) -> Self {
        let form_service = Arc::new(FormService::with_sqlx(pool.clone()));
        Self { pool, form_service }
    }
}

pub fn build_router(pool: DbPool) -> Router {
    let api_state = ApiState::new(pool.clone());

    let auth_layer = {
        let auth_service = Arc::new(AuthService::with_sqlx(pool));
        middleware::from_fn_with_state(auth_service, authenticate)
    };

    let secured_api = Router::new()
        .route("/api/v1/forms", get(list_forms_handler).post(create_form_handler))
        .route(
            "/api/v1/forms/{friendly_id}",
            get(get_form_handler).put(update_form_handler).delete(delete_form_handler),
        )
        .route_layer(auth_layer);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/openapi.json", get(openapi_handler))
        .merge(secured_api)
        .with_state(api_state)
        .layer(middleware::from_fn(record_http_metrics))
        .layer(TraceLayer::new_for_http())
}
