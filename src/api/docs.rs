use axum::Json;
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(title = "formkeeper", description = "Form management API"),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::forms::list_forms_handler,
        crate::api::handlers::forms::get_form_handler,
        crate::api::handlers::forms::create_form_handler,
        crate::api::handlers::forms::update_form_handler,
        crate::api::handlers::forms::delete_form_handler
    ),
    components(
        schemas(
            crate::api::handlers::health::HealthResponse,
            crate::api::error::ErrorBody,
            crate::domain::Form,
            crate::domain::FormAttributes,
            crate::domain::FormEnvelope
        )
    ),
    tags(
        (name = "forms", description = "Create, read, update and delete forms"),
        (name = "health", description = "Liveness and readiness")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("fk_<user_id>.<secret>")
                    .build(),
            ),
        );
    }
}

/// Serves the generated OpenAPI document.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
