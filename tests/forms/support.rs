use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response, StatusCode},
    Router,
};
use formkeeper::{
    auth::{IssuedToken, UserService},
    storage::{self, DbPool},
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub struct TestApp {
    pub pool: DbPool,
    pub users: UserService,
}

impl TestApp {
    pub fn router(&self) -> Router {
        formkeeper::api::build_router(self.pool.clone())
    }

    /// Register a user and return the raw token (without the `Bearer ` prefix).
    pub async fn issue_user(&self, email: &str) -> IssuedToken {
        self.users.create_user(email).await.expect("create user")
    }

    pub async fn form_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM forms")
            .fetch_one(&self.pool)
            .await
            .expect("count forms")
    }
}

pub async fn setup_test_app() -> TestApp {
    // One connection keeps the private in-memory database alive and isolated per test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .connect("sqlite::memory:")
        .await
        .expect("create sqlite pool");

    storage::run_migrations(&pool).await.expect("run migrations for tests");

    let users = UserService::with_sqlx(pool.clone());
    TestApp { pool, users }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    app.router().oneshot(request).await.expect("request")
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

pub async fn read_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.expect("read body").to_vec()
}

/// Create a form over HTTP and return its JSON representation.
pub async fn create_form(app: &TestApp, token: &str, attributes: Value) -> Value {
    let response =
        send_request(app, Method::POST, "/api/v1/forms", Some(token), Some(json!({ "form": attributes })))
            .await;
    assert_eq!(response.status(), StatusCode::OK, "create form failed");
    read_json(response).await
}

pub fn form_path(friendly_id: &Value) -> String {
    format!("/api/v1/forms/{}", friendly_id.as_str().expect("friendly_id string"))
}
