use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{create_form, form_path, read_json, send_request, setup_test_app};

#[tokio::test]
async fn every_forms_endpoint_requires_a_token() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Guarded" })).await;
    let path = form_path(&form["friendly_id"]);

    let cases = [
        (Method::GET, "/api/v1/forms".to_string(), None),
        (Method::POST, "/api/v1/forms".to_string(), Some(json!({ "form": { "title": "x" } }))),
        (Method::GET, path.clone(), None),
        (Method::PUT, path.clone(), Some(json!({ "form": { "title": "changed" } }))),
        (Method::DELETE, path.clone(), None),
    ];

    for (method, uri, body) in cases {
        let response = send_request(&app, method.clone(), &uri, None, body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        let body: Value = read_json(response).await;
        assert_eq!(body["error"], "unauthorized");
    }

    // nothing changed
    assert_eq!(app.form_count().await, 1);
    let response = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    let stored: Value = read_json(response).await;
    assert_eq!(stored["title"], "Guarded");
}

#[tokio::test]
async fn invalid_tokens_are_rejected() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;

    let forged = format!("fk_{}.not-the-secret", owner.user.id);
    for token in ["garbage", "fk_", "fk_999.secret", forged.as_str()] {
        let response = send_request(&app, Method::GET, "/api/v1/forms", Some(token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "token {token:?}");
    }
}

#[tokio::test]
async fn unauthenticated_wins_over_not_found() {
    let app = setup_test_app().await;
    let response = send_request(&app, Method::DELETE, "/api/v1/forms/missing", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rotated_token_replaces_old_one() {
    let app = setup_test_app().await;
    let first = app.issue_user("owner@example.com").await;
    let rotated = app.users.rotate_token("owner@example.com").await.expect("rotate");

    let old = send_request(&app, Method::GET, "/api/v1/forms", Some(&first.token), None).await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = send_request(&app, Method::GET, "/api/v1/forms", Some(&rotated.token), None).await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_and_docs_are_public() {
    let app = setup_test_app().await;

    let health = send_request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(health.status(), StatusCode::OK);
    let body: Value = read_json(health).await;
    assert_eq!(body, json!({ "status": "ok" }));

    let docs = send_request(&app, Method::GET, "/api/v1/openapi.json", None, None).await;
    assert_eq!(docs.status(), StatusCode::OK);
    let doc: Value = read_json(docs).await;
    assert!(doc["paths"]["/api/v1/forms"].is_object());
}

#[tokio::test]
async fn unknown_user_and_wrong_secret_look_the_same() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;

    let existing = format!("fk_{}.wrong", owner.user.id);
    let existing = send_request(&app, Method::GET, "/api/v1/forms", Some(&existing), None).await;
    assert_eq!(existing.status(), StatusCode::UNAUTHORIZED);
    let existing: Value = read_json(existing).await;

    let missing = send_request(&app, Method::GET, "/api/v1/forms", Some("fk_9999.wrong"), None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let missing: Value = read_json(missing).await;

    assert_eq!(existing, missing);
}
