use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{create_form, form_path, read_bytes, read_json, send_request, setup_test_app};

#[tokio::test]
async fn enabled_form_is_readable_by_any_user() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let reader = app.issue_user("reader@example.com").await;

    let form = create_form(
        &app,
        &owner.token,
        json!({
            "title": "Customer feedback",
            "description": "Tell us how we did",
            "questions": [{ "label": "Rating", "kind": "scale" }]
        }),
    )
    .await;

    for token in [&owner.token, &reader.token] {
        let response =
            send_request(&app, Method::GET, &form_path(&form["friendly_id"]), Some(token), None)
                .await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Value = read_json(response).await;
        assert_eq!(fetched, form);
    }

    let keys: Vec<&str> = {
        let mut keys: Vec<&str> = form.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        keys
    };
    assert_eq!(
        keys,
        [
            "created_at",
            "description",
            "enabled",
            "friendly_id",
            "id",
            "questions",
            "title",
            "updated_at",
            "user_id"
        ]
    );
}

#[tokio::test]
async fn disabled_form_is_indistinguishable_from_missing() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Draft", "enabled": false })).await;

    let disabled =
        send_request(&app, Method::GET, &form_path(&form["friendly_id"]), Some(&owner.token), None)
            .await;
    assert_eq!(disabled.status(), StatusCode::NOT_FOUND);
    let disabled_body: Value = read_json(disabled).await;

    // same friendly id, now gone for real
    sqlx::query("DELETE FROM forms").execute(&app.pool).await.unwrap();
    let missing =
        send_request(&app, Method::GET, &form_path(&form["friendly_id"]), Some(&owner.token), None)
            .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let missing_body: Value = read_json(missing).await;

    assert_eq!(disabled_body, missing_body);
}

#[tokio::test]
async fn unknown_friendly_id_is_not_found() {
    let app = setup_test_app().await;
    let user = app.issue_user("reader@example.com").await;

    let response =
        send_request(&app, Method::GET, "/api/v1/forms/does-not-exist", Some(&user.token), None)
            .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_bytes(response).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "not_found");
}
