use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{create_form, read_json, send_request, setup_test_app};

#[tokio::test]
async fn list_returns_every_form_in_creation_order() {
    let app = setup_test_app().await;
    let alice = app.issue_user("alice@example.com").await;
    let bob = app.issue_user("bob@example.com").await;

    let first = create_form(&app, &alice.token, json!({ "title": "Zebra survey" })).await;
    let second = create_form(&app, &bob.token, json!({ "title": "Apple poll", "enabled": false })).await;
    let third = create_form(&app, &alice.token, json!({ "title": "Mango quiz" })).await;

    let response = send_request(&app, Method::GET, "/api/v1/forms", Some(&bob.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed: Vec<Value> = read_json(response).await;
    assert_eq!(listed.len() as i64, app.form_count().await);
    assert_eq!(listed, vec![first, second, third]);
}

#[tokio::test]
async fn list_is_empty_without_forms() {
    let app = setup_test_app().await;
    let user = app.issue_user("alice@example.com").await;

    let response = send_request(&app, Method::GET, "/api/v1/forms", Some(&user.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<Value> = read_json(response).await;
    assert!(listed.is_empty());
}
