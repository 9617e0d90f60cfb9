use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{create_form, form_path, read_bytes, read_json, send_request, setup_test_app};

#[tokio::test]
async fn owner_can_delete_form() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Temporary" })).await;
    let path = form_path(&form["friendly_id"]);

    let response = send_request(&app, Method::DELETE, &path, Some(&owner.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(read_bytes(response).await.is_empty());
    assert_eq!(app.form_count().await, 0);

    let get = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let put = send_request(
        &app,
        Method::PUT,
        &path,
        Some(&owner.token),
        Some(json!({ "form": { "title": "Back" } })),
    )
    .await;
    assert_eq!(put.status(), StatusCode::NOT_FOUND);

    let again = send_request(&app, Method::DELETE, &path, Some(&owner.token), None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owner_can_delete_disabled_form() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Hidden", "enabled": false })).await;

    let response =
        send_request(&app, Method::DELETE, &form_path(&form["friendly_id"]), Some(&owner.token), None)
            .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_owner_delete_is_forbidden() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let intruder = app.issue_user("intruder@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Keep me" })).await;
    let path = form_path(&form["friendly_id"]);

    let response = send_request(&app, Method::DELETE, &path, Some(&intruder.token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(app.form_count().await, 1);
    let fetched = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    let fetched: Value = read_json(fetched).await;
    assert_eq!(fetched, form);
}

#[tokio::test]
async fn delete_of_missing_form_is_not_found() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;

    let response =
        send_request(&app, Method::DELETE, "/api/v1/forms/ghost", Some(&owner.token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
