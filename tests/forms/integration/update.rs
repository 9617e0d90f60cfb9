use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{create_form, form_path, read_json, send_request, setup_test_app};

#[tokio::test]
async fn owner_can_update_form() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Original" })).await;
    let path = form_path(&form["friendly_id"]);

    let response = send_request(
        &app,
        Method::PUT,
        &path,
        Some(&owner.token),
        Some(json!({ "form": { "title": "Renamed", "description": "Now with details" } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Value = read_json(response).await;
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["description"], "Now with details");
    assert_eq!(updated["id"], form["id"]);
    assert_eq!(updated["friendly_id"], form["friendly_id"]);
    assert_eq!(updated["user_id"], form["user_id"]);

    let fetched = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    let fetched: Value = read_json(fetched).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn owner_can_disable_form() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Closing soon" })).await;
    let path = form_path(&form["friendly_id"]);

    let response = send_request(
        &app,
        Method::PUT,
        &path,
        Some(&owner.token),
        Some(json!({ "form": { "enabled": false } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let hidden = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);

    // disabled forms stay writable by their owner
    let response = send_request(
        &app,
        Method::PUT,
        &path,
        Some(&owner.token),
        Some(json!({ "form": { "enabled": true } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let visible = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    assert_eq!(visible.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_owner_update_is_forbidden() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let intruder = app.issue_user("intruder@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Private" })).await;
    let path = form_path(&form["friendly_id"]);

    let response = send_request(
        &app,
        Method::PUT,
        &path,
        Some(&intruder.token),
        Some(json!({ "form": { "title": "Hijacked" } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let error: Value = read_json(response).await;
    assert_eq!(error["error"], "forbidden");

    let fetched = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    let fetched: Value = read_json(fetched).await;
    assert_eq!(fetched, form);
}

#[tokio::test]
async fn ownership_is_checked_before_payload() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let intruder = app.issue_user("intruder@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Private" })).await;

    let response = send_request(
        &app,
        Method::PUT,
        &form_path(&form["friendly_id"]),
        Some(&intruder.token),
        Some(json!({ "form": {} })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_of_missing_form_is_not_found() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;

    for body in [Some(json!({ "form": { "title": "x" } })), Some(json!({ "form": {} })), None] {
        let response =
            send_request(&app, Method::PUT, "/api/v1/forms/ghost", Some(&owner.token), body).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn update_with_empty_or_invalid_payload_is_bad_request() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form = create_form(&app, &owner.token, json!({ "title": "Stable" })).await;
    let path = form_path(&form["friendly_id"]);

    let bodies = [
        Some(json!({ "form": {} })),
        Some(json!({})),
        None,
        Some(json!({ "form": { "title": "" } })),
        Some(json!({ "form": { "questions": 5 } })),
    ];

    for body in bodies {
        let response =
            send_request(&app, Method::PUT, &path, Some(&owner.token), body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
    }

    let fetched = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    let fetched: Value = read_json(fetched).await;
    assert_eq!(fetched, form);
}

#[tokio::test]
async fn explicit_null_clears_description() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form =
        create_form(&app, &owner.token, json!({ "title": "T", "description": "old" })).await;
    let path = form_path(&form["friendly_id"]);

    let response = send_request(
        &app,
        Method::PUT,
        &path,
        Some(&owner.token),
        Some(json!({ "form": { "title": "T2", "description": null } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = read_json(response).await;
    assert_eq!(updated["title"], "T2");
    assert_eq!(updated["description"], Value::Null);

    let fetched = send_request(&app, Method::GET, &path, Some(&owner.token), None).await;
    let fetched: Value = read_json(fetched).await;
    assert_eq!(fetched["description"], Value::Null);
}

#[tokio::test]
async fn null_only_payload_is_not_empty() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let form =
        create_form(&app, &owner.token, json!({ "title": "T", "description": "old" })).await;
    let path = form_path(&form["friendly_id"]);

    let response = send_request(
        &app,
        Method::PUT,
        &path,
        Some(&owner.token),
        Some(json!({ "form": { "description": null } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = read_json(response).await;
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["title"], "T");

    for body in [json!({ "form": { "title": null } }), json!({ "form": { "questions": null } })] {
        let response =
            send_request(&app, Method::PUT, &path, Some(&owner.token), Some(body.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }
}
