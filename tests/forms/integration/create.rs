use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{create_form, form_path, read_json, send_request, setup_test_app};

#[tokio::test]
async fn create_echoes_fields_and_assigns_owner() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/api/v1/forms",
        Some(&owner.token),
        Some(json!({
            "form": {
                "title": "Event RSVP",
                "description": "Let us know if you can make it",
                "questions": [{ "label": "Attending?", "kind": "boolean" }]
            }
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let created: Value = read_json(response).await;
    assert_eq!(created["title"], "Event RSVP");
    assert_eq!(created["description"], "Let us know if you can make it");
    assert_eq!(created["questions"], json!([{ "label": "Attending?", "kind": "boolean" }]));
    assert_eq!(created["enabled"], true);
    assert_eq!(created["user_id"], json!(owner.user.id));
    assert_eq!(created["friendly_id"], "event-rsvp");

    let fetched = send_request(
        &app,
        Method::GET,
        &form_path(&created["friendly_id"]),
        Some(&owner.token),
        None,
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = read_json(fetched).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_ignores_client_supplied_identity() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;
    let other = app.issue_user("other@example.com").await;

    let created = create_form(
        &app,
        &owner.token,
        json!({
            "id": 9999,
            "user_id": other.user.id,
            "friendly_id": "chosen-by-client",
            "title": "Signup"
        }),
    )
    .await;

    assert_ne!(created["id"], json!(9999));
    assert_eq!(created["user_id"], json!(owner.user.id));
    assert_eq!(created["friendly_id"], "signup");
}

#[tokio::test]
async fn duplicate_titles_get_distinct_friendly_ids() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;

    let first = create_form(&app, &owner.token, json!({ "title": "Feedback" })).await;
    let second = create_form(&app, &owner.token, json!({ "title": "Feedback" })).await;

    assert_eq!(first["friendly_id"], "feedback");
    assert_ne!(first["friendly_id"], second["friendly_id"]);
    assert!(second["friendly_id"].as_str().unwrap().starts_with("feedback-"));
}

#[tokio::test]
async fn create_without_attributes_is_bad_request() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;

    let bodies = [
        Some(json!({ "form": {} })),
        Some(json!({})),
        Some(json!({ "survey": { "title": "wrong envelope" } })),
        None,
    ];

    for body in bodies {
        let response =
            send_request(&app, Method::POST, "/api/v1/forms", Some(&owner.token), body.clone())
                .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        let error: Value = read_json(response).await;
        assert_eq!(error["error"], "bad_request");
    }

    assert_eq!(app.form_count().await, 0);
}

#[tokio::test]
async fn create_rejects_invalid_attributes() {
    let app = setup_test_app().await;
    let owner = app.issue_user("owner@example.com").await;

    let bodies = [
        json!({ "form": { "description": "no title" } }),
        json!({ "form": { "title": "" } }),
        json!({ "form": { "title": "Bad questions", "questions": "not a list" } }),
    ];

    for body in bodies {
        let response =
            send_request(&app, Method::POST, "/api/v1/forms", Some(&owner.token), Some(body.clone()))
                .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }

    assert_eq!(app.form_count().await, 0);
}
