use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use holocron_api::{AppState, AppStateInner, router};
use holocron_db::Database;

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    let state: AppState = Arc::new(AppStateInner { db });
    router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn create_user(app: &Router, username: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(json!({ "username": username, "email": email, "password": "opensesame" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn user_round_trip() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "luke", "email": "luke@rebellion.org", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["username"], "luke");
    assert_eq!(created["email"], "luke@rebellion.org");
    assert_eq!(created["favorites"], json!([]));
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, listed) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn user_create_requires_all_fields() {
    let app = app();

    for body in [
        json!({}),
        json!({ "username": "luke" }),
        json!({ "username": "luke", "email": "luke@rebellion.org" }),
        json!({ "username": "luke", "email": "luke@rebellion.org", "password": "" }),
    ] {
        let (status, response) = send(&app, "POST", "/users", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["msg"].is_string());
    }
}

#[tokio::test]
async fn duplicate_username_or_email_rejected() {
    let app = app();
    create_user(&app, "luke", "luke@rebellion.org").await;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "luke", "email": "other@rebellion.org", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "email or username already exists");

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "other", "email": "luke@rebellion.org", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_user_checks_uniqueness_excluding_self() {
    let app = app();
    let luke = create_user(&app, "luke", "luke@rebellion.org").await;
    create_user(&app, "leia", "leia@rebellion.org").await;

    // Re-submitting your own username is not a conflict.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{luke}"),
        Some(json!({ "username": "luke" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "luke@rebellion.org");

    // Taking someone else's username is.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{luke}"),
        Some(json!({ "username": "leia" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "email or username already exists");
}

#[tokio::test]
async fn missing_ids_return_404_with_message() {
    let app = app();

    for uri in [
        "/users/99",
        "/users/99/favorites",
        "/people/99",
        "/planets/99",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
        assert!(body["msg"].is_string(), "GET {uri}");
    }

    let (status, _) = send(&app, "DELETE", "/users/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        "PUT",
        "/people/99",
        Some(json!({ "name": "Wedge" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn character_crud_flow() {
    let app = app();

    let (status, _) = send(&app, "POST", "/people", Some(json!({ "description": "?" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &app,
        "POST",
        "/people",
        Some(json!({ "name": "Yoda", "description": "Jedi Master" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Yoda");
    assert_eq!(created["description"], "Jedi Master");

    let (status, fetched) = send(&app, "GET", &format!("/people/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    // Partial update: untouched fields keep their values.
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/people/{id}"),
        Some(json!({ "name": "Master Yoda" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Master Yoda");
    assert_eq!(updated["description"], "Jedi Master");

    let (status, body) = send(&app, "DELETE", &format!("/people/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "character deleted");

    let (status, _) = send(&app, "GET", &format!("/people/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn planet_crud_flow() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/planets",
        Some(json!({ "name": "Dagobah" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["description"], Value::Null);
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/planets/{id}"),
        Some(json!({ "description": "swamp world" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Dagobah");
    assert_eq!(updated["description"], "swamp world");

    let (status, listed) = send(&app, "GET", "/planets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn favorite_lifecycle() {
    let app = app();
    let user_id = create_user(&app, "luke", "luke@rebellion.org").await;

    let (_, character) = send(&app, "POST", "/people", Some(json!({ "name": "Yoda" }))).await;
    let (_, planet) = send(&app, "POST", "/planets", Some(json!({ "name": "Dagobah" }))).await;
    let character_id = character["id"].as_i64().unwrap();
    let planet_id = planet["id"].as_i64().unwrap();

    let (status, favorite) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(json!({ "character_id": character_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(favorite["user_id"], user_id);
    assert_eq!(favorite["item"]["type"], "character");
    assert_eq!(favorite["item"]["name"], "Yoda");
    assert_eq!(favorite["item"]["id"], character_id);

    let (status, favorite) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(json!({ "planet_id": planet_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(favorite["item"]["type"], "planet");
    assert_eq!(favorite["item"]["name"], "Dagobah");

    let (status, favorites) = send(&app, "GET", &format!("/users/{user_id}/favorites"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(favorites.as_array().unwrap().len(), 2);

    // User projections embed the same favorites.
    let (_, user) = send(&app, "GET", &format!("/users/{user_id}"), None).await;
    assert_eq!(user["favorites"], favorites);

    let favorite_id = favorites[0]["id"].as_i64().unwrap();
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/users/{user_id}/favorites/{favorite_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "favorite removed");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/users/{user_id}/favorites/{favorite_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, favorites) = send(&app, "GET", &format!("/users/{user_id}/favorites"), None).await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn favorite_target_must_be_exactly_one() {
    let app = app();
    let user_id = create_user(&app, "luke", "luke@rebellion.org").await;
    let (_, character) = send(&app, "POST", "/people", Some(json!({ "name": "Yoda" }))).await;
    let (_, planet) = send(&app, "POST", "/planets", Some(json!({ "name": "Dagobah" }))).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(json!({ "character_id": character["id"], "planet_id": planet["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].is_string());
}

#[tokio::test]
async fn favorite_referencing_missing_target_is_404() {
    let app = app();
    let user_id = create_user(&app, "luke", "luke@rebellion.org").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(json!({ "character_id": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "character not found");

    let (status, _) = send(
        &app,
        "POST",
        "/users/99/favorites",
        Some(json!({ "character_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_user_removes_their_favorites() {
    let app = app();
    let user_id = create_user(&app, "luke", "luke@rebellion.org").await;
    let (_, character) = send(&app, "POST", "/people", Some(json!({ "name": "Yoda" }))).await;

    send(
        &app,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(json!({ "character_id": character["id"] })),
    )
    .await;

    let (status, body) = send(&app, "DELETE", &format!("/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "user deleted");

    // The catalogue entry survives; only the join rows go.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/people/{}", character["id"]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, listed) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}
