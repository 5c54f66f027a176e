// ABOUTME: Router-level tests for reader progress endpoints
// ABOUTME: Saving progress and listing books with the reader's progress attached

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use folio_api::{create_router, DbState};

async fn test_app() -> Router {
    let pool = folio_storage::memory_pool()
        .await
        .expect("Failed to create test database");
    create_router(DbState::new(pool))
}

/// Send a request and return the status with the parsed JSON body
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_book(app: &Router, title: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/books",
        Some(json!({ "title": title, "isFree": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_save_and_read_progress() {
    let app = test_app().await;
    let book_id = create_book(&app, "Async Rust").await;
    let uri = format!("/api/readers/alice/books/{}/progress", book_id);

    let (status, before) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["data"], Value::Null);

    let (status, saved) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "progressPercentage": 100, "bookmarked": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["data"]["userId"], "alice");
    assert_eq!(saved["data"]["progressPercentage"], 100);
    assert!(saved["data"]["completedAt"].is_string());

    let (_, after) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(after["data"]["bookmarked"], true);
}

#[tokio::test]
async fn test_progress_errors() {
    let app = test_app().await;
    let book_id = create_book(&app, "Async Rust").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/readers/alice/books/{}/progress", book_id),
        Some(json!({ "progressPercentage": 140 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/readers/alice/books/8080/progress",
        Some(json!({ "progressPercentage": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reader_book_list_carries_progress() {
    let app = test_app().await;
    let started = create_book(&app, "Started").await;
    let fresh = create_book(&app, "Fresh").await;

    send(
        &app,
        Method::PUT,
        &format!("/api/readers/bob/books/{}/progress", started),
        Some(json!({ "progressPercentage": 25 })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/readers/bob/books", None).await;
    assert_eq!(status, StatusCode::OK);

    let books = body["data"].as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["id"], started);
    assert_eq!(books[0]["title"], "Started");
    assert_eq!(books[0]["readingProgress"]["progressPercentage"], 25);
    assert_eq!(books[1]["id"], fresh);
    assert_eq!(books[1]["readingProgress"], Value::Null);

    let (_, other_reader) = send(&app, Method::GET, "/api/readers/carol/books", None).await;
    assert_eq!(other_reader["data"][0]["readingProgress"], Value::Null);
}
