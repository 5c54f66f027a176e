// ABOUTME: Router-level tests for the blog post endpoints
// ABOUTME: Draft creation, edits, publishing, and the home page listing over HTTP

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

async fn create_post(app: &Router, title: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/blog-posts",
        Some(json!({ "authorId": "author-1", "title": title, "category": "Releases" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_edit_and_fetch_post() {
    let app = test_app().await;
    let post_id = create_post(&app, "Folio 1.0 Released").await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/blog-posts/{}", post_id),
        Some(json!({ "excerpt": "What's new", "tags": ["release"], "readTime": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["slug"], "folio-1-0-released");
    assert_eq!(updated["data"]["tags"], json!(["release"]));
    assert_eq!(updated["data"]["readTime"], 3);

    let (status, fetched) = send(&app, Method::GET, &format!("/api/blog-posts/{}", post_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["excerpt"], "What's new");
    assert_eq!(fetched["data"]["published"], false);
}

#[tokio::test]
async fn test_post_errors_map_to_status_codes() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/blog-posts",
        Some(json!({ "authorId": "author-1", "title": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, Method::GET, "/api/blog-posts/31", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Blog post 31 not found");

    let (status, _) = send(&app, Method::POST, "/api/blog-posts/31/publish", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_latest_posts_only_show_published() {
    let app = test_app().await;

    let mut published = Vec::new();
    for n in 0..4 {
        let post_id = create_post(&app, &format!("Update {}", n)).await;
        let (status, body) = send(&app, Method::POST, &format!("/api/blog-posts/{}/publish", post_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["published"], true);
        published.push(post_id);
    }
    let draft = create_post(&app, "Draft").await;

    let (status, latest) = send(&app, Method::GET, "/api/blog-posts/latest", None).await;
    assert_eq!(status, StatusCode::OK);
    let latest_ids: Vec<i64> = latest["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(latest_ids, vec![published[3], published[2], published[1]]);

    let (_, one) = send(&app, Method::GET, "/api/blog-posts/latest?limit=1", None).await;
    assert_eq!(one["data"].as_array().unwrap().len(), 1);

    // Unpublishing drops a post from the home page but not from the admin list
    let (status, body) = send(&app, Method::POST, &format!("/api/blog-posts/{}/unpublish", published[3]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["publishedAt"], Value::Null);

    let (_, latest) = send(&app, Method::GET, "/api/blog-posts/latest", None).await;
    assert_eq!(latest["data"][0]["id"], published[2]);

    let (_, all) = send(&app, Method::GET, "/api/blog-posts", None).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 5);
    assert_eq!(all["data"][0]["id"], draft);
}
