// ABOUTME: HTTP request handlers for blog posts
// ABOUTME: Admin listing, drafts, edits, publishing, and the home page's latest posts

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use folio_blog::{BlogPostCreateInput, BlogPostUpdateInput, HOME_PAGE_POST_COUNT};

use crate::db::DbState;
use crate::response::{ApiError, ApiResponse};

/// Upper bound for `?limit=` on the latest posts listing
const MAX_LATEST_LIMIT: i64 = 50;

/// List every post, drafts included
pub async fn list_blog_posts(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing blog posts");

    match db.blog_storage.list_blog_posts().await {
        Ok(posts) => (StatusCode::OK, ResponseJson(ApiResponse::success(posts))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[derive(Deserialize)]
pub struct LatestQuery {
    pub limit: Option<i64>,
}

/// Newest published posts for the home page
pub async fn latest_blog_posts(
    State(db): State<DbState>,
    Query(query): Query<LatestQuery>,
) -> impl IntoResponse {
    let limit = query
        .limit
        .unwrap_or(HOME_PAGE_POST_COUNT)
        .clamp(0, MAX_LATEST_LIMIT);

    match db.blog_storage.list_latest_blog_posts(limit).await {
        Ok(posts) => (StatusCode::OK, ResponseJson(ApiResponse::success(posts))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_blog_post(
    State(db): State<DbState>,
    Path(post_id): Path<i64>,
) -> impl IntoResponse {
    info!("Getting blog post: {}", post_id);

    match db.blog_storage.get_blog_post(post_id).await {
        Ok(post) => (StatusCode::OK, ResponseJson(ApiResponse::success(post))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Create a draft
pub async fn create_blog_post(
    State(db): State<DbState>,
    Json(request): Json<BlogPostCreateInput>,
) -> impl IntoResponse {
    info!("Creating blog post '{}'", request.title);

    match db.blog_storage.create_blog_post(request).await {
        Ok(post) => (
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(post)),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_blog_post(
    State(db): State<DbState>,
    Path(post_id): Path<i64>,
    Json(request): Json<BlogPostUpdateInput>,
) -> impl IntoResponse {
    info!("Updating blog post: {}", post_id);

    match db.blog_storage.update_blog_post(post_id, request).await {
        Ok(post) => (StatusCode::OK, ResponseJson(ApiResponse::success(post))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn publish_blog_post(
    State(db): State<DbState>,
    Path(post_id): Path<i64>,
) -> impl IntoResponse {
    info!("Publishing blog post: {}", post_id);

    match db.blog_storage.publish_blog_post(post_id).await {
        Ok(post) => (StatusCode::OK, ResponseJson(ApiResponse::success(post))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn unpublish_blog_post(
    State(db): State<DbState>,
    Path(post_id): Path<i64>,
) -> impl IntoResponse {
    info!("Unpublishing blog post: {}", post_id);

    match db.blog_storage.unpublish_blog_post(post_id).await {
        Ok(post) => (StatusCode::OK, ResponseJson(ApiResponse::success(post))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
