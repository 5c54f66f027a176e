// ABOUTME: HTTP request handlers for section reads and content saves

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::db::DbState;
use crate::response::{ApiError, ApiResponse};

/// Get a single section by ID
pub async fn get_section(
    State(db): State<DbState>,
    Path(section_id): Path<i64>,
) -> impl IntoResponse {
    info!("Getting section: {}", section_id);

    match db.book_storage.get_section(section_id).await {
        Ok(section) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(section))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Request body for saving a section's document
#[derive(Deserialize)]
pub struct UpdateContentRequest {
    pub content: serde_json::Value,
}

/// Replace the rich-text content of a section
pub async fn update_section_content(
    State(db): State<DbState>,
    Path(section_id): Path<i64>,
    Json(request): Json<UpdateContentRequest>,
) -> impl IntoResponse {
    info!("Saving content of section: {}", section_id);

    match db
        .book_storage
        .update_section_content(section_id, &request.content)
        .await
    {
        Ok(section) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(section))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
