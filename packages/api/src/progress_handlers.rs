// ABOUTME: HTTP request handlers for reader progress
// ABOUTME: Home page book list with progress, plus per-book progress reads and saves

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use folio_books::ReadingProgressInput;

use crate::db::DbState;
use crate::response::{ApiError, ApiResponse};

/// All books with this reader's progress attached
pub async fn list_reader_books(
    State(db): State<DbState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("Listing books for reader: {}", user_id);

    match db.book_storage.list_books_with_progress(&user_id).await {
        Ok(books) => (StatusCode::OK, ResponseJson(ApiResponse::success(books))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Progress of a reader in one book; `data` is null before the first save
pub async fn get_reading_progress(
    State(db): State<DbState>,
    Path((user_id, book_id)): Path<(String, i64)>,
) -> impl IntoResponse {
    match db.book_storage.get_reading_progress(book_id, &user_id).await {
        Ok(progress) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(progress))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn save_reading_progress(
    State(db): State<DbState>,
    Path((user_id, book_id)): Path<(String, i64)>,
    Json(request): Json<ReadingProgressInput>,
) -> impl IntoResponse {
    info!("Saving progress of {} in book {}", user_id, book_id);

    match db
        .book_storage
        .upsert_reading_progress(book_id, &user_id, request)
        .await
    {
        Ok(progress) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(progress))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
