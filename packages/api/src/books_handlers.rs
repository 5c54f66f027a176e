// ABOUTME: HTTP request handlers for book operations
// ABOUTME: Book CRUD, chapter/section reordering, and structure saves from the editor

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use folio_books::{
    BookCreateInput, BookDataOperation, BookUpdateInput, OrderedChapterWithSections,
};

use crate::db::DbState;
use crate::response::{ApiError, ApiResponse};

/// List all books
pub async fn list_books(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing books");

    match db.book_storage.list_books().await {
        Ok(books) => (StatusCode::OK, ResponseJson(ApiResponse::success(books))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Get a book with its chapters and sections
pub async fn get_book(
    State(db): State<DbState>,
    Path(book_id): Path<i64>,
) -> impl IntoResponse {
    info!("Getting book: {}", book_id);

    match db.book_storage.get_book_with_content(book_id).await {
        Ok(book) => (StatusCode::OK, ResponseJson(ApiResponse::success(book))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Create a new book
pub async fn create_book(
    State(db): State<DbState>,
    Json(request): Json<BookCreateInput>,
) -> impl IntoResponse {
    info!("Creating book '{}'", request.title);

    match db.book_storage.create_book(request).await {
        Ok(book) => (
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(book)),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Update an existing book
pub async fn update_book(
    State(db): State<DbState>,
    Path(book_id): Path<i64>,
    Json(request): Json<BookUpdateInput>,
) -> impl IntoResponse {
    info!("Updating book: {}", book_id);

    match db.book_storage.update_book(book_id, request).await {
        Ok(book) => (StatusCode::OK, ResponseJson(ApiResponse::success(book))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Request body for reordering a book
#[derive(Deserialize)]
pub struct ReorderRequest {
    #[serde(rename = "chaptersAndSections")]
    pub chapters_and_sections: Vec<OrderedChapterWithSections>,
}

/// Apply a submitted chapter/section ordering
pub async fn reorder_book(
    State(db): State<DbState>,
    Path(book_id): Path<i64>,
    Json(request): Json<ReorderRequest>,
) -> impl IntoResponse {
    info!(
        "Reordering book {} ({} chapters submitted)",
        book_id,
        request.chapters_and_sections.len()
    );

    match db
        .reorder_engine
        .reorder(book_id, &request.chapters_and_sections)
        .await
    {
        Ok(plan) => (StatusCode::OK, ResponseJson(ApiResponse::success(plan))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Request body for saving the editor's structure changes
#[derive(Deserialize)]
pub struct SaveStructureRequest {
    #[serde(rename = "chaptersAndSections")]
    pub chapters_and_sections: Vec<OrderedChapterWithSections>,
    #[serde(default)]
    pub operations: Vec<BookDataOperation>,
}

/// Apply structure operations, then the submitted ordering
pub async fn save_structure(
    State(db): State<DbState>,
    Path(book_id): Path<i64>,
    Json(request): Json<SaveStructureRequest>,
) -> impl IntoResponse {
    info!(
        "Saving structure of book {} ({} operations)",
        book_id,
        request.operations.len()
    );

    match folio_books::save_structure(
        db.book_storage.clone(),
        book_id,
        &request.operations,
        &request.chapters_and_sections,
    )
    .await
    {
        Ok(summary) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(summary))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
