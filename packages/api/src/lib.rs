// ABOUTME: HTTP API layer for Folio providing REST endpoints and routing
// ABOUTME: Integration layer over book, blog, and progress storage and the reorder engine

use axum::{
    routing::{get, post, put},
    Router,
};

pub mod blog_handlers;
pub mod books_handlers;
pub mod db;
pub mod health;
pub mod progress_handlers;
pub mod response;
pub mod sections_handlers;

pub use db::DbState;
pub use response::{ApiError, ApiResponse};

/// Creates the books API router (nested under /api/books)
pub fn create_books_router() -> Router<DbState> {
    Router::new()
        .route("/", get(books_handlers::list_books))
        .route("/", post(books_handlers::create_book))
        .route("/{book_id}", get(books_handlers::get_book))
        .route("/{book_id}", put(books_handlers::update_book))
        .route("/{book_id}/reorder", post(books_handlers::reorder_book))
        .route("/{book_id}/structure", put(books_handlers::save_structure))
}

/// Creates the sections API router (nested under /api/sections)
pub fn create_sections_router() -> Router<DbState> {
    Router::new()
        .route("/{section_id}", get(sections_handlers::get_section))
        .route(
            "/{section_id}/content",
            put(sections_handlers::update_section_content),
        )
}

/// Creates the blog posts API router (nested under /api/blog-posts)
pub fn create_blog_router() -> Router<DbState> {
    Router::new()
        .route("/", get(blog_handlers::list_blog_posts))
        .route("/", post(blog_handlers::create_blog_post))
        .route("/latest", get(blog_handlers::latest_blog_posts))
        .route("/{post_id}", get(blog_handlers::get_blog_post))
        .route("/{post_id}", put(blog_handlers::update_blog_post))
        .route("/{post_id}/publish", post(blog_handlers::publish_blog_post))
        .route(
            "/{post_id}/unpublish",
            post(blog_handlers::unpublish_blog_post),
        )
}

/// Creates the reader API router (nested under /api/readers)
pub fn create_readers_router() -> Router<DbState> {
    Router::new()
        .route("/{user_id}/books", get(progress_handlers::list_reader_books))
        .route(
            "/{user_id}/books/{book_id}/progress",
            get(progress_handlers::get_reading_progress),
        )
        .route(
            "/{user_id}/books/{book_id}/progress",
            put(progress_handlers::save_reading_progress),
        )
}

/// Full application router with all routes mounted under /api
pub fn create_router(state: DbState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/books", create_books_router())
        .nest("/api/sections", create_sections_router())
        .nest("/api/blog-posts", create_blog_router())
        .nest("/api/readers", create_readers_router())
        .with_state(state)
}
