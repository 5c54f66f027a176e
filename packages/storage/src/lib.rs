// ABOUTME: Data layer foundation for Folio
// ABOUTME: Storage errors, SQLite pool setup, and embedded schema migrations

use thiserror::Error;

pub mod db;

pub use db::{connect, run_migrations, DatabaseConfig, MIGRATOR};

#[cfg(any(test, feature = "test-utils"))]
pub use db::memory_pool;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<folio_core::ValidationError> for StorageError {
    fn from(err: folio_core::ValidationError) -> Self {
        StorageError::InvalidInput(err.to_string())
    }
}
