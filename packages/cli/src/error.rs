use thiserror::Error;

use crate::config::ConfigError;
use folio_storage::StorageError;

/// Errors that stop the binary before or while serving
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
