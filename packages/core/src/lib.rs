// ABOUTME: Core constants and validation for Folio
// ABOUTME: Foundational package shared by storage, books, and the HTTP layer

pub mod constants;
pub mod validation;

// Re-export constants
pub use constants::{database_file, folio_dir, DATABASE_FILE_NAME};

// Re-export validation
pub use validation::{truncate, validate_title, ValidationError, MAX_TITLE_LENGTH};
