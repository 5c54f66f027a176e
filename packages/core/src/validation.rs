// ABOUTME: Input validation for book, chapter, and section titles
// ABOUTME: Shared by the storage layer before anything is written

use serde::Serialize;
use thiserror::Error;

/// Longest title accepted for books, chapters, and sections
pub const MAX_TITLE_LENGTH: usize = 255;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: String },
    #[error("{field} exceeds {max} characters")]
    TooLong { field: String, max: usize },
}

/// Validate a title and return it trimmed.
pub fn validate_title(field: &str, title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TITLE_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

/// Shorten a string to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let kept: String = value.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
