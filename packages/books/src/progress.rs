// ABOUTME: Per-reader progress through books
// ABOUTME: Upserts the reader's position and attaches it to the home page book list

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;
use tracing::debug;

use folio_storage::{StorageError, StorageResult};

use crate::storage::BookStorage;
use crate::types::{BookWithProgress, ReadingProgress, ReadingProgressInput};

const COMPLETE_PERCENTAGE: i64 = 100;

impl BookStorage {
    /// A reader's progress through a book, if they have opened it
    pub async fn get_reading_progress(
        &self,
        book_id: i64,
        user_id: &str,
    ) -> StorageResult<Option<ReadingProgress>> {
        debug!("Fetching reading progress of {} in book {}", user_id, book_id);

        let row = sqlx::query("SELECT * FROM reading_progress WHERE book_id = ? AND user_id = ?")
            .bind(book_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_progress).transpose()
    }

    /// Record where a reader is in a book.
    ///
    /// Omitted fields keep their stored value. Reaching 100% stamps
    /// `completed_at` once; dropping below clears it.
    pub async fn upsert_reading_progress(
        &self,
        book_id: i64,
        user_id: &str,
        input: ReadingProgressInput,
    ) -> StorageResult<ReadingProgress> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(StorageError::InvalidInput("userId cannot be empty".to_string()));
        }
        if let Some(percentage) = input.progress_percentage {
            if !(0..=COMPLETE_PERCENTAGE).contains(&percentage) {
                return Err(StorageError::InvalidInput(format!(
                    "progressPercentage must be between 0 and 100, got {}",
                    percentage
                )));
            }
        }

        // Existence first so an unknown book reads as NotFound, not a bad position
        self.get_book(book_id).await?;

        if let Some(chapter_id) = input.chapter_id {
            if !self.chapter_in_book(chapter_id, book_id).await? {
                return Err(StorageError::InvalidInput(format!(
                    "Chapter {} is not part of book {}",
                    chapter_id, book_id
                )));
            }
        }
        if let Some(section_id) = input.section_id {
            if !self.section_in_book(section_id, book_id).await? {
                return Err(StorageError::InvalidInput(format!(
                    "Section {} is not part of book {}",
                    section_id, book_id
                )));
            }
        }

        debug!("Saving reading progress of {} in book {}", user_id, book_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let existing = sqlx::query(
            "SELECT * FROM reading_progress WHERE book_id = ? AND user_id = ?",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?
        .as_ref()
        .map(row_to_progress)
        .transpose()?;

        let now = Utc::now();
        let chapter_id = input
            .chapter_id
            .or_else(|| existing.as_ref().and_then(|p| p.chapter_id));
        let section_id = input
            .section_id
            .or_else(|| existing.as_ref().and_then(|p| p.section_id));
        let percentage = input
            .progress_percentage
            .or_else(|| existing.as_ref().map(|p| p.progress_percentage))
            .unwrap_or(0);
        let bookmarked = input
            .bookmarked
            .or_else(|| existing.as_ref().map(|p| p.bookmarked))
            .unwrap_or(false);
        let completed_at = if percentage == COMPLETE_PERCENTAGE {
            existing
                .as_ref()
                .and_then(|p| p.completed_at)
                .or(Some(now))
        } else {
            None
        };

        sqlx::query(
            r#"
            INSERT INTO reading_progress (
                user_id, book_id, chapter_id, section_id,
                progress_percentage, bookmarked, last_read_at, completed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, book_id) DO UPDATE SET
                chapter_id = excluded.chapter_id,
                section_id = excluded.section_id,
                progress_percentage = excluded.progress_percentage,
                bookmarked = excluded.bookmarked,
                last_read_at = excluded.last_read_at,
                completed_at = excluded.completed_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(chapter_id)
        .bind(section_id)
        .bind(percentage)
        .bind(bookmarked)
        .bind(now)
        .bind(completed_at)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_reading_progress(book_id, user_id)
            .await?
            .ok_or_else(|| StorageError::Database("Progress upsert returned no row".to_string()))
    }

    /// All books, each with the given reader's progress when they have any
    pub async fn list_books_with_progress(
        &self,
        user_id: &str,
    ) -> StorageResult<Vec<BookWithProgress>> {
        let books = self.list_books().await?;

        let rows = sqlx::query("SELECT * FROM reading_progress WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut by_book: HashMap<i64, ReadingProgress> = HashMap::new();
        for row in &rows {
            let progress = row_to_progress(row)?;
            by_book.insert(progress.book_id, progress);
        }

        Ok(books
            .into_iter()
            .map(|book| {
                let reading_progress = by_book.remove(&book.id);
                BookWithProgress {
                    book,
                    reading_progress,
                }
            })
            .collect())
    }
}

fn row_to_progress(row: &SqliteRow) -> StorageResult<ReadingProgress> {
    Ok(ReadingProgress {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        book_id: row.try_get("book_id")?,
        chapter_id: row.try_get("chapter_id")?,
        section_id: row.try_get("section_id")?,
        progress_percentage: row.try_get("progress_percentage")?,
        bookmarked: row.try_get("bookmarked")?,
        last_read_at: row.try_get("last_read_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}
