// ABOUTME: Shared fixtures for book integration tests
// ABOUTME: In-memory database setup and small helpers to seed a chapter/section tree

use folio_books::{
    BookCreateInput, BookStorage, ChapterCreateInput, OrderedChapterWithSections,
    SectionCreateInput,
};
use sqlx::SqlitePool;

/// Helper to create a migrated in-memory database for testing
pub async fn create_test_db() -> SqlitePool {
    folio_storage::memory_pool()
        .await
        .expect("Failed to create in-memory database")
}

/// Create a book whose chapters hold the given number of sections.
///
/// Returns the book id and, per chapter, `(chapter_id, section_ids)` in creation order.
#[allow(dead_code)]
pub async fn seed_book(storage: &BookStorage, section_counts: &[usize]) -> (i64, Vec<(i64, Vec<i64>)>) {
    let book = storage
        .create_book(BookCreateInput {
            title: "The Rust Field Guide".to_string(),
            description: "Test book".to_string(),
            is_free: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let mut tree = Vec::new();
    for (chapter_number, count) in section_counts.iter().enumerate() {
        let chapter = storage
            .create_chapter(
                book.id,
                ChapterCreateInput {
                    title: format!("Chapter {}", chapter_number + 1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let inputs = (0..*count)
            .map(|n| SectionCreateInput {
                title: format!("Section {}.{}", chapter_number + 1, n + 1),
                ..Default::default()
            })
            .collect();
        let sections = storage.create_sections(chapter.id, inputs).await.unwrap();

        tree.push((chapter.id, sections.iter().map(|s| s.id).collect()));
    }

    (book.id, tree)
}

/// Build a submitted ordering from `(chapter_id, section_ids)` pairs
#[allow(dead_code)]
pub fn ordering(entries: &[(i64, Vec<i64>)]) -> Vec<OrderedChapterWithSections> {
    entries
        .iter()
        .map(|(chapter_id, section_ids)| {
            OrderedChapterWithSections::new(*chapter_id, section_ids.clone())
        })
        .collect()
}

/// Current `(chapter_id, [section_id])` layout of a book, in stored order
#[allow(dead_code)]
pub async fn layout(storage: &BookStorage, book_id: i64) -> Vec<(i64, Vec<i64>)> {
    storage
        .get_chapters_with_sections(book_id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| {
            (
                entry.chapter.id,
                entry.sections.iter().map(|s| s.id).collect(),
            )
        })
        .collect()
}
