// ABOUTME: Book, chapter, and section type definitions
// ABOUTME: Stored records, tree views, and create/update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub price: Option<f64>,
    pub is_free: bool,
    pub published_at: Option<DateTime<Utc>>,
    /// Display counters shown instead of real ones when `use_fake_data` is set
    pub fake_viewers: i64,
    pub fake_purchases: i64,
    pub use_fake_data: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreateInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub cover_image: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub is_free: bool,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fake_viewers: i64,
    #[serde(default)]
    pub fake_purchases: i64,
    #[serde(default)]
    pub use_fake_data: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub price: Option<f64>,
    pub is_free: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub fake_viewers: Option<i64>,
    pub fake_purchases: Option<i64>,
    pub use_fake_data: Option<bool>,
}

impl BookUpdateInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.cover_image.is_none()
            && self.price.is_none()
            && self.is_free.is_none()
            && self.published_at.is_none()
            && self.fake_viewers.is_none()
            && self.fake_purchases.is_none()
            && self.use_fake_data.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub book_id: i64,
    pub title: String,
    pub order_index: i64,
    /// Legacy linked-list pointer, not consulted for ordering
    pub next_chapter_id: Option<i64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterCreateInput {
    pub title: String,
    /// Defaults to the end of the book
    pub order_index: Option<i64>,
    pub next_chapter_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Markdown,
    Heading,
    Image,
    Video,
    SectionTitle,
    SecondTitle,
}

/// Legacy structured-content block kept alongside the rich-text document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub name: String,
    pub value: String,
    pub order: i64,
    pub additional_data: Option<std::collections::HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: i64,
    pub chapter_id: i64,
    pub title: String,
    /// Rich-text document, stored opaquely
    pub content: serde_json::Value,
    pub order_index: i64,
    pub next_section_id: Option<i64>,
    pub blocks: Option<Vec<Block>>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCreateInput {
    pub title: String,
    #[serde(default)]
    pub content: serde_json::Value,
    /// Defaults to the end of the chapter
    pub order_index: Option<i64>,
    pub next_section_id: Option<i64>,
    pub blocks: Option<Vec<Block>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A chapter with its sections, both ordered by `order_index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterWithSections {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub sections: Vec<Section>,
}

/// A book with its full chapter/section tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithContent {
    #[serde(flatten)]
    pub book: Book,
    pub chapters: Vec<ChapterWithSections>,
}

/// Where a reader is in a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    pub id: i64,
    pub user_id: String,
    pub book_id: i64,
    pub chapter_id: Option<i64>,
    pub section_id: Option<i64>,
    pub progress_percentage: i64,
    pub bookmarked: bool,
    pub last_read_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Progress reported by a reader; omitted fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgressInput {
    pub chapter_id: Option<i64>,
    pub section_id: Option<i64>,
    pub progress_percentage: Option<i64>,
    pub bookmarked: Option<bool>,
}

/// A book as listed on a reader's home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithProgress {
    #[serde(flatten)]
    pub book: Book,
    pub reading_progress: Option<ReadingProgress>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chapter_with_sections_serializes_flat() {
        let tree = ChapterWithSections {
            chapter: Chapter {
                id: 1,
                book_id: 9,
                title: "Intro".to_string(),
                order_index: 0,
                next_chapter_id: None,
                tags: vec![],
            },
            sections: vec![],
        };

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["bookId"], 9);
        assert_eq!(value["orderIndex"], 0);
        assert_eq!(value["sections"], json!([]));
    }

    #[test]
    fn test_block_type_uses_kebab_case() {
        let block: Block = serde_json::from_value(json!({
            "type": "section-title",
            "name": "title",
            "value": "Getting Started",
            "order": 0
        }))
        .unwrap();

        assert_eq!(block.block_type, BlockType::SectionTitle);
        assert!(block.additional_data.is_none());
    }

    #[test]
    fn test_book_update_input_is_empty() {
        assert!(BookUpdateInput::default().is_empty());
        let input = BookUpdateInput {
            is_free: Some(true),
            ..Default::default()
        };
        assert!(!input.is_empty());
    }
}
