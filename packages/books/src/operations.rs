// ABOUTME: Structure editing operations submitted from the book editor
// ABOUTME: Create, delete, rename, and move chapters/sections, then apply the submitted ordering

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use folio_core::truncate;
use folio_storage::{StorageError, StorageResult};

use crate::reorder::{OrderedChapterWithSections, ReorderEngine, ReorderPlan};
use crate::storage::BookStorage;
use crate::types::{Block, ChapterCreateInput, SectionCreateInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Chapter,
    Section,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationAction {
    Create,
    Delete,
    Rename,
    Move,
}

/// Chapter fields carried by an operation; which ones matter depends on the action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPayload {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub order_index: Option<i64>,
    pub next_chapter_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Section fields carried by an operation; which ones matter depends on the action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPayload {
    pub id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<serde_json::Value>,
    pub order_index: Option<i64>,
    pub next_section_id: Option<i64>,
    pub blocks: Option<Vec<Block>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDataOperation {
    pub data_type: DataType,
    pub action: OperationAction,
    pub chapter: Option<ChapterPayload>,
    pub section: Option<SectionPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub applied: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureSaveSummary {
    pub operations: OperationSummary,
    pub reorder: ReorderPlan,
}

/// Apply operations in submission order.
///
/// Operations missing the payload or ids their action needs are skipped.
/// Every chapter or section an operation names must belong to `book_id`,
/// otherwise it fails as `NotFound`. The first storage error aborts the
/// remaining operations; earlier ones stay applied.
pub async fn apply_operations(
    storage: &BookStorage,
    book_id: i64,
    operations: &[BookDataOperation],
) -> StorageResult<OperationSummary> {
    let mut summary = OperationSummary::default();

    for operation in operations {
        let applied = match operation.data_type {
            DataType::Section => match &operation.section {
                Some(section) => apply_section(storage, book_id, operation.action, section).await?,
                None => false,
            },
            DataType::Chapter => match &operation.chapter {
                Some(chapter) => apply_chapter(storage, book_id, operation.action, chapter).await?,
                None => false,
            },
        };

        if applied {
            summary.applied += 1;
        } else {
            warn!(
                "Skipping {:?} {:?} operation with incomplete payload",
                operation.data_type, operation.action
            );
            summary.skipped += 1;
        }
    }

    Ok(summary)
}

async fn apply_section(
    storage: &BookStorage,
    book_id: i64,
    action: OperationAction,
    section: &SectionPayload,
) -> StorageResult<bool> {
    match (action, section.id, section.chapter_id, section.title.as_deref()) {
        (OperationAction::Create, _, Some(chapter_id), Some(title)) => {
            ensure_chapter(storage, chapter_id, book_id).await?;
            let input = SectionCreateInput {
                title: title.to_string(),
                content: section.content.clone().unwrap_or_default(),
                order_index: section.order_index,
                next_section_id: section.next_section_id,
                blocks: section.blocks.clone(),
                tags: section.tags.clone(),
            };
            let created = storage.create_section(chapter_id, input).await?;
            info!(
                "Created section {} '{}' in chapter {}",
                created.id,
                truncate(&created.title, 40),
                chapter_id
            );
            Ok(true)
        }
        (OperationAction::Delete, Some(id), _, _) => {
            ensure_section(storage, id, book_id).await?;
            storage.delete_section(id).await?;
            Ok(true)
        }
        (OperationAction::Rename, Some(id), _, Some(title)) => {
            ensure_section(storage, id, book_id).await?;
            storage.rename_section(id, title).await?;
            Ok(true)
        }
        (OperationAction::Move, Some(id), Some(chapter_id), _) => {
            ensure_section(storage, id, book_id).await?;
            ensure_chapter(storage, chapter_id, book_id).await?;
            storage.move_section(id, chapter_id).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

async fn apply_chapter(
    storage: &BookStorage,
    book_id: i64,
    action: OperationAction,
    chapter: &ChapterPayload,
) -> StorageResult<bool> {
    match (action, chapter.id, chapter.title.as_deref()) {
        (OperationAction::Create, _, Some(title)) => {
            let input = ChapterCreateInput {
                title: title.to_string(),
                order_index: chapter.order_index,
                next_chapter_id: chapter.next_chapter_id,
                tags: chapter.tags.clone(),
            };
            let created = storage.create_chapter(book_id, input).await?;
            info!(
                "Created chapter {} '{}' in book {}",
                created.id,
                truncate(&created.title, 40),
                book_id
            );
            Ok(true)
        }
        (OperationAction::Delete, Some(id), _) => {
            ensure_chapter(storage, id, book_id).await?;
            storage.delete_chapter(id).await?;
            Ok(true)
        }
        (OperationAction::Rename, Some(id), Some(title)) => {
            ensure_chapter(storage, id, book_id).await?;
            storage.rename_chapter(id, title).await?;
            Ok(true)
        }
        // Chapters only move by reordering
        _ => Ok(false),
    }
}

async fn ensure_chapter(storage: &BookStorage, chapter_id: i64, book_id: i64) -> StorageResult<()> {
    if storage.chapter_in_book(chapter_id, book_id).await? {
        Ok(())
    } else {
        Err(StorageError::NotFound(format!(
            "Chapter {} in book {}",
            chapter_id, book_id
        )))
    }
}

async fn ensure_section(storage: &BookStorage, section_id: i64, book_id: i64) -> StorageResult<()> {
    if storage.section_in_book(section_id, book_id).await? {
        Ok(())
    } else {
        Err(StorageError::NotFound(format!(
            "Section {} in book {}",
            section_id, book_id
        )))
    }
}

/// Apply structure operations, then bring the book into the submitted order
pub async fn save_structure(
    storage: Arc<BookStorage>,
    book_id: i64,
    operations: &[BookDataOperation],
    target: &[OrderedChapterWithSections],
) -> StorageResult<StructureSaveSummary> {
    let operations = apply_operations(&storage, book_id, operations).await?;
    let reorder = ReorderEngine::new(storage).reorder(book_id, target).await?;

    info!(
        "Saved structure of book {}: {} operation(s) applied, {} skipped",
        book_id, operations.applied, operations.skipped
    );

    Ok(StructureSaveSummary {
        operations,
        reorder,
    })
}
