// ABOUTME: Content store seam consumed by the reorder engine
// ABOUTME: Tree fetch plus transactional bulk position updates

use async_trait::async_trait;
use folio_storage::StorageResult;
use serde::{Deserialize, Serialize};

use crate::reorder::ReorderPlan;
use crate::types::ChapterWithSections;

/// New position for a single chapter or section row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub id: i64,
    pub order_index: i64,
}

impl PositionUpdate {
    pub fn new(id: i64, order_index: i64) -> Self {
        Self { id, order_index }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Chapters of a book ordered by `order_index`, each with its ordered sections
    async fn fetch_chapters_with_sections(
        &self,
        book_id: i64,
    ) -> StorageResult<Vec<ChapterWithSections>>;

    /// Apply chapter then section position updates atomically.
    ///
    /// Rows not named in the plan keep their position. An empty list for a
    /// table issues no statement for it.
    async fn bulk_update_positions(&self, plan: &ReorderPlan) -> StorageResult<()>;
}
