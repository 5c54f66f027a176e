// ABOUTME: Chapter and section reorder engine
// ABOUTME: Diffs a submitted ordering against the stored tree and writes only changed positions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use folio_storage::StorageResult;

use crate::store::{ContentStore, PositionUpdate};
use crate::types::ChapterWithSections;

/// One entry of a submitted ordering: a chapter and its sections, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedChapterWithSections {
    pub chapter_id: i64,
    #[serde(default)]
    pub section_ids: Vec<i64>,
}

impl OrderedChapterWithSections {
    pub fn new(chapter_id: i64, section_ids: Vec<i64>) -> Self {
        Self {
            chapter_id,
            section_ids,
        }
    }
}

/// Position changes computed for one reorder request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPlan {
    pub chapters: Vec<PositionUpdate>,
    pub sections: Vec<PositionUpdate>,
}

impl ReorderPlan {
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty() && self.sections.is_empty()
    }
}

/// Compute the position updates needed to make `current` match `target`.
///
/// Positions are the 0-based index within the submitted list. Chapter ids
/// that are not part of `current` are skipped, as are section ids that do not
/// belong to the current membership of the chapter they are listed under.
/// Rows already at their target position produce no update.
pub fn plan_reorder(
    current: &[ChapterWithSections],
    target: &[OrderedChapterWithSections],
) -> ReorderPlan {
    let by_id: HashMap<i64, &ChapterWithSections> = current
        .iter()
        .map(|entry| (entry.chapter.id, entry))
        .collect();

    let mut plan = ReorderPlan::default();

    for (new_chapter_index, ordered) in target.iter().enumerate() {
        let Some(existing) = by_id.get(&ordered.chapter_id) else {
            debug!("Skipping unknown chapter {}", ordered.chapter_id);
            continue;
        };

        let new_chapter_index = new_chapter_index as i64;
        if existing.chapter.order_index != new_chapter_index {
            plan.chapters
                .push(PositionUpdate::new(ordered.chapter_id, new_chapter_index));
        }

        for (new_section_index, section_id) in ordered.section_ids.iter().enumerate() {
            let Some(section) = existing.sections.iter().find(|s| s.id == *section_id) else {
                debug!(
                    "Skipping section {} not in chapter {}",
                    section_id, ordered.chapter_id
                );
                continue;
            };

            let new_section_index = new_section_index as i64;
            if section.order_index != new_section_index {
                plan.sections
                    .push(PositionUpdate::new(*section_id, new_section_index));
            }
        }
    }

    plan
}

/// Loads a book's tree from a [`ContentStore`], diffs it, and persists the changes
#[derive(Clone)]
pub struct ReorderEngine {
    store: Arc<dyn ContentStore>,
}

impl ReorderEngine {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Reorder the chapters and sections of a book and return what was written.
    ///
    /// A request that matches the stored order performs no writes.
    pub async fn reorder(
        &self,
        book_id: i64,
        target: &[OrderedChapterWithSections],
    ) -> StorageResult<ReorderPlan> {
        let current = self.store.fetch_chapters_with_sections(book_id).await?;
        let plan = plan_reorder(&current, target);

        if plan.is_empty() {
            debug!("Book {} already in requested order", book_id);
            return Ok(plan);
        }

        self.store.bulk_update_positions(&plan).await?;

        info!(
            "Reordered book {}: {} chapter(s), {} section(s) moved",
            book_id,
            plan.chapters.len(),
            plan.sections.len()
        );

        Ok(plan)
    }
}
