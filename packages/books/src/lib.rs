// ABOUTME: Book content hierarchy for Folio
// ABOUTME: Types, SQLite storage, structure operations, reading progress, and the reorder engine

pub mod operations;
pub mod progress;
pub mod reorder;
pub mod storage;
pub mod store;
pub mod types;

// Re-export main types
pub use operations::{
    apply_operations, save_structure, BookDataOperation, ChapterPayload, DataType,
    OperationAction, OperationSummary, SectionPayload, StructureSaveSummary,
};
pub use reorder::{plan_reorder, OrderedChapterWithSections, ReorderEngine, ReorderPlan};
pub use storage::BookStorage;
pub use store::{ContentStore, PositionUpdate};
pub use types::{
    Block, BlockType, Book, BookCreateInput, BookUpdateInput, BookWithContent, BookWithProgress,
    Chapter, ChapterCreateInput, ChapterWithSections, ReadingProgress, ReadingProgressInput,
    Section, SectionCreateInput,
};
