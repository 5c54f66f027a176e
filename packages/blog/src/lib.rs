// ABOUTME: Blog posts for Folio
// ABOUTME: Draft and published posts stored in SQLite, with slugs and home page listing

pub mod storage;
pub mod types;

pub use storage::{slugify, BlogStorage, DEFAULT_READ_TIME, HOME_PAGE_POST_COUNT};
pub use types::{BlogPost, BlogPostCreateInput, BlogPostUpdateInput};
