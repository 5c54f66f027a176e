// ABOUTME: Database connection management and shared handler state
// ABOUTME: Provides API handlers with the SQLite pool, book and blog storage, and the reorder engine

use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

use folio_blog::BlogStorage;
use folio_books::{BookStorage, ReorderEngine};
use folio_storage::{DatabaseConfig, StorageResult};

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub book_storage: Arc<BookStorage>,
    pub blog_storage: Arc<BlogStorage>,
    pub reorder_engine: ReorderEngine,
}

impl DbState {
    /// Create new database state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        let book_storage = Arc::new(BookStorage::new(pool.clone()));
        let blog_storage = Arc::new(BlogStorage::new(pool.clone()));
        let reorder_engine = ReorderEngine::new(book_storage.clone());

        Self {
            pool,
            book_storage,
            blog_storage,
            reorder_engine,
        }
    }

    /// Connect to the configured database and apply migrations
    pub async fn init(config: &DatabaseConfig) -> StorageResult<Self> {
        let pool = folio_storage::connect(config).await?;
        folio_storage::run_migrations(&pool).await?;

        info!("Database ready at {}", config.path.display());

        Ok(Self::new(pool))
    }
}
