// ABOUTME: Book storage layer using SQLite
// ABOUTME: CRUD for books, chapters, and sections plus the transactional bulk position update

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

use folio_core::validate_title;
use folio_storage::{StorageError, StorageResult};

use crate::reorder::ReorderPlan;
use crate::store::{ContentStore, PositionUpdate};
use crate::types::{
    Book, BookCreateInput, BookUpdateInput, BookWithContent, Chapter, ChapterCreateInput,
    ChapterWithSections, Section, SectionCreateInput,
};

/// Rows per bulk position statement; keeps bound parameters well under SQLite's limit
const MAX_POSITION_UPDATES_PER_STATEMENT: usize = 1000;

#[derive(Debug, Clone, Copy)]
enum PositionTable {
    Chapters,
    Sections,
}

impl PositionTable {
    fn as_str(self) -> &'static str {
        match self {
            PositionTable::Chapters => "chapters",
            PositionTable::Sections => "sections",
        }
    }
}

pub struct BookStorage {
    pub(crate) pool: SqlitePool,
}

impl BookStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---------------------------------------------------------------------
    // Books
    // ---------------------------------------------------------------------

    /// List all books
    pub async fn list_books(&self) -> StorageResult<Vec<Book>> {
        debug!("Fetching all books");

        let rows = sqlx::query("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_book).collect()
    }

    /// Get a single book by ID
    pub async fn get_book(&self, book_id: i64) -> StorageResult<Book> {
        debug!("Fetching book: {}", book_id);

        let row = sqlx::query("SELECT * FROM books WHERE id = ?")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(format!("Book {}", book_id)))?;

        row_to_book(&row)
    }

    /// Get a book together with its ordered chapters and sections
    pub async fn get_book_with_content(&self, book_id: i64) -> StorageResult<BookWithContent> {
        let book = self.get_book(book_id).await?;
        let chapters = self.get_chapters_with_sections(book_id).await?;
        Ok(BookWithContent { book, chapters })
    }

    /// Create a new book
    pub async fn create_book(&self, input: BookCreateInput) -> StorageResult<Book> {
        let title = validate_title("title", &input.title)?;
        let now = Utc::now();
        // Free books never carry a price
        let price = if input.is_free { None } else { input.price };

        debug!("Creating book: {}", title);

        let result = sqlx::query(
            r#"
            INSERT INTO books (
                title, description, cover_image, price, is_free, published_at,
                fake_viewers, fake_purchases, use_fake_data, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&title)
        .bind(&input.description)
        .bind(&input.cover_image)
        .bind(price)
        .bind(input.is_free)
        .bind(input.published_at)
        .bind(input.fake_viewers.max(0))
        .bind(input.fake_purchases.max(0))
        .bind(input.use_fake_data)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_book(result.last_insert_rowid()).await
    }

    /// Update the provided fields of a book
    pub async fn update_book(&self, book_id: i64, input: BookUpdateInput) -> StorageResult<Book> {
        debug!("Updating book: {}", book_id);

        if input.is_empty() {
            return self.get_book(book_id).await;
        }

        let title = match &input.title {
            Some(title) => Some(validate_title("title", title)?),
            None => None,
        };
        let clear_price = input.is_free == Some(true);

        // Build update query dynamically based on provided fields
        let mut query_parts = vec!["updated_at = ?"];

        if title.is_some() {
            query_parts.push("title = ?");
        }
        if input.description.is_some() {
            query_parts.push("description = ?");
        }
        if input.cover_image.is_some() {
            query_parts.push("cover_image = ?");
        }
        if input.is_free.is_some() {
            query_parts.push("is_free = ?");
        }
        if clear_price {
            query_parts.push("price = NULL");
        } else if input.price.is_some() {
            query_parts.push("price = ?");
        }
        if input.published_at.is_some() {
            query_parts.push("published_at = ?");
        }
        if input.fake_viewers.is_some() {
            query_parts.push("fake_viewers = ?");
        }
        if input.fake_purchases.is_some() {
            query_parts.push("fake_purchases = ?");
        }
        if input.use_fake_data.is_some() {
            query_parts.push("use_fake_data = ?");
        }

        let query_str = format!("UPDATE books SET {} WHERE id = ?", query_parts.join(", "));
        let mut query = sqlx::query(&query_str).bind(Utc::now());

        // Bind parameters in the same order
        if let Some(title) = title {
            query = query.bind(title);
        }
        if let Some(description) = input.description {
            query = query.bind(description);
        }
        if let Some(cover_image) = input.cover_image {
            query = query.bind(cover_image);
        }
        if let Some(is_free) = input.is_free {
            query = query.bind(is_free);
        }
        if !clear_price {
            if let Some(price) = input.price {
                query = query.bind(price);
            }
        }
        if let Some(published_at) = input.published_at {
            query = query.bind(published_at);
        }
        if let Some(fake_viewers) = input.fake_viewers {
            query = query.bind(fake_viewers.max(0));
        }
        if let Some(fake_purchases) = input.fake_purchases {
            query = query.bind(fake_purchases.max(0));
        }
        if let Some(use_fake_data) = input.use_fake_data {
            query = query.bind(use_fake_data);
        }

        let result = query
            .bind(book_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Book {}", book_id)));
        }

        self.get_book(book_id).await
    }

    // ---------------------------------------------------------------------
    // Chapters
    // ---------------------------------------------------------------------

    /// Chapters of a book ordered by position, each with its ordered sections
    pub async fn get_chapters_with_sections(
        &self,
        book_id: i64,
    ) -> StorageResult<Vec<ChapterWithSections>> {
        debug!("Fetching chapter tree for book: {}", book_id);

        let chapter_rows =
            sqlx::query("SELECT * FROM chapters WHERE book_id = ? ORDER BY order_index, id")
                .bind(book_id)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        let section_rows = sqlx::query(
            r#"
            SELECT s.*
            FROM sections s
            JOIN chapters c ON s.chapter_id = c.id
            WHERE c.book_id = ?
            ORDER BY s.chapter_id, s.order_index, s.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut sections_by_chapter: HashMap<i64, Vec<Section>> = HashMap::new();
        for row in &section_rows {
            let section = row_to_section(row)?;
            sections_by_chapter
                .entry(section.chapter_id)
                .or_default()
                .push(section);
        }

        chapter_rows
            .iter()
            .map(|row| {
                let chapter = row_to_chapter(row)?;
                let sections = sections_by_chapter.remove(&chapter.id).unwrap_or_default();
                Ok(ChapterWithSections { chapter, sections })
            })
            .collect()
    }

    /// Get a single chapter by ID
    pub async fn get_chapter(&self, chapter_id: i64) -> StorageResult<Chapter> {
        let row = sqlx::query("SELECT * FROM chapters WHERE id = ?")
            .bind(chapter_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(format!("Chapter {}", chapter_id)))?;

        row_to_chapter(&row)
    }

    /// Create a chapter, appended to the end of the book unless a position is given
    pub async fn create_chapter(
        &self,
        book_id: i64,
        input: ChapterCreateInput,
    ) -> StorageResult<Chapter> {
        let mut created = self.create_chapters(book_id, vec![input]).await?;
        created
            .pop()
            .ok_or_else(|| StorageError::Database("Chapter insert returned no row".to_string()))
    }

    /// Create several chapters in one transaction
    pub async fn create_chapters(
        &self,
        book_id: i64,
        inputs: Vec<ChapterCreateInput>,
    ) -> StorageResult<Vec<Chapter>> {
        debug!("Creating {} chapter(s) for book: {}", inputs.len(), book_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ?")
            .bind(book_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists == 0 {
            return Err(StorageError::NotFound(format!("Book {}", book_id)));
        }

        let mut next_index: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(order_index) + 1, 0) FROM chapters WHERE book_id = ?",
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            let title = validate_title("title", &input.title)?;
            let order_index = input.order_index.unwrap_or(next_index);
            next_index = next_index.max(order_index + 1);

            let result = sqlx::query(
                r#"
                INSERT INTO chapters (book_id, title, order_index, next_chapter_id, tags)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(book_id)
            .bind(&title)
            .bind(order_index)
            .bind(input.next_chapter_id)
            .bind(serde_json::to_string(&input.tags)?)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

            ids.push(result.last_insert_rowid());
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        let mut chapters = Vec::with_capacity(ids.len());
        for id in ids {
            chapters.push(self.get_chapter(id).await?);
        }
        Ok(chapters)
    }

    /// Rename a chapter
    pub async fn rename_chapter(&self, chapter_id: i64, title: &str) -> StorageResult<Chapter> {
        let title = validate_title("title", title)?;
        debug!("Renaming chapter {} to {}", chapter_id, title);

        let result = sqlx::query("UPDATE chapters SET title = ? WHERE id = ?")
            .bind(&title)
            .bind(chapter_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Chapter {}", chapter_id)));
        }

        self.get_chapter(chapter_id).await
    }

    /// Delete a chapter and, through the foreign key cascade, its sections
    pub async fn delete_chapter(&self, chapter_id: i64) -> StorageResult<()> {
        debug!("Deleting chapter: {}", chapter_id);

        let result = sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(chapter_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Chapter {}", chapter_id)));
        }

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Sections
    // ---------------------------------------------------------------------

    /// Get a single section by ID
    pub async fn get_section(&self, section_id: i64) -> StorageResult<Section> {
        debug!("Fetching section: {}", section_id);

        let row = sqlx::query("SELECT * FROM sections WHERE id = ?")
            .bind(section_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(format!("Section {}", section_id)))?;

        row_to_section(&row)
    }

    /// Create a section, appended to the end of the chapter unless a position is given
    pub async fn create_section(
        &self,
        chapter_id: i64,
        input: SectionCreateInput,
    ) -> StorageResult<Section> {
        let mut created = self.create_sections(chapter_id, vec![input]).await?;
        created
            .pop()
            .ok_or_else(|| StorageError::Database("Section insert returned no row".to_string()))
    }

    /// Create several sections in one transaction
    pub async fn create_sections(
        &self,
        chapter_id: i64,
        inputs: Vec<SectionCreateInput>,
    ) -> StorageResult<Vec<Section>> {
        debug!(
            "Creating {} section(s) for chapter: {}",
            inputs.len(),
            chapter_id
        );

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE id = ?")
            .bind(chapter_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists == 0 {
            return Err(StorageError::NotFound(format!("Chapter {}", chapter_id)));
        }

        let mut next_index = next_section_index(&mut tx, chapter_id).await?;

        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            let title = validate_title("title", &input.title)?;
            let order_index = input.order_index.unwrap_or(next_index);
            next_index = next_index.max(order_index + 1);

            let content = if input.content.is_null() {
                serde_json::json!({})
            } else {
                input.content
            };
            let blocks = match &input.blocks {
                Some(blocks) => Some(serde_json::to_string(blocks)?),
                None => None,
            };

            let result = sqlx::query(
                r#"
                INSERT INTO sections (
                    chapter_id, title, content, order_index,
                    next_section_id, blocks, tags
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(chapter_id)
            .bind(&title)
            .bind(serde_json::to_string(&content)?)
            .bind(order_index)
            .bind(input.next_section_id)
            .bind(blocks)
            .bind(serde_json::to_string(&input.tags)?)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

            ids.push(result.last_insert_rowid());
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        let mut sections = Vec::with_capacity(ids.len());
        for id in ids {
            sections.push(self.get_section(id).await?);
        }
        Ok(sections)
    }

    /// Rename a section
    pub async fn rename_section(&self, section_id: i64, title: &str) -> StorageResult<Section> {
        let title = validate_title("title", title)?;
        debug!("Renaming section {} to {}", section_id, title);

        let result = sqlx::query("UPDATE sections SET title = ? WHERE id = ?")
            .bind(&title)
            .bind(section_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Section {}", section_id)));
        }

        self.get_section(section_id).await
    }

    /// Replace the rich-text document of a section
    pub async fn update_section_content(
        &self,
        section_id: i64,
        content: &serde_json::Value,
    ) -> StorageResult<Section> {
        debug!("Updating content of section: {}", section_id);

        let result = sqlx::query("UPDATE sections SET content = ? WHERE id = ?")
            .bind(serde_json::to_string(content)?)
            .bind(section_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Section {}", section_id)));
        }

        self.get_section(section_id).await
    }

    /// Delete a section
    pub async fn delete_section(&self, section_id: i64) -> StorageResult<()> {
        debug!("Deleting section: {}", section_id);

        let result = sqlx::query("DELETE FROM sections WHERE id = ?")
            .bind(section_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Section {}", section_id)));
        }

        Ok(())
    }

    /// Whether a chapter exists and belongs to the given book
    pub async fn chapter_in_book(&self, chapter_id: i64, book_id: i64) -> StorageResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE id = ? AND book_id = ?")
                .bind(chapter_id)
                .bind(book_id)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        Ok(count > 0)
    }

    /// Whether a section exists and sits in a chapter of the given book
    pub async fn section_in_book(&self, section_id: i64, book_id: i64) -> StorageResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sections s
            JOIN chapters c ON s.chapter_id = c.id
            WHERE s.id = ? AND c.book_id = ?
            "#,
        )
        .bind(section_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(count > 0)
    }

    /// Move a section to another chapter, placing it after that chapter's last section
    pub async fn move_section(&self, section_id: i64, chapter_id: i64) -> StorageResult<Section> {
        debug!("Moving section {} to chapter {}", section_id, chapter_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE id = ?")
            .bind(chapter_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists == 0 {
            return Err(StorageError::NotFound(format!("Chapter {}", chapter_id)));
        }

        let current_chapter: Option<i64> =
            sqlx::query_scalar("SELECT chapter_id FROM sections WHERE id = ?")
                .bind(section_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;

        match current_chapter {
            None => return Err(StorageError::NotFound(format!("Section {}", section_id))),
            Some(current) if current == chapter_id => {
                tx.commit().await.map_err(StorageError::Sqlx)?;
                return self.get_section(section_id).await;
            }
            Some(_) => {}
        }

        let order_index = next_section_index(&mut tx, chapter_id).await?;

        sqlx::query("UPDATE sections SET chapter_id = ?, order_index = ? WHERE id = ?")
            .bind(chapter_id)
            .bind(order_index)
            .bind(section_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_section(section_id).await
    }
}

#[async_trait]
impl ContentStore for BookStorage {
    async fn fetch_chapters_with_sections(
        &self,
        book_id: i64,
    ) -> StorageResult<Vec<ChapterWithSections>> {
        self.get_chapters_with_sections(book_id).await
    }

    async fn bulk_update_positions(&self, plan: &ReorderPlan) -> StorageResult<()> {
        if plan.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        if !plan.chapters.is_empty() {
            let updated =
                update_positions(&mut tx, PositionTable::Chapters, &plan.chapters).await?;
            debug!("Updated positions of {} chapter(s)", updated);
        }

        if !plan.sections.is_empty() {
            let updated =
                update_positions(&mut tx, PositionTable::Sections, &plan.sections).await?;
            debug!("Updated positions of {} section(s)", updated);
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(())
    }
}

/// Set `order_index` for each listed row with one `CASE` statement per chunk.
///
/// Ids and positions are bound parameters; only the table name is spliced in.
async fn update_positions(
    conn: &mut SqliteConnection,
    table: PositionTable,
    updates: &[PositionUpdate],
) -> StorageResult<u64> {
    let mut affected = 0;

    for chunk in updates.chunks(MAX_POSITION_UPDATES_PER_STATEMENT) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "UPDATE {} SET order_index = CASE id",
            table.as_str()
        ));

        for update in chunk {
            builder
                .push(" WHEN ")
                .push_bind(update.id)
                .push(" THEN ")
                .push_bind(update.order_index);
        }

        builder.push(" ELSE order_index END WHERE id IN (");
        {
            let mut ids = builder.separated(", ");
            for update in chunk {
                ids.push_bind(update.id);
            }
            ids.push_unseparated(")");
        }

        let result = builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        affected += result.rows_affected();
    }

    Ok(affected)
}

async fn next_section_index(conn: &mut SqliteConnection, chapter_id: i64) -> StorageResult<i64> {
    sqlx::query_scalar(
        "SELECT COALESCE(MAX(order_index) + 1, 0) FROM sections WHERE chapter_id = ?",
    )
    .bind(chapter_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(StorageError::Sqlx)
}

fn row_to_book(row: &SqliteRow) -> StorageResult<Book> {
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        cover_image: row.try_get("cover_image")?,
        price: row.try_get("price")?,
        is_free: row.try_get("is_free")?,
        published_at: row.try_get("published_at")?,
        fake_viewers: row.try_get("fake_viewers")?,
        fake_purchases: row.try_get("fake_purchases")?,
        use_fake_data: row.try_get("use_fake_data")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_chapter(row: &SqliteRow) -> StorageResult<Chapter> {
    let tags: String = row.try_get("tags")?;

    Ok(Chapter {
        id: row.try_get("id")?,
        book_id: row.try_get("book_id")?,
        title: row.try_get("title")?,
        order_index: row.try_get("order_index")?,
        next_chapter_id: row.try_get("next_chapter_id")?,
        tags: serde_json::from_str(&tags)?,
    })
}

fn row_to_section(row: &SqliteRow) -> StorageResult<Section> {
    let content: String = row.try_get("content")?;
    let tags: String = row.try_get("tags")?;

    Ok(Section {
        id: row.try_get("id")?,
        chapter_id: row.try_get("chapter_id")?,
        title: row.try_get("title")?,
        content: serde_json::from_str(&content)?,
        order_index: row.try_get("order_index")?,
        next_section_id: row.try_get("next_section_id")?,
        blocks: row
            .try_get::<Option<String>, _>("blocks")?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()?,
        tags: serde_json::from_str(&tags)?,
    })
}
