// ABOUTME: Blog post storage layer using SQLite
// ABOUTME: Draft creation, partial updates, publish/unpublish, and latest-post listing

use chrono::Utc;
use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use folio_core::validate_title;
use folio_storage::{StorageError, StorageResult};

use crate::types::{BlogPost, BlogPostCreateInput, BlogPostUpdateInput};

/// Minutes shown for a new draft until the author sets a value
pub const DEFAULT_READ_TIME: i64 = 5;

/// Posts shown on the home page
pub const HOME_PAGE_POST_COUNT: i64 = 3;

/// Lowercase ASCII letters and digits joined by single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

fn starter_content(title: &str) -> serde_json::Value {
    json!({
        "type": "doc",
        "content": [
            {
                "type": "heading",
                "attrs": { "level": 1 },
                "content": [{ "type": "text", "text": title }]
            },
            {
                "type": "paragraph",
                "content": [{ "type": "text", "text": "Start writing your blog post here..." }]
            }
        ]
    })
}

fn tags_column(tags: &[String]) -> StorageResult<Option<String>> {
    if tags.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(tags)?))
    }
}

pub struct BlogStorage {
    pool: SqlitePool,
}

impl BlogStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All posts, drafts included, newest first
    pub async fn list_blog_posts(&self) -> StorageResult<Vec<BlogPost>> {
        debug!("Fetching all blog posts");

        let rows = sqlx::query("SELECT * FROM blog_posts ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_blog_post).collect()
    }

    /// Newest published posts, at most `limit`
    pub async fn list_latest_blog_posts(&self, limit: i64) -> StorageResult<Vec<BlogPost>> {
        debug!("Fetching latest {} blog posts", limit);

        let rows = sqlx::query(
            r#"
            SELECT * FROM blog_posts
            WHERE published = 1
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_blog_post).collect()
    }

    pub async fn get_blog_post(&self, post_id: i64) -> StorageResult<BlogPost> {
        debug!("Fetching blog post: {}", post_id);

        let row = sqlx::query("SELECT * FROM blog_posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(format!("Blog post {}", post_id)))?;

        row_to_blog_post(&row)
    }

    /// Create an unpublished draft with a starter document
    pub async fn create_blog_post(&self, input: BlogPostCreateInput) -> StorageResult<BlogPost> {
        let title = validate_title("title", &input.title)?;
        let author_id = input.author_id.trim();
        if author_id.is_empty() {
            return Err(StorageError::InvalidInput(
                "authorId cannot be empty".to_string(),
            ));
        }

        let slug = slugify(&title);
        let now = Utc::now();

        debug!("Creating blog post: {} ({})", title, slug);

        let result = sqlx::query(
            r#"
            INSERT INTO blog_posts (
                author_id, title, slug, category, content, cover_image,
                read_time, tags, published, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(author_id)
        .bind(&title)
        .bind(&slug)
        .bind(input.category.trim())
        .bind(serde_json::to_string(&starter_content(&title))?)
        .bind(&input.cover_image)
        .bind(DEFAULT_READ_TIME)
        .bind(tags_column(&input.tags)?)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let post = self.get_blog_post(result.last_insert_rowid()).await?;
        info!("Created blog post {} '{}'", post.id, post.slug);
        Ok(post)
    }

    /// Update the provided fields of a post; the slug never changes
    pub async fn update_blog_post(
        &self,
        post_id: i64,
        input: BlogPostUpdateInput,
    ) -> StorageResult<BlogPost> {
        debug!("Updating blog post: {}", post_id);

        if input.is_empty() {
            return self.get_blog_post(post_id).await;
        }

        let title = match &input.title {
            Some(title) => Some(validate_title("title", title)?),
            None => None,
        };
        if let Some(read_time) = input.read_time {
            if read_time < 1 {
                return Err(StorageError::InvalidInput(format!(
                    "readTime must be at least 1 minute, got {}",
                    read_time
                )));
            }
        }
        let content = match &input.content {
            Some(content) => Some(serde_json::to_string(content)?),
            None => None,
        };
        let tags = match &input.tags {
            Some(tags) => Some(tags_column(tags)?),
            None => None,
        };

        let mut query_parts = vec!["updated_at = ?"];

        if title.is_some() {
            query_parts.push("title = ?");
        }
        if input.category.is_some() {
            query_parts.push("category = ?");
        }
        if input.cover_image.is_some() {
            query_parts.push("cover_image = ?");
        }
        if input.excerpt.is_some() {
            query_parts.push("excerpt = ?");
        }
        if content.is_some() {
            query_parts.push("content = ?");
        }
        if tags.is_some() {
            query_parts.push("tags = ?");
        }
        if input.read_time.is_some() {
            query_parts.push("read_time = ?");
        }
        if input.author_name.is_some() {
            query_parts.push("author_name = ?");
        }
        if input.use_fake_data.is_some() {
            query_parts.push("use_fake_data = ?");
        }
        if input.fake_viewers.is_some() {
            query_parts.push("fake_viewers = ?");
        }
        if input.fake_purchases.is_some() {
            query_parts.push("fake_purchases = ?");
        }

        let query_str = format!(
            "UPDATE blog_posts SET {} WHERE id = ?",
            query_parts.join(", ")
        );
        let mut query = sqlx::query(&query_str).bind(Utc::now());

        if let Some(title) = title {
            query = query.bind(title);
        }
        if let Some(category) = input.category {
            query = query.bind(category);
        }
        if let Some(cover_image) = input.cover_image {
            query = query.bind(cover_image);
        }
        if let Some(excerpt) = input.excerpt {
            query = query.bind(excerpt);
        }
        if let Some(content) = content {
            query = query.bind(content);
        }
        if let Some(tags) = tags {
            query = query.bind(tags);
        }
        if let Some(read_time) = input.read_time {
            query = query.bind(read_time);
        }
        if let Some(author_name) = input.author_name {
            query = query.bind(author_name);
        }
        if let Some(use_fake_data) = input.use_fake_data {
            query = query.bind(use_fake_data);
        }
        if let Some(fake_viewers) = input.fake_viewers {
            query = query.bind(fake_viewers.max(0));
        }
        if let Some(fake_purchases) = input.fake_purchases {
            query = query.bind(fake_purchases.max(0));
        }

        let result = query
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Blog post {}", post_id)));
        }

        self.get_blog_post(post_id).await
    }

    /// Make a post public, stamping the publication time
    pub async fn publish_blog_post(&self, post_id: i64) -> StorageResult<BlogPost> {
        let now = Utc::now();
        self.set_published(post_id, true, Some(now)).await
    }

    /// Return a post to draft and clear its publication time
    pub async fn unpublish_blog_post(&self, post_id: i64) -> StorageResult<BlogPost> {
        self.set_published(post_id, false, None).await
    }

    async fn set_published(
        &self,
        post_id: i64,
        published: bool,
        published_at: Option<chrono::DateTime<Utc>>,
    ) -> StorageResult<BlogPost> {
        debug!("Setting blog post {} published = {}", post_id, published);

        let result = sqlx::query(
            "UPDATE blog_posts SET published = ?, published_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(published)
        .bind(published_at)
        .bind(Utc::now())
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Blog post {}", post_id)));
        }

        self.get_blog_post(post_id).await
    }
}

fn row_to_blog_post(row: &SqliteRow) -> StorageResult<BlogPost> {
    let content: String = row.try_get("content")?;

    Ok(BlogPost {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        author_name: row.try_get("author_name")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        category: row.try_get("category")?,
        content: serde_json::from_str(&content)?,
        excerpt: row.try_get("excerpt")?,
        cover_image: row.try_get("cover_image")?,
        read_time: row.try_get("read_time")?,
        tags: row
            .try_get::<Option<String>, _>("tags")?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()?,
        published: row.try_get("published")?,
        published_at: row.try_get("published_at")?,
        use_fake_data: row.try_get("use_fake_data")?,
        fake_viewers: row.try_get("fake_viewers")?,
        fake_purchases: row.try_get("fake_purchases")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
