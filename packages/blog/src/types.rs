// ABOUTME: Blog post type definitions
// ABOUTME: Stored post record plus create and partial-update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub author_id: String,
    pub author_name: Option<String>,
    pub title: String,
    pub slug: String,
    pub category: String,
    /// Rich-text document, stored opaquely
    pub content: serde_json::Value,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    /// Estimated minutes to read
    pub read_time: i64,
    pub tags: Option<Vec<String>>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub use_fake_data: bool,
    pub fake_viewers: Option<i64>,
    pub fake_purchases: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A new draft; the slug and starter document are derived from the title
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostCreateInput {
    pub author_id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostUpdateInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub cover_image: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<serde_json::Value>,
    /// An empty list clears the tags
    pub tags: Option<Vec<String>>,
    pub read_time: Option<i64>,
    pub author_name: Option<String>,
    pub use_fake_data: Option<bool>,
    pub fake_viewers: Option<i64>,
    pub fake_purchases: Option<i64>,
}

impl BlogPostUpdateInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.cover_image.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.read_time.is_none()
            && self.author_name.is_none()
            && self.use_fake_data.is_none()
            && self.fake_viewers.is_none()
            && self.fake_purchases.is_none()
    }
}
