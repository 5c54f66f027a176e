// ABOUTME: Integration tests for blog post storage
// ABOUTME: Drafts, partial updates, publishing, and the home page listing

use folio_blog::{
    BlogPostCreateInput, BlogPostUpdateInput, BlogStorage, DEFAULT_READ_TIME,
    HOME_PAGE_POST_COUNT,
};
use folio_storage::StorageError;
use pretty_assertions::assert_eq;
use serde_json::json;

async fn create_test_storage() -> BlogStorage {
    let pool = folio_storage::memory_pool()
        .await
        .expect("Failed to create in-memory database");
    BlogStorage::new(pool)
}

fn draft(title: &str) -> BlogPostCreateInput {
    BlogPostCreateInput {
        author_id: "author-1".to_string(),
        title: title.to_string(),
        category: "Engineering".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_draft_defaults() {
    let storage = create_test_storage().await;

    let post = storage
        .create_blog_post(BlogPostCreateInput {
            tags: vec!["rust".to_string()],
            ..draft("Ten Tips for Better Code")
        })
        .await
        .unwrap();

    assert_eq!(post.slug, "ten-tips-for-better-code");
    assert_eq!(post.category, "Engineering");
    assert_eq!(post.read_time, DEFAULT_READ_TIME);
    assert_eq!(post.tags, Some(vec!["rust".to_string()]));
    assert!(!post.published);
    assert!(post.published_at.is_none());
    assert_eq!(post.content["content"][0]["content"][0]["text"], "Ten Tips for Better Code");

    let untagged = storage.create_blog_post(draft("Untagged")).await.unwrap();
    assert_eq!(untagged.tags, None);
}

#[tokio::test]
async fn test_create_rejects_blank_title_and_author() {
    let storage = create_test_storage().await;

    assert!(matches!(
        storage.create_blog_post(draft("   ")).await,
        Err(StorageError::InvalidInput(_))
    ));
    assert!(matches!(
        storage
            .create_blog_post(BlogPostCreateInput {
                author_id: String::new(),
                ..draft("No author")
            })
            .await,
        Err(StorageError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let storage = create_test_storage().await;
    let post = storage
        .create_blog_post(BlogPostCreateInput {
            tags: vec!["old".to_string()],
            ..draft("Original Title")
        })
        .await
        .unwrap();
    let doc = json!({ "type": "doc", "content": [] });

    let updated = storage
        .update_blog_post(
            post.id,
            BlogPostUpdateInput {
                title: Some("Renamed".to_string()),
                excerpt: Some("Short summary".to_string()),
                content: Some(doc.clone()),
                tags: Some(vec![]),
                read_time: Some(12),
                author_name: Some("Alice".to_string()),
                use_fake_data: Some(true),
                fake_viewers: Some(900),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.slug, "original-title");
    assert_eq!(updated.category, "Engineering");
    assert_eq!(updated.excerpt.as_deref(), Some("Short summary"));
    assert_eq!(updated.content, doc);
    assert_eq!(updated.tags, None);
    assert_eq!(updated.read_time, 12);
    assert_eq!(updated.author_name.as_deref(), Some("Alice"));
    assert!(updated.use_fake_data);
    assert_eq!(updated.fake_viewers, Some(900));
    assert_eq!(updated.fake_purchases, None);

    let same = storage
        .update_blog_post(post.id, BlogPostUpdateInput::default())
        .await
        .unwrap();
    assert_eq!(same, updated);
}

#[tokio::test]
async fn test_update_validation_and_missing_post() {
    let storage = create_test_storage().await;
    let post = storage.create_blog_post(draft("Valid")).await.unwrap();

    assert!(matches!(
        storage
            .update_blog_post(
                post.id,
                BlogPostUpdateInput {
                    read_time: Some(0),
                    ..Default::default()
                }
            )
            .await,
        Err(StorageError::InvalidInput(_))
    ));
    assert!(matches!(
        storage
            .update_blog_post(
                777,
                BlogPostUpdateInput {
                    excerpt: Some("x".to_string()),
                    ..Default::default()
                }
            )
            .await,
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        storage.get_blog_post(777).await,
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_publish_and_unpublish() {
    let storage = create_test_storage().await;
    let post = storage.create_blog_post(draft("Going Live")).await.unwrap();

    let published = storage.publish_blog_post(post.id).await.unwrap();
    assert!(published.published);
    assert!(published.published_at.is_some());

    let draft_again = storage.unpublish_blog_post(post.id).await.unwrap();
    assert!(!draft_again.published);
    assert!(draft_again.published_at.is_none());

    assert!(matches!(
        storage.publish_blog_post(404).await,
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_latest_lists_newest_published_only() {
    let storage = create_test_storage().await;

    let mut published_ids = Vec::new();
    for n in 0..5 {
        let post = storage
            .create_blog_post(draft(&format!("Post {}", n)))
            .await
            .unwrap();
        storage.publish_blog_post(post.id).await.unwrap();
        published_ids.push(post.id);
    }
    storage.create_blog_post(draft("Unfinished")).await.unwrap();

    let latest = storage
        .list_latest_blog_posts(HOME_PAGE_POST_COUNT)
        .await
        .unwrap();
    let ids: Vec<i64> = latest.iter().map(|p| p.id).collect();
    let expected: Vec<i64> = published_ids.iter().rev().take(3).copied().collect();
    assert_eq!(ids, expected);

    let all = storage.list_blog_posts().await.unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].title, "Unfinished");
}
