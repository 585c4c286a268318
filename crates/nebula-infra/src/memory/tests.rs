use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use nebula_core::domain::{
    Author, BlogPost, BulkAction, FlagUpdate, NewPost, PostChanges, PostKey, PostQuery, PostStats, PostStatus, SortBy,
};
use nebula_core::ports::PostStore;
use nebula_core::{BlogService, DomainError};

use super::{InMemoryAuthorDirectory, InMemoryEngagement, InMemoryPostStore};

struct Harness {
    service: BlogService,
    store: Arc<InMemoryPostStore>,
    engagement: Arc<InMemoryEngagement>,
    author: Author,
}

fn sample_post(author_id: Uuid, title: &str, category: &str, published: bool, age_min: i64) -> BlogPost {
    let created = Utc::now() - Duration::minutes(age_min);
    BlogPost {
        id: Uuid::new_v4(),
        author_id,
        title: title.to_string(),
        slug: nebula_core::domain::slugify(title),
        excerpt: None,
        content: format!("{} content", title),
        category: category.to_string(),
        tags: vec!["rust".to_string()],
        cover_image: None,
        read_time: Some(4),
        published,
        featured: false,
        created_at: created,
        updated_at: created,
    }
}

async fn harness() -> Harness {
    let author = Author {
        id: Uuid::new_v4(),
        name: Some("Ada".to_string()),
        email: "ada@example.com".to_string(),
        avatar: None,
    };

    let posts = vec![
        sample_post(author.id, "First Light", "Astronomy", true, 60),
        sample_post(author.id, "Dark Matter", "Astronomy", true, 50),
        sample_post(author.id, "Unfinished", "Astronomy", false, 40),
        sample_post(author.id, "Type Systems", "Web Development", true, 30),
        sample_post(author.id, "Event Horizons", "Astronomy", true, 20),
        sample_post(author.id, "Red Giants", "Astronomy", true, 10),
    ];

    let store = Arc::new(InMemoryPostStore::with_posts(posts));
    let authors = Arc::new(InMemoryAuthorDirectory::new());
    authors.register(author.clone()).await;
    let engagement = Arc::new(InMemoryEngagement::new());

    let service = BlogService::new(store.clone(), authors, engagement.clone());
    Harness {
        service,
        store,
        engagement,
        author,
    }
}

fn id_of(posts: &[BlogPost], title: &str) -> Uuid {
    posts
        .iter()
        .find(|p| p.title == title)
        .map(|p| p.id)
        .expect("fixture post")
}

#[tokio::test]
async fn test_create_post_derives_slug_and_defaults() {
    let h = harness().await;

    let view = h
        .service
        .create_post(NewPost {
            title: "Hello, World!".to_string(),
            content: "Body".to_string(),
            category: "Web Development".to_string(),
            author_id: h.author.id,
            tags: Some(vec!["a".to_string(), "b".to_string()]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(view.post.slug, "hello-world");
    assert!(!view.post.published);
    assert!(!view.post.featured);
    assert_eq!(view.stats, PostStats::default());
    assert_eq!(view.author.as_ref().map(|a| a.id), Some(h.author.id));
    assert_eq!(view.post.tags, vec!["a", "b"]);
}

#[tokio::test]
async fn test_duplicate_slug_is_a_conflict() {
    let h = harness().await;
    let result = h
        .service
        .create_post(NewPost {
            title: "dark matter".to_string(),
            content: "Body".to_string(),
            category: "Astronomy".to_string(),
            author_id: h.author.id,
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_update_keeps_unsupplied_fields() {
    let h = harness().await;
    let posts = h.store.snapshot().await;
    let id = id_of(&posts, "Dark Matter");

    h.store
        .update_many(&[id], FlagUpdate::featured(true))
        .await
        .unwrap();
    let before = h.store.find_one(&PostKey::Id(id)).await.unwrap().unwrap();

    let updated = h
        .service
        .update_post(id, PostChanges::new().published(true))
        .await
        .unwrap();

    assert!(updated.post.published);
    assert!(updated.post.featured);
    assert_eq!(updated.post.title, before.title);
    assert_eq!(updated.post.tags, before.tags);
    assert!(updated.post.updated_at > before.updated_at);
}

#[tokio::test]
async fn test_update_title_regenerates_slug() {
    let h = harness().await;
    let id = id_of(&h.store.snapshot().await, "Red Giants");

    let updated = h
        .service
        .update_post(id, PostChanges::new().title("White Dwarfs & Novae"))
        .await
        .unwrap();
    assert_eq!(updated.post.slug, "white-dwarfs-novae");

    let found = h
        .service
        .get_post(&PostKey::Slug("white-dwarfs-novae".to_string()))
        .await
        .unwrap();
    assert_eq!(found.post.post.id, id);
}

#[tokio::test]
async fn test_update_missing_post() {
    let h = harness().await;
    let result = h
        .service
        .update_post(Uuid::new_v4(), PostChanges::new().featured(true))
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_missing_post_with_taken_slug() {
    let h = harness().await;
    let result = h
        .service
        .update_post(Uuid::new_v4(), PostChanges::new().title("Dark Matter"))
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_create_rejects_unknown_author() {
    let h = harness().await;
    let before = h.store.snapshot().await.len();

    let result = h
        .service
        .create_post(NewPost {
            title: "Ghost Writer".to_string(),
            content: "Body".to_string(),
            category: "Astronomy".to_string(),
            author_id: Uuid::new_v4(),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    assert_eq!(h.store.snapshot().await.len(), before);
}

#[tokio::test]
async fn test_delete_missing_post_leaves_collection() {
    let h = harness().await;
    let before = h.store.snapshot().await;

    let result = h.service.delete_post(Uuid::new_v4()).await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    assert_eq!(h.store.snapshot().await, before);
}

#[tokio::test]
async fn test_delete_post() {
    let h = harness().await;
    let id = id_of(&h.store.snapshot().await, "Unfinished");

    h.service.delete_post(id).await.unwrap();

    assert!(h.store.find_one(&PostKey::Id(id)).await.unwrap().is_none());
    assert_eq!(h.store.snapshot().await.len(), 5);
}

#[tokio::test]
async fn test_bulk_publish_skips_missing_ids() {
    let h = harness().await;
    let posts = h.store.snapshot().await;
    let a = id_of(&posts, "Unfinished");
    let b = id_of(&posts, "First Light");

    h.store
        .update_many(&[b], FlagUpdate::published(false))
        .await
        .unwrap();

    let outcome = h
        .service
        .bulk_mutate(&[a, b, Uuid::new_v4()], "publish")
        .await
        .unwrap();

    assert_eq!(outcome.action, BulkAction::Publish);
    assert_eq!(outcome.affected, 2);
    for id in [a, b] {
        let post = h.store.find_one(&PostKey::Id(id)).await.unwrap().unwrap();
        assert!(post.published);
    }
}

#[tokio::test]
async fn test_bulk_unknown_action_touches_nothing() {
    let h = harness().await;
    let before = h.store.snapshot().await;
    let ids: Vec<Uuid> = before.iter().map(|p| p.id).collect();

    let result = h.service.bulk_mutate(&ids, "bogus").await;

    assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    assert_eq!(h.store.snapshot().await, before);
}

#[tokio::test]
async fn test_bulk_requires_ids() {
    let h = harness().await;
    let result = h.service.bulk_mutate(&[], "delete").await;
    assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_bulk_delete_and_feature() {
    let h = harness().await;
    let posts = h.store.snapshot().await;
    let a = id_of(&posts, "Type Systems");
    let b = id_of(&posts, "Event Horizons");

    let featured = h.service.bulk_mutate(&[a, a, b], "feature").await.unwrap();
    assert_eq!(featured.affected, 2);

    let deleted = h.service.bulk_mutate(&[a, b], "delete").await.unwrap();
    assert_eq!(deleted.affected, 2);
    assert_eq!(h.store.snapshot().await.len(), 4);
}

#[tokio::test]
async fn test_public_listing_hides_drafts() {
    let h = harness().await;

    let page = h
        .service
        .list_posts(PostQuery {
            limit: 50,
            ..PostQuery::public()
        })
        .await
        .unwrap();

    assert_eq!(page.pagination.total, 5);
    assert!(page.items.iter().all(|v| v.post.published));
    assert!(page.items.iter().all(|v| v.author.is_some()));
}

#[tokio::test]
async fn test_admin_status_and_category() {
    let h = harness().await;

    let drafts = h
        .service
        .list_posts(PostQuery {
            status: PostStatus::Draft,
            ..PostQuery::admin()
        })
        .await
        .unwrap();
    assert_eq!(drafts.items.len(), 1);
    assert_eq!(drafts.items[0].post.title, "Unfinished");

    let web = h
        .service
        .list_posts(PostQuery {
            category: Some("Web Development".to_string()),
            ..PostQuery::admin()
        })
        .await
        .unwrap();
    assert_eq!(web.pagination.total, 1);
    assert!(web.items.iter().all(|v| v.post.category == "Web Development"));
}

#[tokio::test]
async fn test_pages_reassemble_full_listing() {
    let h = harness().await;
    let full = h.service.list_posts(PostQuery::admin()).await.unwrap();

    let mut collected = Vec::new();
    let mut page = 1;
    loop {
        let slice = h
            .service
            .list_posts(PostQuery {
                page,
                limit: 4,
                ..PostQuery::admin()
            })
            .await
            .unwrap();
        assert!(slice.items.len() <= 4);
        assert_eq!(slice.pagination.pages, 2);
        if slice.items.is_empty() {
            break;
        }
        collected.extend(slice.items);
        page += 1;
    }

    assert_eq!(page, 3);
    assert_eq!(collected, full.items);
}

#[tokio::test]
async fn test_sort_by_likes_uses_engagement() {
    let h = harness().await;
    let posts = h.store.snapshot().await;
    let dark = id_of(&posts, "Dark Matter");
    let red = id_of(&posts, "Red Giants");

    for _ in 0..3 {
        h.engagement.record_like(dark).await;
    }
    h.engagement.record_like(red).await;

    let page = h
        .service
        .list_posts(PostQuery {
            sort_by: SortBy::Likes,
            limit: 3,
            ..PostQuery::admin()
        })
        .await
        .unwrap();

    let titles: Vec<&str> = page.items.iter().map(|v| v.post.title.as_str()).collect();
    // Ties keep newest-first order.
    assert_eq!(titles, vec!["Dark Matter", "Red Giants", "Event Horizons"]);
    assert_eq!(page.items[0].stats.likes, 3);
    assert_eq!(page.pagination.total, 6);
    assert_eq!(page.pagination.pages, 2);
}

#[tokio::test]
async fn test_public_featured_first() {
    let h = harness().await;
    let first = id_of(&h.store.snapshot().await, "First Light");
    h.service.bulk_mutate(&[first], "feature").await.unwrap();

    let page = h.service.list_posts(PostQuery::public()).await.unwrap();
    assert_eq!(page.items[0].post.id, first);
    assert_eq!(page.items[1].post.title, "Red Giants");
}

#[tokio::test]
async fn test_slug_lookup_attaches_related_posts() {
    let h = harness().await;

    let detail = h
        .service
        .get_post(&PostKey::Slug("dark-matter".to_string()))
        .await
        .unwrap();

    let related: Vec<&str> = detail
        .related
        .iter()
        .map(|v| v.post.title.as_str())
        .collect();
    assert_eq!(related, vec!["Red Giants", "Event Horizons", "First Light"]);
}

#[tokio::test]
async fn test_slug_lookup_hides_drafts_but_id_lookup_does_not() {
    let h = harness().await;
    let id = id_of(&h.store.snapshot().await, "Unfinished");

    let by_slug = h
        .service
        .get_post(&PostKey::Slug("unfinished".to_string()))
        .await;
    assert!(matches!(by_slug, Err(DomainError::NotFound { .. })));

    let by_id = h.service.get_post(&PostKey::Id(id)).await.unwrap();
    assert_eq!(by_id.post.post.title, "Unfinished");
    assert!(by_id.related.is_empty());
}

#[tokio::test]
async fn test_dashboard_stats() {
    let h = harness().await;
    let posts = h.store.snapshot().await;
    h.engagement.record_like(posts[0].id).await;
    h.engagement.record_comment(posts[0].id).await;
    h.engagement.record_comment(posts[1].id).await;

    let stats = h.service.dashboard_stats().await.unwrap();

    assert_eq!(stats.total_posts, 6);
    assert_eq!(stats.published_posts, 5);
    assert_eq!(stats.draft_posts, 1);
    assert_eq!(stats.featured_posts, 0);
    assert_eq!(stats.recent_posts, 6);
    assert_eq!(stats.total_authors, 1);
    assert_eq!(stats.total_likes, 1);
    assert_eq!(stats.total_comments, 2);
    assert_eq!(stats.posts_by_category.len(), 2);
    assert_eq!(stats.posts_by_category[0].category, "Astronomy");
    assert_eq!(stats.posts_by_category[0].count, 5);
}
