//! In-memory post store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use nebula_core::domain::{BlogPost, FlagUpdate, PostChanges, PostFilter, PostKey, PostOrder};
use nebula_core::error::RepoError;
use nebula_core::ports::{CategoryCount, PostStore};

/// Post store over a `Vec` guarded by an async `RwLock`.
///
/// Insertion order is the collection order that ties fall back to.
pub struct InMemoryPostStore {
    posts: RwLock<Vec<BlogPost>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Start with an existing collection, e.g. a test fixture.
    pub fn with_posts(posts: Vec<BlogPost>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }

    /// Copy of the whole collection in insertion order.
    pub async fn snapshot(&self) -> Vec<BlogPost> {
        self.posts.read().await.clone()
    }

    fn slug_taken(posts: &[BlogPost], slug: &str, except: Option<Uuid>) -> bool {
        posts
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != except)
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn find(
        &self,
        filter: &PostFilter,
        order: &PostOrder,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<(Vec<BlogPost>, u64), RepoError> {
        let posts = self.posts.read().await;

        let mut matching: Vec<&BlogPost> = posts.iter().filter(|p| filter.matches(p)).collect();
        matching.sort_by(|a, b| order.compare(a, b));

        let total = matching.len() as u64;
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let take = limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);

        let page = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn find_one(&self, key: &PostKey) -> Result<Option<BlogPost>, RepoError> {
        let posts = self.posts.read().await;
        let found = posts.iter().find(|p| match key {
            PostKey::Id(id) => p.id == *id,
            PostKey::Slug(slug) => p.slug == *slug,
        });
        Ok(found.cloned())
    }

    async fn insert(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let mut posts = self.posts.write().await;

        if posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint("Post id already exists".to_string()));
        }
        if Self::slug_taken(&posts, &post.slug, None) {
            return Err(RepoError::Constraint(format!(
                "Slug '{}' already exists",
                post.slug
            )));
        }

        posts.push(post.clone());
        Ok(post)
    }

    async fn update_fields(&self, id: Uuid, changes: &PostChanges) -> Result<BlogPost, RepoError> {
        let mut posts = self.posts.write().await;

        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;

        if let Some(slug) = changes.slug() {
            if Self::slug_taken(&posts, &slug, Some(id)) {
                return Err(RepoError::Constraint(format!(
                    "Slug '{}' already exists",
                    slug
                )));
            }
        }

        let post = &mut posts[index];
        changes.apply_to(post);
        Ok(post.clone())
    }

    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        posts.remove(index);
        Ok(())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| !ids.contains(&p.id));
        Ok((before - posts.len()) as u64)
    }

    async fn update_many(&self, ids: &[Uuid], flags: FlagUpdate) -> Result<u64, RepoError> {
        let mut posts = self.posts.write().await;
        let mut affected = 0;
        for post in posts.iter_mut().filter(|p| ids.contains(&p.id)) {
            flags.apply_to(post);
            affected += 1;
        }
        Ok(affected)
    }

    async fn count_where(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn count_by_category(&self) -> Result<Vec<CategoryCount>, RepoError> {
        let posts = self.posts.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for post in posts.iter() {
            *counts.entry(post.category.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect())
    }
}
