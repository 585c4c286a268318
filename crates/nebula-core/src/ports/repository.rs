use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BlogPost, FlagUpdate, PostChanges, PostFilter, PostKey, PostOrder};
use crate::error::RepoError;

/// Number of posts in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Post storage. Uniqueness of slugs is the store's job.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Matching posts in `order`, sliced by `skip`/`limit`, plus the total match count.
    async fn find(
        &self,
        filter: &PostFilter,
        order: &PostOrder,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<(Vec<BlogPost>, u64), RepoError>;

    /// Find a post by id or slug.
    async fn find_one(&self, key: &PostKey) -> Result<Option<BlogPost>, RepoError>;

    /// Persist a freshly created post.
    async fn insert(&self, post: BlogPost) -> Result<BlogPost, RepoError>;

    /// Apply a partial update. `RepoError::NotFound` if the id does not exist.
    async fn update_fields(&self, id: Uuid, changes: &PostChanges) -> Result<BlogPost, RepoError>;

    /// Remove one post. `RepoError::NotFound` if the id does not exist.
    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError>;

    /// Remove every post whose id is listed; unknown ids are skipped.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError>;

    /// Write publish/feature flags on every listed post; unknown ids are skipped.
    async fn update_many(&self, ids: &[Uuid], flags: FlagUpdate) -> Result<u64, RepoError>;

    async fn count_where(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Post counts grouped by category, ordered by category name.
    async fn count_by_category(&self) -> Result<Vec<CategoryCount>, RepoError>;
}
