//! Blog service: the query path and the mutation path over the ports.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    BlogPost, BulkAction, BulkOutcome, NewPost, Page, Pagination, PostChanges, PostFilter,
    PostKey, PostOrder, PostQuery, PostStats, PostView, run_query,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthorDirectory, EngagementCounters, PostStore};

/// Default upper bound on `limit`.
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;

/// How many related posts a slug lookup attaches.
pub const RELATED_POSTS: u64 = 3;

/// A single post with the posts related to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub post: PostView,
    pub related: Vec<PostView>,
}

/// Orchestrates listing and mutation of blog posts.
///
/// Holds no state of its own beyond handles to the stores.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostStore>,
    authors: Arc<dyn AuthorDirectory>,
    engagement: Arc<dyn EngagementCounters>,
    max_page_size: u64,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        authors: Arc<dyn AuthorDirectory>,
        engagement: Arc<dyn EngagementCounters>,
    ) -> Self {
        Self {
            posts,
            authors,
            engagement,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max: u64) -> Self {
        self.max_page_size = max.max(1);
        self
    }

    pub(crate) fn posts(&self) -> &dyn PostStore {
        self.posts.as_ref()
    }

    pub(crate) fn authors(&self) -> &dyn AuthorDirectory {
        self.authors.as_ref()
    }

    pub(crate) fn engagement(&self) -> &dyn EngagementCounters {
        self.engagement.as_ref()
    }

    /// List one page of posts.
    pub async fn list_posts(&self, query: PostQuery) -> Result<Page<PostView>, DomainError> {
        let query = query.validate(self.max_page_size)?;

        match query.store_order() {
            Some(order) => {
                let (posts, total) = self
                    .posts
                    .find(&query.filter, &order, query.skip(), Some(query.limit))
                    .await?;
                Ok(Page {
                    items: self.enrich(posts).await?,
                    pagination: Pagination::new(query.page, query.limit, total),
                })
            }
            None => {
                // Engagement keys are not columns: load every match and sort here.
                let order = PostOrder {
                    featured_first: query.featured_first,
                    ..PostOrder::newest()
                };
                let (posts, _) = self.posts.find(&query.filter, &order, 0, None).await?;
                let views = self.enrich(posts).await?;
                Ok(run_query(&views, &query))
            }
        }
    }

    /// Look up a post by id (any state) or by slug (published only, with related posts).
    pub async fn get_post(&self, key: &PostKey) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_one(key)
            .await?
            .ok_or_else(|| DomainError::post_not_found(key))?;

        let related = match key {
            PostKey::Id(_) => Vec::new(),
            PostKey::Slug(_) => {
                if !post.published {
                    return Err(DomainError::post_not_found(key));
                }
                let filter = PostFilter::default()
                    .published(true)
                    .category(post.category.clone())
                    .excluding(post.id);
                let (related, _) = self
                    .posts
                    .find(&filter, &PostOrder::newest(), 0, Some(RELATED_POSTS))
                    .await?;
                related
            }
        };

        let mut views = self.enrich(std::iter::once(post).chain(related).collect()).await?;
        let post = views.remove(0);
        Ok(PostDetail {
            post,
            related: views,
        })
    }

    pub async fn create_post(&self, input: NewPost) -> Result<PostView, DomainError> {
        let post = BlogPost::create(input)?;
        let authors = self.authors.find_many(&[post.author_id]).await?;
        if !authors.contains_key(&post.author_id) {
            return Err(DomainError::invalid("unknown authorId"));
        }

        let created = self.posts.insert(post).await?;

        tracing::info!(post_id = %created.id, slug = %created.slug, "Blog post created");

        let mut view = self.enrich(vec![created]).await?.remove(0);
        view.stats = PostStats::default();
        Ok(view)
    }

    pub async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<PostView, DomainError> {
        changes.validate()?;

        let updated = self
            .posts
            .update_fields(id, &changes)
            .await
            .map_err(|e| not_found_or(e, id))?;

        tracing::info!(post_id = %id, slug = %updated.slug, "Blog post updated");

        Ok(self.enrich(vec![updated]).await?.remove(0))
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts
            .delete_one(id)
            .await
            .map_err(|e| not_found_or(e, id))?;

        tracing::info!(post_id = %id, "Blog post deleted");
        Ok(())
    }

    /// Apply `action` to every listed post. Unknown ids are skipped.
    ///
    /// The action is parsed before any store call, so an unknown action touches nothing.
    pub async fn bulk_mutate(&self, ids: &[Uuid], action: &str) -> Result<BulkOutcome, DomainError> {
        let action: BulkAction = action.parse()?;
        if ids.is_empty() {
            return Err(DomainError::invalid("no post ids provided"));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let ids: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let result = match action.flag_update() {
            None => self.posts.delete_many(&ids).await,
            Some(flags) => self.posts.update_many(&ids, flags).await,
        };

        let affected = match result {
            Ok(affected) => affected,
            Err(RepoError::Partial { affected, reason }) => {
                tracing::error!(
                    action = %action,
                    affected,
                    requested = ids.len(),
                    "Bulk operation stopped part way: {}",
                    reason
                );
                return Err(DomainError::PartialFailure {
                    action: action.as_str(),
                    affected,
                    reason,
                });
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            action = %action,
            affected,
            requested = ids.len(),
            "Bulk operation applied"
        );

        Ok(BulkOutcome { action, affected })
    }

    /// Join authors and engagement stats onto posts, preserving order.
    async fn enrich(&self, posts: Vec<BlogPost>) -> Result<Vec<PostView>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors = self.authors.find_many(&author_ids).await?;
        let stats = self.engagement.stats_for(&post_ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                author: authors.get(&post.author_id).cloned(),
                stats: stats.get(&post.id).copied().unwrap_or_default(),
                post,
            })
            .collect())
    }
}

fn not_found_or(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::post_not_found(id),
        other => other.into(),
    }
}
