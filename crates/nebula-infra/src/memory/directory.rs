//! In-memory author directory and engagement counters.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use nebula_core::domain::{Author, PostStats};
use nebula_core::error::RepoError;
use nebula_core::ports::{AuthorDirectory, EngagementCounters, EngagementTotals};

struct AuthorEntry {
    author: Author,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct InMemoryAuthorDirectory {
    authors: RwLock<HashMap<Uuid, AuthorEntry>>,
}

impl InMemoryAuthorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, author: Author) {
        self.register_at(author, Utc::now()).await;
    }

    pub async fn register_at(&self, author: Author, created_at: DateTime<Utc>) {
        let mut authors = self.authors.write().await;
        authors.insert(author.id, AuthorEntry { author, created_at });
    }
}

#[async_trait]
impl AuthorDirectory for InMemoryAuthorDirectory {
    async fn find_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Author>, RepoError> {
        let authors = self.authors.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| authors.get(id).map(|e| (*id, e.author.clone())))
            .collect())
    }

    async fn count(&self, since: Option<DateTime<Utc>>) -> Result<u64, RepoError> {
        let authors = self.authors.read().await;
        let count = authors
            .values()
            .filter(|e| since.is_none_or(|t| e.created_at >= t))
            .count();
        Ok(count as u64)
    }
}

/// Engagement counters kept per post.
#[derive(Default)]
pub struct InMemoryEngagement {
    stats: RwLock<HashMap<Uuid, PostStats>>,
}

impl InMemoryEngagement {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, post_id: Uuid, stats: PostStats) {
        self.stats.write().await.insert(post_id, stats);
    }

    pub async fn record_like(&self, post_id: Uuid) {
        self.stats.write().await.entry(post_id).or_default().likes += 1;
    }

    pub async fn record_comment(&self, post_id: Uuid) {
        self.stats.write().await.entry(post_id).or_default().comments += 1;
    }
}

#[async_trait]
impl EngagementCounters for InMemoryEngagement {
    async fn stats_for(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, PostStats>, RepoError> {
        let stats = self.stats.read().await;
        Ok(post_ids
            .iter()
            .filter_map(|id| stats.get(id).map(|s| (*id, *s)))
            .collect())
    }

    async fn totals(&self) -> Result<EngagementTotals, RepoError> {
        let stats = self.stats.read().await;
        Ok(stats
            .values()
            .fold(EngagementTotals::default(), |acc, s| EngagementTotals {
                likes: acc.likes + s.likes,
                comments: acc.comments + s.comments,
            }))
    }
}
