//! Read-only collaborators joined onto posts for display.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Author, PostStats};
use crate::error::RepoError;

/// Author lookup.
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    /// Authors for the given ids. Unknown ids are absent from the map.
    async fn find_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Author>, RepoError>;

    /// Registered authors, optionally only those created at or after `since`.
    async fn count(&self, since: Option<DateTime<Utc>>) -> Result<u64, RepoError>;
}

/// Site-wide engagement totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementTotals {
    pub likes: u64,
    pub comments: u64,
}

/// Aggregate engagement counts owned by other entities (likes, comments).
#[async_trait]
pub trait EngagementCounters: Send + Sync {
    /// Stats per post id. Posts without any engagement may be absent.
    async fn stats_for(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, PostStats>, RepoError>;

    async fn totals(&self) -> Result<EngagementTotals, RepoError>;
}
