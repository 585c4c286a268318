//! PostgreSQL author directory and engagement counters.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use nebula_core::domain::{Author, PostStats};
use nebula_core::error::RepoError;
use nebula_core::ports::{AuthorDirectory, EngagementCounters, EngagementTotals};

use super::entity::{comment, like, user};
use super::query_err;

pub struct PostgresAuthorDirectory {
    db: DbConn,
}

impl PostgresAuthorDirectory {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorDirectory for PostgresAuthorDirectory {
    async fn find_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Author>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows
            .into_iter()
            .map(|model| (model.id, Author::from(model)))
            .collect())
    }

    async fn count(&self, since: Option<DateTime<Utc>>) -> Result<u64, RepoError> {
        let mut select = user::Entity::find();
        if let Some(since) = since {
            select = select.filter(user::Column::CreatedAt.gte(since));
        }
        select.count(&self.db).await.map_err(query_err)
    }
}

/// Engagement counters backed by the `likes` and `comments` tables.
///
/// No view or share counter is persisted, so both always read as zero.
pub struct PostgresEngagement {
    db: DbConn,
}

impl PostgresEngagement {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EngagementCounters for PostgresEngagement {
    async fn stats_for(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, PostStats>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let likes: Vec<(Uuid, i64)> = like::Entity::find()
            .select_only()
            .column(like::Column::PostId)
            .column_as(Expr::col(like::Column::Id).count(), "count")
            .filter(like::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(like::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let comments: Vec<(Uuid, i64)> = comment::Entity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "count")
            .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(comment::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let mut stats: HashMap<Uuid, PostStats> = HashMap::new();
        for (post_id, count) in likes {
            stats.entry(post_id).or_default().likes = count.max(0) as u64;
        }
        for (post_id, count) in comments {
            stats.entry(post_id).or_default().comments = count.max(0) as u64;
        }
        Ok(stats)
    }

    async fn totals(&self) -> Result<EngagementTotals, RepoError> {
        let likes = like::Entity::find()
            .count(&self.db)
            .await
            .map_err(query_err)?;
        let comments = comment::Entity::find()
            .count(&self.db)
            .await
            .map_err(query_err)?;

        Ok(EngagementTotals { likes, comments })
    }
}
