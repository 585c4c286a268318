//! PostgreSQL post store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use nebula_core::domain::{
    BlogPost, FlagUpdate, OrderField, PostChanges, PostFilter, PostKey, PostOrder, encode_tags,
    next_update_time, slugify,
};
use nebula_core::error::RepoError;
use nebula_core::ports::{CategoryCount, PostStore};

use super::entity::blog_post::{self, Column, Entity as PostEntity};
use super::query_err;

/// Ids per statement for bulk writes.
pub const BULK_CHUNK_SIZE: usize = 500;

/// PostgreSQL post store.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Translate a filter into a SQL condition.
fn condition(filter: &PostFilter) -> Condition {
    let mut cond = Condition::all();

    if let Some(published) = filter.published {
        cond = cond.add(Column::Published.eq(published));
    }
    if let Some(featured) = filter.featured {
        cond = cond.add(Column::Featured.eq(featured));
    }
    if let Some(category) = &filter.category {
        cond = cond.add(Column::Category.eq(category.as_str()));
    }
    if let Some(since) = filter.created_since {
        cond = cond.add(Column::CreatedAt.gte(since));
    }
    if let Some(id) = filter.exclude_id {
        cond = cond.add(Column::Id.ne(id));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search.needle()));
        let lower_like = |col: Column| {
            Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern.clone()).escape('\\'))
        };

        let mut any = Condition::any()
            .add(lower_like(Column::Title))
            .add(lower_like(Column::Excerpt));
        if search.include_content() {
            any = any.add(lower_like(Column::Content));
        }
        cond = cond.add(any);
    }

    cond
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn ordered(mut select: Select<PostEntity>, order: &PostOrder) -> Select<PostEntity> {
    if order.featured_first {
        select = select.order_by_desc(Column::Featured);
    }
    select = match order.field {
        OrderField::CreatedAt => select.order_by_desc(Column::CreatedAt),
        OrderField::UpdatedAt => select.order_by_desc(Column::UpdatedAt),
        OrderField::Title => select.order_by_asc(Column::Title),
    };
    // Rows have no intrinsic order; fall back to creation then id.
    select
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
}

fn write_err(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("A post with this slug already exists".to_string())
    } else {
        query_err(e)
    }
}

/// Stop a chunked write: partial if earlier chunks landed, plain failure otherwise.
fn chunk_err(e: DbErr, affected: u64) -> RepoError {
    if affected == 0 {
        query_err(e)
    } else {
        RepoError::Partial {
            affected,
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn find(
        &self,
        filter: &PostFilter,
        order: &PostOrder,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<(Vec<BlogPost>, u64), RepoError> {
        let select = PostEntity::find().filter(condition(filter));

        let total = select.clone().count(&self.db).await.map_err(query_err)?;

        let rows = ordered(select, order)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn find_one(&self, key: &PostKey) -> Result<Option<BlogPost>, RepoError> {
        let select = match key {
            PostKey::Id(id) => PostEntity::find_by_id(*id),
            PostKey::Slug(slug) => PostEntity::find().filter(Column::Slug.eq(slug.as_str())),
        };

        let result = select.one(&self.db).await.map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn insert(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let active_model: blog_post::ActiveModel = post.into();
        let model = active_model.insert(&self.db).await.map_err(write_err)?;
        Ok(model.into())
    }

    async fn update_fields(&self, id: Uuid, changes: &PostChanges) -> Result<BlogPost, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .ok_or(RepoError::NotFound)?;

        let previous: DateTime<Utc> = model.updated_at.into();
        let mut active: blog_post::ActiveModel = model.into();

        if let Some(title) = &changes.title {
            active.title = Set(title.clone());
            active.slug = Set(slugify(title));
        }
        if let Some(excerpt) = &changes.excerpt {
            active.excerpt = Set(excerpt.clone());
        }
        if let Some(content) = &changes.content {
            active.content = Set(content.clone());
        }
        if let Some(category) = &changes.category {
            active.category = Set(category.clone());
        }
        if let Some(tags) = &changes.tags {
            active.tags = Set(encode_tags(tags));
        }
        if let Some(cover_image) = &changes.cover_image {
            active.cover_image = Set(cover_image.clone());
        }
        if let Some(read_time) = changes.read_time {
            active.read_time = Set(read_time);
        }
        if let Some(published) = changes.published {
            active.published = Set(published);
        }
        if let Some(featured) = changes.featured {
            active.featured = Set(featured);
        }
        active.updated_at = Set(next_update_time(previous).into());

        let updated = active.update(&self.db).await.map_err(write_err)?;
        Ok(updated.into())
    }

    async fn delete_one(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        let mut affected = 0;
        for chunk in ids.chunks(BULK_CHUNK_SIZE) {
            let result = PostEntity::delete_many()
                .filter(Column::Id.is_in(chunk.iter().copied()))
                .exec(&self.db)
                .await
                .map_err(|e| chunk_err(e, affected))?;
            affected += result.rows_affected;
        }
        Ok(affected)
    }

    async fn update_many(&self, ids: &[Uuid], flags: FlagUpdate) -> Result<u64, RepoError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = next_update_time(Utc::now()).into();

        let mut affected = 0;
        for chunk in ids.chunks(BULK_CHUNK_SIZE) {
            let mut update = PostEntity::update_many()
                .col_expr(Column::UpdatedAt, Expr::value(now))
                .filter(Column::Id.is_in(chunk.iter().copied()));
            if let Some(published) = flags.published {
                update = update.col_expr(Column::Published, Expr::value(published));
            }
            if let Some(featured) = flags.featured {
                update = update.col_expr(Column::Featured, Expr::value(featured));
            }

            let result = update
                .exec(&self.db)
                .await
                .map_err(|e| chunk_err(e, affected))?;
            affected += result.rows_affected;
        }
        Ok(affected)
    }

    async fn count_where(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(condition(filter))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn count_by_category(&self) -> Result<Vec<CategoryCount>, RepoError> {
        let rows: Vec<(String, i64)> = PostEntity::find()
            .select_only()
            .column(Column::Category)
            .column_as(Expr::col(Column::Id).count(), "count")
            .group_by(Column::Category)
            .order_by_asc(Column::Category)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category,
                count: count.max(0) as u64,
            })
            .collect())
    }
}
