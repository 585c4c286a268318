//! Query engine: filtering, ordering and pagination of blog posts.
//!
//! Everything here is a pure function of its inputs. Stores translate
//! [`PostFilter`] and [`PostOrder`] into their own query language; [`run_query`]
//! is the reference evaluation over an in-memory slice.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BlogPost, PostView};
use crate::error::DomainError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Which caller is listing posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Audience {
    /// Public blog: published posts only, featured posts first.
    Public,
    /// Admin console: every post, search also covers the body.
    #[default]
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    All,
    Published,
    Draft,
    Featured,
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            "published" => Ok(Self::Published),
            "draft" => Ok(Self::Draft),
            "featured" => Ok(Self::Featured),
            other => Err(DomainError::invalid(format!("unknown status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Views,
    Likes,
    Comments,
}

impl FromStr for SortBy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            "views" => Ok(Self::Views),
            "likes" => Ok(Self::Likes),
            "comments" => Ok(Self::Comments),
            other => Err(DomainError::invalid(format!("unknown sortBy '{}'", other))),
        }
    }
}

impl SortBy {
    /// Column a store can order by directly, or `None` when the key lives in
    /// engagement data joined after the fact.
    pub fn store_field(self) -> Option<OrderField> {
        match self {
            SortBy::CreatedAt => Some(OrderField::CreatedAt),
            SortBy::UpdatedAt => Some(OrderField::UpdatedAt),
            SortBy::Title => Some(OrderField::Title),
            SortBy::Views | SortBy::Likes | SortBy::Comments => None,
        }
    }

    pub fn compare(self, a: &PostView, b: &PostView) -> Ordering {
        match self.store_field() {
            Some(field) => field.compare(&a.post, &b.post),
            None => {
                let key = |v: &PostView| match self {
                    SortBy::Views => v.stats.views,
                    SortBy::Likes => v.stats.likes,
                    _ => v.stats.comments,
                };
                key(b).cmp(&key(a))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    CreatedAt,
    UpdatedAt,
    Title,
}

impl OrderField {
    /// Title ascending, timestamps most recent first.
    pub fn compare(self, a: &BlogPost, b: &BlogPost) -> Ordering {
        match self {
            OrderField::CreatedAt => b.created_at.cmp(&a.created_at),
            OrderField::UpdatedAt => b.updated_at.cmp(&a.updated_at),
            OrderField::Title => a.title.cmp(&b.title),
        }
    }
}

/// Ordering a store applies to its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOrder {
    pub featured_first: bool,
    pub field: OrderField,
}

impl PostOrder {
    pub fn newest() -> Self {
        Self {
            featured_first: false,
            field: OrderField::CreatedAt,
        }
    }

    pub fn compare(&self, a: &BlogPost, b: &BlogPost) -> Ordering {
        featured_partition(self.featured_first, a, b).then_with(|| self.field.compare(a, b))
    }
}

fn featured_partition(enabled: bool, a: &BlogPost, b: &BlogPost) -> Ordering {
    if enabled {
        b.featured.cmp(&a.featured)
    } else {
        Ordering::Equal
    }
}

/// Case-insensitive substring search over title and excerpt, optionally content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
    include_content: bool,
}

impl SearchTerm {
    /// `None` for an empty term, which disables searching.
    pub fn new(raw: &str, include_content: bool) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            needle: raw.to_lowercase(),
            include_content,
        })
    }

    /// The lower-cased search term.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn include_content(&self) -> bool {
        self.include_content
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(&self.needle);
        hit(&post.title)
            || post.excerpt.as_deref().is_some_and(hit)
            || (self.include_content && hit(&post.content))
    }
}

/// Conjunction of predicates over posts. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub search: Option<SearchTerm>,
    pub created_since: Option<DateTime<Utc>>,
    pub exclude_id: Option<Uuid>,
}

impl PostFilter {
    pub fn published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn created_since(mut self, since: DateTime<Utc>) -> Self {
        self.created_since = Some(since);
        self
    }

    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        self.published.is_none_or(|p| post.published == p)
            && self.featured.is_none_or(|f| post.featured == f)
            && self.category.as_ref().is_none_or(|c| &post.category == c)
            && self.search.as_ref().is_none_or(|s| s.matches(post))
            && self.created_since.is_none_or(|t| post.created_at >= t)
            && self.exclude_id.is_none_or(|id| post.id != id)
    }
}

/// Raw listing parameters as a caller supplies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub audience: Audience,
    pub page: i64,
    pub limit: i64,
    pub category: Option<String>,
    pub status: PostStatus,
    pub search: Option<String>,
    pub featured_only: bool,
    pub sort_by: SortBy,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            audience: Audience::Admin,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            category: None,
            status: PostStatus::All,
            search: None,
            featured_only: false,
            sort_by: SortBy::CreatedAt,
        }
    }
}

impl PostQuery {
    pub fn public() -> Self {
        Self {
            audience: Audience::Public,
            ..Self::default()
        }
    }

    pub fn admin() -> Self {
        Self::default()
    }

    /// Check page bounds and build the store-level filter.
    ///
    /// `limit` above `max_limit` is clamped rather than rejected.
    pub fn validate(self, max_limit: u64) -> Result<ValidQuery, DomainError> {
        if self.page < 1 {
            return Err(DomainError::invalid("page must be at least 1"));
        }
        if self.limit < 1 {
            return Err(DomainError::invalid("limit must be at least 1"));
        }
        let public = self.audience == Audience::Public;
        if public && self.status == PostStatus::Draft {
            return Err(DomainError::invalid(
                "draft posts are not listed on the public blog",
            ));
        }

        let mut filter = PostFilter::default();
        if public {
            filter.published = Some(true);
        }
        match self.status {
            PostStatus::All => {}
            PostStatus::Published => filter.published = Some(true),
            PostStatus::Draft => filter.published = Some(false),
            PostStatus::Featured => filter.featured = Some(true),
        }
        if self.featured_only {
            filter.featured = Some(true);
        }
        filter.category = self
            .category
            .filter(|c| !c.is_empty() && c != ALL_CATEGORIES);
        filter.search = self
            .search
            .as_deref()
            .and_then(|s| SearchTerm::new(s, !public));

        Ok(ValidQuery {
            page: self.page as u64,
            limit: (self.limit as u64).min(max_limit.max(1)),
            filter,
            sort_by: self.sort_by,
            featured_first: public,
        })
    }
}

/// A listing request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuery {
    pub page: u64,
    pub limit: u64,
    pub filter: PostFilter,
    pub sort_by: SortBy,
    pub featured_first: bool,
}

impl ValidQuery {
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Ordering a store can apply itself, if the sort key is a post column.
    pub fn store_order(&self) -> Option<PostOrder> {
        self.sort_by.store_field().map(|field| PostOrder {
            featured_first: self.featured_first,
            field,
        })
    }

    pub fn compare(&self, a: &PostView, b: &PostView) -> Ordering {
        featured_partition(self.featured_first, &a.post, &b.post)
            .then_with(|| self.sort_by.compare(a, b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// One page of results plus the pagination summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Slice an already ordered sequence. Out-of-range pages are empty.
pub fn paginate<T>(items: Vec<T>, page: u64, limit: u64) -> Page<T> {
    let total = items.len() as u64;
    let skip = usize::try_from((page.max(1) - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);

    Page {
        items: items.into_iter().skip(skip).take(take).collect(),
        pagination: Pagination::new(page, limit, total),
    }
}

/// Filter, stably sort and paginate `posts` without touching the input.
pub fn run_query(posts: &[PostView], query: &ValidQuery) -> Page<PostView> {
    let mut matching: Vec<&PostView> = posts
        .iter()
        .filter(|v| query.filter.matches(&v.post))
        .collect();
    matching.sort_by(|a, b| query.compare(a, b));

    let page = paginate(matching, query.page, query.limit);
    Page {
        items: page.items.into_iter().cloned().collect(),
        pagination: page.pagination,
    }
}
