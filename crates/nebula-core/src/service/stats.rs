//! Admin dashboard statistics.

use chrono::{Duration, Utc};
use serde::Serialize;

use super::BlogService;
use crate::domain::PostFilter;
use crate::error::DomainError;
use crate::ports::CategoryCount;

/// Lookback for the "recent activity" counters.
pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
    pub featured_posts: u64,
    pub total_authors: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub posts_by_category: Vec<CategoryCount>,
    pub recent_posts: u64,
    pub recent_authors: u64,
}

impl BlogService {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, DomainError> {
        let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let posts = self.posts();

        let all = PostFilter::default();
        let published = PostFilter::default().published(true);
        let drafts = PostFilter::default().published(false);
        let featured = PostFilter::default().featured(true);
        let recent = PostFilter::default().created_since(since);

        let (total_posts, published_posts, draft_posts, featured_posts, recent_posts) = futures::try_join!(
            posts.count_where(&all),
            posts.count_where(&published),
            posts.count_where(&drafts),
            posts.count_where(&featured),
            posts.count_where(&recent),
        )?;

        let (posts_by_category, total_authors, recent_authors, totals) = futures::try_join!(
            posts.count_by_category(),
            self.authors().count(None),
            self.authors().count(Some(since)),
            self.engagement().totals(),
        )?;

        Ok(DashboardStats {
            total_posts,
            published_posts,
            draft_posts,
            featured_posts,
            total_authors,
            total_likes: totals.likes,
            total_comments: totals.comments,
            posts_by_category,
            recent_posts,
            recent_authors,
        })
    }
}
