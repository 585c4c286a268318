//! Conversions between wire DTOs and domain types.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use nebula_core::domain::{
    Audience, Author, NewPost, Page, PostChanges, PostQuery, PostStats, PostStatus, PostView,
    SortBy,
};
use nebula_core::service::{DashboardStats, PostDetail};
use nebula_shared::dto::{
    AdminListParams, AuthorResponse, CategoryCountResponse, CreatePostRequest,
    DashboardStatsResponse, PaginationResponse, PostDetailResponse, PostListResponse,
    PostResponse, PublicListParams, RecentActivity, RelatedPostResponse, StatsOverview,
    StatsResponse, UpdatePostRequest,
};

use crate::middleware::error::AppResult;

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_sort(raw: Option<&str>) -> AppResult<SortBy> {
    Ok(raw.unwrap_or_default().parse()?)
}

pub fn public_query(params: PublicListParams) -> AppResult<PostQuery> {
    let defaults = PostQuery::public();
    Ok(PostQuery {
        audience: Audience::Public,
        page: params.page.unwrap_or(defaults.page),
        limit: params.limit.unwrap_or(defaults.limit),
        category: params.category,
        search: params.search,
        featured_only: params.featured.unwrap_or(false),
        sort_by: parse_sort(params.sort_by.as_deref())?,
        ..defaults
    })
}

pub fn admin_query(params: AdminListParams) -> AppResult<PostQuery> {
    let defaults = PostQuery::admin();
    let status: PostStatus = params.status.as_deref().unwrap_or_default().parse()?;
    Ok(PostQuery {
        page: params.page.unwrap_or(defaults.page),
        limit: params.limit.unwrap_or(defaults.limit),
        category: params.category,
        status,
        search: params.search,
        sort_by: parse_sort(params.sort_by.as_deref())?,
        ..defaults
    })
}

/// Ids that are not UUIDs cannot name a post and are skipped like unknown ids.
pub fn post_ids(raw: &[String]) -> Vec<Uuid> {
    raw.iter()
        .filter_map(|id| Uuid::parse_str(id.trim()).ok())
        .collect()
}

/// A missing author id becomes the nil id, which validation rejects.
pub fn new_post(req: CreatePostRequest) -> NewPost {
    NewPost {
        title: req.title,
        content: req.content,
        category: req.category,
        author_id: req.author_id.unwrap_or_default(),
        excerpt: req.excerpt,
        tags: req.tags,
        cover_image: req.cover_image,
        read_time: req.read_time,
        published: req.published,
        featured: req.featured,
    }
}

/// `"tags": null` clears the list.
pub fn post_changes(req: UpdatePostRequest) -> PostChanges {
    PostChanges {
        title: req.title,
        excerpt: req.excerpt,
        content: req.content,
        category: req.category,
        tags: req.tags.map(Option::unwrap_or_default),
        cover_image: req.cover_image,
        read_time: req.read_time,
        published: req.published,
        featured: req.featured,
    }
}

fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        name: author.name,
        email: author.email,
        avatar: author.avatar,
    }
}

fn stats(stats: PostStats) -> StatsResponse {
    StatsResponse {
        views: stats.views,
        likes: stats.likes,
        comments: stats.comments,
        shares: stats.shares,
    }
}

pub fn post(view: PostView) -> PostResponse {
    let PostView {
        post,
        author: post_author,
        stats: post_stats,
    } = view;

    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        content: post.content,
        category: post.category,
        tags: post.tags,
        cover_image: post.cover_image,
        published: post.published,
        featured: post.featured,
        read_time: post.read_time,
        created_at: timestamp(post.created_at),
        updated_at: timestamp(post.updated_at),
        author: post_author.map(author),
        stats: stats(post_stats),
    }
}

fn related(view: PostView) -> RelatedPostResponse {
    let PostView {
        post,
        author: post_author,
        ..
    } = view;

    RelatedPostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        cover_image: post.cover_image,
        category: post.category,
        read_time: post.read_time,
        created_at: timestamp(post.created_at),
        author: post_author.map(author),
    }
}

pub fn post_detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.post),
        related_posts: detail.related.into_iter().map(related).collect(),
    }
}

pub fn post_list(page: Page<PostView>) -> PostListResponse {
    PostListResponse {
        posts: page.items.into_iter().map(post).collect(),
        pagination: PaginationResponse {
            page: page.pagination.page,
            limit: page.pagination.limit,
            total: page.pagination.total,
            pages: page.pagination.pages,
        },
    }
}

pub fn dashboard(stats: DashboardStats) -> DashboardStatsResponse {
    DashboardStatsResponse {
        overview: StatsOverview {
            total_posts: stats.total_posts,
            published_posts: stats.published_posts,
            draft_posts: stats.draft_posts,
            featured_posts: stats.featured_posts,
            total_users: stats.total_authors,
            total_comments: stats.total_comments,
            total_likes: stats.total_likes,
        },
        posts_by_category: stats
            .posts_by_category
            .into_iter()
            .map(|c| CategoryCountResponse {
                category: c.category,
                count: c.count,
            })
            .collect(),
        recent_activity: RecentActivity {
            recent_posts: stats.recent_posts,
            recent_users: stats.recent_authors,
        },
    }
}
