use serde::{Deserialize, Serialize};

use super::{Author, BlogPost};

/// Engagement numbers attached to a post when it is rendered.
///
/// `likes` and `comments` are aggregates owned by other tables. `views` and `shares`
/// are whatever the engagement source reports; nothing here invents them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// A post joined with its author and engagement stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub post: BlogPost,
    pub author: Option<Author>,
    pub stats: PostStats,
}

impl PostView {
    pub fn bare(post: BlogPost) -> Self {
        Self {
            post,
            author: None,
            stats: PostStats::default(),
        }
    }
}
