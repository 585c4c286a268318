use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{BlogPost, next_update_time};
use crate::error::DomainError;

/// A state change applied uniformly to a set of posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Delete,
    Publish,
    Unpublish,
    Feature,
    Unfeature,
}

impl BulkAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BulkAction::Delete => "delete",
            BulkAction::Publish => "publish",
            BulkAction::Unpublish => "unpublish",
            BulkAction::Feature => "feature",
            BulkAction::Unfeature => "unfeature",
        }
    }

    /// Flag writes for the non-destructive actions; `None` for delete.
    pub fn flag_update(self) -> Option<FlagUpdate> {
        match self {
            BulkAction::Delete => None,
            BulkAction::Publish => Some(FlagUpdate::published(true)),
            BulkAction::Unpublish => Some(FlagUpdate::published(false)),
            BulkAction::Feature => Some(FlagUpdate::featured(true)),
            BulkAction::Unfeature => Some(FlagUpdate::featured(false)),
        }
    }

    /// Past-tense verb for user-facing messages.
    pub fn past_tense(self) -> &'static str {
        match self {
            BulkAction::Delete => "Deleted",
            BulkAction::Publish => "Published",
            BulkAction::Unpublish => "Unpublished",
            BulkAction::Feature => "Featured",
            BulkAction::Unfeature => "Unfeatured",
        }
    }
}

impl FromStr for BulkAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete" => Ok(Self::Delete),
            "publish" => Ok(Self::Publish),
            "unpublish" => Ok(Self::Unpublish),
            "feature" => Ok(Self::Feature),
            "unfeature" => Ok(Self::Unfeature),
            other => Err(DomainError::invalid(format!(
                "unknown bulk action '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publish/feature flags written by a bulk update. Unset flags are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagUpdate {
    pub published: Option<bool>,
    pub featured: Option<bool>,
}

impl FlagUpdate {
    pub fn published(value: bool) -> Self {
        Self {
            published: Some(value),
            featured: None,
        }
    }

    pub fn featured(value: bool) -> Self {
        Self {
            published: None,
            featured: Some(value),
        }
    }

    pub fn apply_to(&self, post: &mut BlogPost) {
        if let Some(published) = self.published {
            post.published = published;
        }
        if let Some(featured) = self.featured {
            post.featured = featured;
        }
        post.updated_at = next_update_time(post.updated_at);
    }
}

/// Result of a bulk operation: how many posts were actually affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub action: BulkAction,
    pub affected: u64,
}
