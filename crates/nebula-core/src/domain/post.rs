use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Blog post entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub read_time: Option<i32>,
    pub published: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Create a new post from validated input, assigning id, slug and timestamps.
    pub fn create(input: NewPost) -> Result<Self, DomainError> {
        input.validate()?;
        let now = Utc::now().trunc_subsecs(6);
        let slug = slugify(&input.title);

        Ok(Self {
            id: Uuid::new_v4(),
            author_id: input.author_id,
            title: input.title,
            slug,
            excerpt: input.excerpt,
            content: input.content,
            category: input.category,
            tags: input.tags.unwrap_or_default(),
            cover_image: input.cover_image,
            read_time: input.read_time,
            published: input.published.unwrap_or(false),
            featured: input.featured.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Fields accepted when creating a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_id: Uuid,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
    pub read_time: Option<i32>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_title(&self.title)?;
        validate_required("content", &self.content)?;
        validate_required("category", &self.category)?;
        if self.author_id.is_nil() {
            return Err(DomainError::invalid("authorId is required"));
        }
        Ok(())
    }
}

/// Explicit field update set for partial updates.
///
/// `None` leaves a field untouched. For nullable columns the inner `Option`
/// distinguishes "set to this value" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<Option<String>>,
    pub read_time: Option<Option<i32>>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
}

impl PostChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn excerpt(mut self, excerpt: Option<String>) -> Self {
        self.excerpt = Some(excerpt);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn cover_image(mut self, cover_image: Option<String>) -> Self {
        self.cover_image = Some(cover_image);
        self
    }

    pub fn read_time(mut self, read_time: Option<i32>) -> Self {
        self.read_time = Some(read_time);
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_required("content", content)?;
        }
        if let Some(category) = &self.category {
            validate_required("category", category)?;
        }
        Ok(())
    }

    /// The slug to store alongside a changed title.
    pub fn slug(&self) -> Option<String> {
        self.title.as_deref().map(slugify)
    }

    /// Apply the supplied fields to `post` and refresh `updated_at`.
    pub fn apply_to(&self, post: &mut BlogPost) {
        if let Some(title) = &self.title {
            post.title = title.clone();
            post.slug = slugify(title);
        }
        if let Some(excerpt) = &self.excerpt {
            post.excerpt = excerpt.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(category) = &self.category {
            post.category = category.clone();
        }
        if let Some(tags) = &self.tags {
            post.tags = tags.clone();
        }
        if let Some(cover_image) = &self.cover_image {
            post.cover_image = cover_image.clone();
        }
        if let Some(read_time) = self.read_time {
            post.read_time = read_time;
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        if let Some(featured) = self.featured {
            post.featured = featured;
        }
        post.updated_at = next_update_time(post.updated_at);
    }
}

/// Lookup key for a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKey {
    Id(Uuid),
    Slug(String),
}

impl PostKey {
    /// Interpret `raw` as an id when it parses as one, otherwise as a slug.
    pub fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Slug(raw.to_string()),
        }
    }
}

impl std::fmt::Display for PostKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostKey::Id(id) => write!(f, "{}", id),
            PostKey::Slug(slug) => write!(f, "{}", slug),
        }
    }
}

/// Derive a URL-safe slug: lower-cased, runs of non-alphanumerics collapsed to a
/// single hyphen, no leading or trailing hyphen.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Serialize tags for storage. An empty list is stored as null.
pub fn encode_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    serde_json::to_string(tags).ok()
}

/// Read stored tags back. Null reads as an empty list.
pub fn decode_tags(raw: Option<&str>) -> Result<Vec<String>, serde_json::Error> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) if s.trim().is_empty() => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s),
    }
}

/// Timestamp for a mutation that must sort strictly after `previous`.
///
/// Truncated to microseconds, the precision of the backing store.
pub fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    if now > previous {
        now
    } else {
        previous.trunc_subsecs(6) + Duration::microseconds(1)
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    validate_required("title", title)?;
    if slugify(title).is_empty() {
        return Err(DomainError::invalid(
            "title must contain at least one letter or digit",
        ));
    }
    Ok(())
}

fn validate_required(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid(format!("{} is required", field)));
    }
    Ok(())
}
