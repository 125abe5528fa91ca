//! Posts, their inputs and the joined row shape used for list queries

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::tag::{Tag, TagId, TagName};
use super::validation::{bounded_text, ValidationError};

/// Maximum length for post titles
const MAX_TITLE_LEN: usize = 256;

/// Maximum length for categories
const MAX_CATEGORY_LEN: usize = 64;

/// Validated post title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "title", MAX_TITLE_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated post category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category(String);

impl Category {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "category", MAX_CATEGORY_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Post scalar columns as stored, without tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRecord {
    /// Attach a tag list, producing a hydrated post.
    pub fn with_tags(self, tags: Vec<Tag>) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            category: self.category,
            created_at: self.created_at,
            updated_at: self.updated_at,
            tags,
        }
    }
}

/// Post with its tags hydrated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
}

/// Validated input for creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: PostTitle,
    pub content: String,
    pub category: Category,
    pub tags: Vec<TagName>,
}

impl NewPost {
    /// Validate raw create arguments.
    pub fn new(
        title: &str,
        content: &str,
        category: &str,
        tags: &[String],
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: PostTitle::new(title)?,
            content: content.to_owned(),
            category: Category::new(category)?,
            tags: tags
                .iter()
                .map(|t| TagName::new(t))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Partial update of a post.
///
/// `None` scalars keep the stored value. `tags: None` leaves the tag
/// association untouched; `Some(vec![])` removes every tag.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<PostTitle>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<TagId>>,
}

/// One row of `posts LEFT JOIN post_tags LEFT JOIN tags`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTagRow {
    pub post_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tag_id: Option<TagId>,
    pub tag_name: Option<String>,
}

impl PostTagRow {
    pub(crate) fn to_post(&self) -> Post {
        Post {
            id: self.post_id,
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            tags: Vec::new(),
        }
    }

    pub(crate) fn tag(&self) -> Option<Tag> {
        self.tag_id.map(|id| Tag {
            id,
            name: self
                .tag_name
                .clone()
                .unwrap_or_else(|| Tag::placeholder_name(id)),
        })
    }
}
