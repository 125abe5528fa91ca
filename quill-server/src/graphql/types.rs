//! GraphQL output types

use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};
use quill_core::models::{Post, Tag, User};

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Tag")]
pub struct GqlTag {
    pub id: ID,
    pub name: String,
}

impl From<Tag> for GqlTag {
    fn from(t: Tag) -> Self {
        Self {
            id: ID::from(t.id),
            name: t.name,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Post")]
pub struct GqlPost {
    pub id: ID,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<GqlTag>,
}

impl From<Post> for GqlPost {
    fn from(p: Post) -> Self {
        Self {
            id: ID::from(p.id),
            title: p.title,
            content: p.content,
            category: p.category,
            created_at: p.created_at,
            updated_at: p.updated_at,
            tags: p.tags.into_iter().map(GqlTag::from).collect(),
        }
    }
}

/// A user as exposed to clients; the password hash never leaves the server.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct GqlUser {
    pub id: ID,
    pub username: String,
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for GqlUser {
    fn from(u: User) -> Self {
        Self {
            id: ID::from(u.id),
            username: u.username,
            email: u.email,
            active: u.active,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct DeleteUserPayload {
    pub id: ID,
    pub message: String,
}
