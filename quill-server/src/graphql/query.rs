use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, Utc};
use quill_core::models::PageRequest;
use sqlx::PgPool;

use super::error::{parse_uuid, ApiError};
use super::types::{GqlPost, GqlUser};
use crate::db::{PostRepo, UserRepo};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// A single post with its tags.
    async fn get_post(&self, ctx: &Context<'_>, id: ID) -> Result<GqlPost> {
        let id = parse_uuid("post", &id)?;
        let pool = ctx.data::<PgPool>()?;

        let post = PostRepo::new(pool).get(id).await.map_err(ApiError::from)?;
        Ok(post.into())
    }

    /// Posts created strictly after `after`, oldest first. `limit` defaults
    /// to 20 and is capped at 100; a negative limit is rejected.
    async fn get_posts(
        &self,
        ctx: &Context<'_>,
        after: Option<DateTime<Utc>>,
        limit: Option<i32>,
    ) -> Result<Vec<GqlPost>> {
        let page = PageRequest::from_args(after, limit).map_err(ApiError::from)?;
        let pool = ctx.data::<PgPool>()?;

        let posts = PostRepo::new(pool).list(page).await.map_err(ApiError::from)?;
        Ok(posts.into_iter().map(GqlPost::from).collect())
    }

    async fn get_user(&self, ctx: &Context<'_>, id: ID) -> Result<GqlUser> {
        let id = parse_uuid("user", &id)?;
        let pool = ctx.data::<PgPool>()?;

        let user = UserRepo::new(pool).get(id).await.map_err(ApiError::from)?;
        Ok(user.into())
    }
}
