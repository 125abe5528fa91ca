use async_graphql::{Context, Object, Result, ID};
use quill_core::models::{
    parse_tag_id, Category, Email, NewPost, Password, PostPatch, PostTitle, TagId, UserPatch,
    Username, ValidationError,
};
use sqlx::PgPool;

use super::error::{parse_uuid, ApiError};
use super::types::{DeleteUserPayload, GqlPost, GqlUser};
use crate::db::{PostRepo, UserRepo};
use crate::password::hash_password_blocking;

pub const USER_DELETED_MESSAGE: &str = "User successfully deleted";

fn tag_ids(ids: &[ID]) -> Result<Vec<TagId>, ValidationError> {
    ids.iter().map(|id| parse_tag_id(id.as_str())).collect()
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a post, creating any named tag that doesn't exist yet.
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
        category: String,
        tags: Vec<String>,
    ) -> Result<GqlPost> {
        let new_post = NewPost::new(&title, &content, &category, &tags).map_err(ApiError::from)?;
        let pool = ctx.data::<PgPool>()?;

        let post = PostRepo::new(pool)
            .create(&new_post)
            .await
            .map_err(ApiError::from)?;
        Ok(post.into())
    }

    /// Update a post. Omitted fields are kept; `tags`, when given, is the
    /// complete desired set of tag ids.
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        content: Option<String>,
        category: Option<String>,
        tags: Option<Vec<ID>>,
    ) -> Result<GqlPost> {
        let id = parse_uuid("post", &id)?;
        let patch = PostPatch {
            title: title.as_deref().map(PostTitle::new).transpose().map_err(ApiError::from)?,
            content,
            category: category.as_deref().map(Category::new).transpose().map_err(ApiError::from)?,
            tags: tags.as_deref().map(tag_ids).transpose().map_err(ApiError::from)?,
        };
        let pool = ctx.data::<PgPool>()?;

        let post = PostRepo::new(pool)
            .update(id, &patch)
            .await
            .map_err(ApiError::from)?;
        Ok(post.into())
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let id = parse_uuid("post", &id)?;
        let pool = ctx.data::<PgPool>()?;

        PostRepo::new(pool).delete(id).await.map_err(ApiError::from)?;
        Ok(true)
    }

    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> Result<GqlUser> {
        let username = Username::new(&username).map_err(ApiError::from)?;
        let email = Email::new(&email).map_err(ApiError::from)?;
        let password = Password::new(&password).map_err(ApiError::from)?;
        let pool = ctx.data::<PgPool>()?;

        let hash = hash_password_blocking(password).await.map_err(ApiError::from)?;
        let user = UserRepo::new(pool)
            .create(&username, &email, &hash)
            .await
            .map_err(ApiError::from)?;
        Ok(user.into())
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        username: Option<String>,
        email: Option<String>,
    ) -> Result<GqlUser> {
        let id = parse_uuid("user", &id)?;
        let patch = UserPatch {
            username: username.as_deref().map(Username::new).transpose().map_err(ApiError::from)?,
            email: email.as_deref().map(Email::new).transpose().map_err(ApiError::from)?,
        };
        let pool = ctx.data::<PgPool>()?;

        let user = UserRepo::new(pool)
            .update(id, &patch)
            .await
            .map_err(ApiError::from)?;
        Ok(user.into())
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<DeleteUserPayload> {
        let id = parse_uuid("user", &id)?;
        let pool = ctx.data::<PgPool>()?;

        let deleted = UserRepo::new(pool).delete(id).await.map_err(ApiError::from)?;
        Ok(DeleteUserPayload {
            id: ID::from(deleted),
            message: USER_DELETED_MESSAGE.to_owned(),
        })
    }
}
