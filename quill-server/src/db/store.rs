//! `PostStore` over an open PostgreSQL transaction

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_core::models::{NewPost, PostPatch, PostRecord, Tag, TagId};
use quill_core::{PostStore, StoreError, StoreResult};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use super::error::store_error;

/// Post row as selected from `posts`
#[derive(Debug, Clone, FromRow)]
struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostRow> for PostRecord {
    fn from(r: PostRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            content: r.content,
            category: r.category,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Tag row as selected from `tags`
#[derive(Debug, Clone, FromRow)]
struct TagRow {
    pub id: TagId,
    pub name: String,
}

impl From<TagRow> for Tag {
    fn from(r: TagRow) -> Self {
        Tag::new(r.id, r.name)
    }
}

const POST_COLUMNS: &str = "id, title, content, category, created_at, updated_at";

const TAGS_FOR_POST: &str = r#"
    SELECT t.id, t.name
    FROM tags t
    JOIN post_tags pt ON t.id = pt.tag_id
    WHERE pt.post_id = $1
    ORDER BY t.id
"#;

/// Store handle borrowing the connection of one transaction.
///
/// ```ignore
/// let mut tx = pool.begin().await?;
/// let post = reconcile::create_post(&mut PgPostStore::new(&mut *tx), &new_post).await?;
/// tx.commit().await?;
/// ```
pub struct PgPostStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgPostStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c> PostStore for PgPostStore<'c> {
    async fn insert_post(&mut self, post: &NewPost) -> StoreResult<PostRecord> {
        let row: PostRow = sqlx::query_as(&format!(
            "INSERT INTO posts (title, content, category) VALUES ($1, $2, $3) RETURNING {POST_COLUMNS}"
        ))
        .bind(post.title.as_str())
        .bind(&post.content)
        .bind(post.category.as_str())
        .fetch_one(&mut *self.conn)
        .await
        .map_err(store_error)?;

        Ok(row.into())
    }

    async fn lock_post(&mut self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        let row: Option<PostRow> = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(store_error)?;

        Ok(row.map(Into::into))
    }

    async fn update_post(&mut self, id: Uuid, patch: &PostPatch) -> StoreResult<PostRecord> {
        // COALESCE keeps the stored value when a field is not supplied
        let row: Option<PostRow> = sqlx::query_as(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($1, title),
                content = COALESCE($2, content),
                category = COALESCE($3, category),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(patch.title.as_ref().map(|t| t.as_str()))
        .bind(patch.content.as_deref())
        .bind(patch.category.as_ref().map(|c| c.as_str()))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(store_error)?;

        row.map(Into::into)
            .ok_or_else(|| StoreError::not_found("post", id))
    }

    async fn delete_post(&mut self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_tag_by_name(&mut self, name: &str) -> StoreResult<Option<TagId>> {
        sqlx::query_scalar("SELECT id FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(store_error)
    }

    async fn insert_tag(&mut self, name: &str) -> StoreResult<TagId> {
        // Upsert so a concurrent creator of the same name doesn't fail us
        sqlx::query_scalar(
            r#"
            INSERT INTO tags (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(store_error)
    }

    async fn ensure_tag(&mut self, id: TagId) -> StoreResult<bool> {
        let inserted: Option<TagId> = sqlx::query_scalar(
            "INSERT INTO tags (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING id",
        )
        .bind(id)
        .bind(Tag::placeholder_name(id))
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(store_error)?;

        if inserted.is_some() {
            // Explicit ids bypass the sequence; move it past them
            sqlx::query(
                "SELECT setval(pg_get_serial_sequence('tags', 'id'), GREATEST((SELECT MAX(id) FROM tags), 1))",
            )
            .execute(&mut *self.conn)
            .await
            .map_err(store_error)?;
            return Ok(true);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(store_error)?;

        if exists {
            Ok(false)
        } else {
            // the placeholder name is taken by another tag
            Err(StoreError::constraint("tags_name_key"))
        }
    }

    async fn linked_tag_ids(&mut self, post_id: Uuid) -> StoreResult<Vec<TagId>> {
        sqlx::query_scalar("SELECT tag_id FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(store_error)
    }

    async fn link_tag(&mut self, post_id: Uuid, tag_id: TagId) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(&mut *self.conn)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn unlink_tags(&mut self, post_id: Uuid, tag_ids: &[TagId]) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM post_tags WHERE post_id = $1 AND tag_id = ANY($2)")
            .bind(post_id)
            .bind(tag_ids)
            .execute(&mut *self.conn)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected())
    }

    async fn unlink_all(&mut self, post_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *self.conn)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected())
    }

    async fn tags_for_post(&mut self, post_id: Uuid) -> StoreResult<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(TAGS_FOR_POST)
            .bind(post_id)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
