//! Post repository
//!
//! Reads go straight to the pool with a single JOIN query each.
//! Writes open a transaction and hand a [`PgPostStore`] to the
//! reconciler in `quill_core::reconcile`; the transaction is committed
//! only when every step succeeded.

use chrono::{DateTime, Utc};
use quill_core::models::{NewPost, PageRequest, Post, PostPatch, PostTagRow, TagId};
use quill_core::{flatten_page, flatten_rows, reconcile};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::error::DbError;
use crate::db::store::PgPostStore;

/// One row of the posts/tags join
#[derive(Debug, FromRow)]
struct JoinedRow {
    post_id: Uuid,
    title: String,
    content: String,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    tag_id: Option<TagId>,
    tag_name: Option<String>,
}

impl From<JoinedRow> for PostTagRow {
    fn from(r: JoinedRow) -> Self {
        Self {
            post_id: r.post_id,
            title: r.title,
            content: r.content,
            category: r.category,
            created_at: r.created_at,
            updated_at: r.updated_at,
            tag_id: r.tag_id,
            tag_name: r.tag_name,
        }
    }
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one post with its tags.
    pub async fn get(&self, id: Uuid) -> Result<Post, DbError> {
        let rows: Vec<JoinedRow> = sqlx::query_as(
            r#"
            SELECT p.id AS post_id, p.title, p.content, p.category,
                   p.created_at, p.updated_at,
                   t.id AS tag_id, t.name AS tag_name
            FROM posts p
            LEFT JOIN post_tags pt ON pt.post_id = p.id
            LEFT JOIN tags t ON t.id = pt.tag_id
            WHERE p.id = $1
            ORDER BY t.id
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let rows: Vec<PostTagRow> = rows.into_iter().map(Into::into).collect();
        flatten_rows(&rows)
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                resource: "post",
                id: id.to_string(),
            })
    }

    /// List posts in `created_at` order after the page cursor.
    ///
    /// The limit applies to posts, not join rows: the page is picked in a
    /// CTE and only then joined to its tags.
    pub async fn list(&self, page: PageRequest) -> Result<Vec<Post>, DbError> {
        let rows: Vec<JoinedRow> = sqlx::query_as(
            r#"
            WITH page AS (
                SELECT id, title, content, category, created_at, updated_at
                FROM posts
                WHERE $1::timestamptz IS NULL OR created_at > $1
                ORDER BY created_at, id
                LIMIT $2
            )
            SELECT p.id AS post_id, p.title, p.content, p.category,
                   p.created_at, p.updated_at,
                   t.id AS tag_id, t.name AS tag_name
            FROM page p
            LEFT JOIN post_tags pt ON pt.post_id = p.id
            LEFT JOIN tags t ON t.id = pt.tag_id
            ORDER BY p.created_at, p.id, t.id
            "#,
        )
        .bind(page.after)
        .bind(i64::from(page.limit()))
        .fetch_all(self.pool)
        .await?;

        let rows: Vec<PostTagRow> = rows.into_iter().map(Into::into).collect();
        Ok(flatten_page(&rows, &page))
    }

    /// Create a post and link its tags by name, atomically.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = reconcile::create_post(&mut PgPostStore::new(&mut *tx), new_post).await;
        finish(tx, result).await
    }

    /// Update scalar fields and optionally replace the tag set, atomically.
    pub async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<Post, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = reconcile::update_post(&mut PgPostStore::new(&mut *tx), id, patch).await;
        finish(tx, result).await
    }

    /// Delete a post and its links.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        let result = reconcile::delete_post(&mut PgPostStore::new(&mut *tx), id).await;
        finish(tx, result).await
    }
}

/// Commit on success, roll back on failure.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: quill_core::StoreResult<T>,
) -> Result<T, DbError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            tracing::debug!(error = %err, "post write rolled back");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations};
    use quill_core::models::Tag;

    async fn repo_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    fn unique(prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_returns_tags() {
        let pool = repo_pool().await;
        let repo = PostRepo::new(&pool);
        let a = unique("tag");
        let b = unique("tag");

        let new_post = NewPost::new("Hello", "body", "news", &[a.clone(), b.clone(), a.clone()])
            .expect("valid post");
        let created = repo.create(&new_post).await.expect("create");

        let mut names: Vec<_> = created.tags.iter().map(|t| t.name.clone()).collect();
        names.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(names, expected);

        let fetched = repo.get(created.id).await.expect("get");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_replaces_tag_set() {
        let pool = repo_pool().await;
        let repo = PostRepo::new(&pool);
        let keep = unique("keep");
        let dropped = unique("drop");

        let created = repo
            .create(&NewPost::new("T", "", "c", &[keep.clone(), dropped]).expect("valid"))
            .await
            .expect("create");
        let keep_id = created
            .tags
            .iter()
            .find(|t| t.name == keep)
            .map(|t| t.id)
            .expect("kept tag");

        let patch = PostPatch {
            tags: Some(vec![keep_id]),
            ..Default::default()
        };
        let updated = repo.update(created.id, &patch).await.expect("update");

        assert_eq!(updated.tags, vec![Tag::new(keep_id, keep)]);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_removes_post() {
        let pool = repo_pool().await;
        let repo = PostRepo::new(&pool);
        let created = repo
            .create(&NewPost::new("Gone", "", "c", &[unique("t")]).expect("valid"))
            .await
            .expect("create");

        repo.delete(created.id).await.expect("delete");

        assert!(matches!(
            repo.get(created.id).await,
            Err(DbError::NotFound { resource: "post", .. })
        ));
        assert!(matches!(
            repo.delete(created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_missing_post_is_not_found() {
        let pool = repo_pool().await;
        let repo = PostRepo::new(&pool);
        let result = repo.update(Uuid::new_v4(), &PostPatch::default()).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }
}
