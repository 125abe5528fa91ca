//! User repository
//!
//! Single-statement writes; the unique username constraint is the
//! duplicate check (no check-then-insert).

use chrono::{DateTime, Utc};
use quill_core::models::{Email, User, UserPatch, Username};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::error::DbError;

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            password: r.password,
            active: r.active,
            created_at: r.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, password, active, created_at";

fn not_found(id: Uuid) -> DbError {
    DbError::NotFound {
        resource: "user",
        id: id.to_string(),
    }
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DbError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        row.map(Into::into).ok_or_else(|| not_found(id))
    }

    /// Insert a user. `password_hash` must already be a PHC string.
    pub async fn create(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, DbError> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(user_id = %row.id, "user created");
        Ok(row.into())
    }

    /// Keep-if-absent update of username and email.
    pub async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<User, DbError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($1, username),
                email = COALESCE($2, email)
            WHERE id = $3
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(patch.username.as_ref().map(|u| u.as_str()))
        .bind(patch.email.as_ref().map(|e| e.as_str()))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or_else(|| not_found(id))
    }

    /// Delete a user, returning the removed id.
    pub async fn delete(&self, id: Uuid) -> Result<Uuid, DbError> {
        let deleted: Option<Uuid> = sqlx::query_scalar("DELETE FROM users WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        deleted.ok_or_else(|| not_found(id))
    }
}
