//! Database migrations for posts, tags and users

use sqlx::PgPool;

/// Statements applied in order; each is idempotent.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "posts",
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "posts_created_at_idx",
        "CREATE INDEX IF NOT EXISTS posts_created_at_idx ON posts (created_at, id)",
    ),
    (
        "tags",
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            CONSTRAINT tags_name_key UNIQUE (name)
        )
        "#,
    ),
    (
        "post_tags",
        r#"
        CREATE TABLE IF NOT EXISTS post_tags (
            post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            tag_id BIGINT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (post_id, tag_id)
        )
        "#,
    ),
    (
        "post_tags_tag_id_idx",
        "CREATE INDEX IF NOT EXISTS post_tags_tag_id_idx ON post_tags (tag_id)",
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            password TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            active BOOLEAN NOT NULL DEFAULT TRUE,
            CONSTRAINT users_username_key UNIQUE (username)
        )
        "#,
    ),
];

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    for (name, sql) in MIGRATIONS {
        sqlx::query(sql).execute(pool).await?;
        tracing::debug!(migration = name, "applied");
    }

    tracing::info!(count = MIGRATIONS.len(), "Migrations complete");
    Ok(())
}
