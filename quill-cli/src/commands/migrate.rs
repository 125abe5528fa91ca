//! Schema migration command

use anyhow::{Context, Result};

use quill_server::migrations;

use super::DatabaseArgs;

/// Create any missing tables and indexes, then exit.
pub async fn run_migrate(db: DatabaseArgs) -> Result<()> {
    let pool = db.connect().await?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    pool.close().await;
    println!("Migrations applied");
    Ok(())
}
