//! Subcommands and the database options they share

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::{run_serve, ServeArgs};

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use quill_server::db::pool::{DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS};
use quill_server::db::{create_pool_with_options, PgPool, PoolConfig};

/// Database connection options
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "QUILL_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Seconds to wait for a free connection before failing
    #[arg(long, env = "QUILL_ACQUIRE_TIMEOUT_SECS", default_value_t = DEFAULT_ACQUIRE_TIMEOUT.as_secs())]
    pub acquire_timeout_secs: u64,
}

impl DatabaseArgs {
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }

    pub async fn connect(&self) -> Result<PgPool> {
        create_pool_with_options(&self.database_url, &self.pool_config())
            .await
            .context("Failed to connect to database")
    }
}
