//! HTTP server command
//!
//! Runs the GraphQL server, applying migrations first unless told not to.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use quill_server::graphql::SchemaLimits;
use quill_server::http::{run_server, ServerConfig};
use quill_server::migrations;

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Address to bind to
    #[arg(long, short = 'b', env = "QUILL_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Maximum GraphQL query depth
    #[arg(long, env = "QUILL_DEPTH_LIMIT")]
    pub depth_limit: Option<usize>,

    /// Maximum GraphQL query complexity
    #[arg(long, env = "QUILL_COMPLEXITY_LIMIT")]
    pub complexity_limit: Option<usize>,

    /// Don't create missing tables on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            limits: SchemaLimits {
                depth: self.depth_limit,
                complexity: self.complexity_limit,
            },
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting quill server on {}", args.bind);

    let pool = args.db.connect().await?;

    if args.skip_migrations {
        tracing::info!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    // Blocks until shutdown
    run_server(pool, args.server_config())
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_reach_server_config() {
        let args = ServeArgs::parse_from([
            "serve",
            "--database-url",
            "postgres://localhost/quill",
            "--bind",
            "0.0.0.0:8080",
            "--depth-limit",
            "6",
            "--cors-permissive",
        ]);

        let config = args.server_config();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.cors_permissive);
        assert_eq!(config.limits.depth, Some(6));
        assert_eq!(config.limits.complexity, None);
        assert_eq!(args.db.max_connections, 5);
    }
}
