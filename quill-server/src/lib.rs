//! quill-server: GraphQL API for posts, tags and users over PostgreSQL
//!
//! The tag reconciliation and row flattening logic lives in `quill-core`;
//! this crate supplies the PostgreSQL store, the GraphQL schema and the
//! HTTP server around it.

pub mod db;
pub mod graphql;
pub mod http;
pub mod password;

pub use db::{create_pool, create_pool_with_options, migrations, DbError, PoolConfig};
pub use graphql::{build_schema, AppSchema, SchemaLimits};
pub use http::{run_server, ServerConfig, ServerError};
