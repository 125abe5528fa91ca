//! HTTP server layer
//!
//! Axum server with:
//! - GraphQL on `/graphql` (GraphiQL on GET)
//! - Health check on `/health`
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown

pub mod routes;
pub mod server;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
