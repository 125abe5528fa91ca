//! GraphQL API - posts, tags and users
//!
//! Resolvers take the pool from schema data, validate arguments into
//! core types, and delegate to the repositories. Errors leave through
//! [`ApiError`] so every one carries an `extensions.code`.

pub mod error;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use error::ApiError;
pub use schema::{build_schema, AppSchema, SchemaLimits};
