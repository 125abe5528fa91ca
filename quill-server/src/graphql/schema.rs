use async_graphql::{EmptySubscription, Schema};
use sqlx::PgPool;

use super::mutation::MutationRoot;
use super::query::QueryRoot;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Optional query limits
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaLimits {
    /// Maximum depth of a query
    pub depth: Option<usize>,
    /// Maximum complexity of a query
    pub complexity: Option<usize>,
}

/// Builds the GraphQL schema, attaching the pool to the context.
pub fn build_schema(pool: PgPool, limits: SchemaLimits) -> AppSchema {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription);
    let schema = if let Some(depth) = limits.depth {
        schema.limit_depth(depth)
    } else {
        schema
    };
    let schema = if let Some(complexity) = limits.complexity {
        schema.limit_complexity(complexity)
    } else {
        schema
    };
    schema.data(pool).finish()
}
