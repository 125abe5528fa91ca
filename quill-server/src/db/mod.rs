//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool with an acquire timeout - no Arc<Mutex<Connection>>
//! - List queries page posts in a CTE and JOIN tags once - no N+1 queries
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Multi-step writes run in one transaction through `PgPostStore`

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use error::DbError;
pub use pool::{create_lazy_pool, create_pool, create_pool_with_options, PoolConfig};
pub use repos::{PostRepo, UserRepo};
pub use store::PgPostStore;

pub use sqlx::PgPool;
