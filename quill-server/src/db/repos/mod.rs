//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool: `Repo::new(&pool)`
//! - Uses JOINs for list operations (no N+1)
//! - Relies on unique constraints instead of check-then-insert
//! - Uses transactions for multi-step operations

pub mod posts;
pub mod users;

pub use posts::PostRepo;
pub use users::UserRepo;
