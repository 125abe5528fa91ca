//! quill-core: posts, tags and users without the plumbing
//!
//! Holds the two pieces of real logic behind the quill GraphQL API:
//! - [`flatten`] folds `posts ⋈ post_tags ⋈ tags` rows into nested posts
//! - [`reconcile`] keeps the post/tag link table in line with the tags a
//!   client asked for, over a transactional [`PostStore`]

pub mod error;
pub mod flatten;
pub mod models;
pub mod reconcile;
pub mod store;

#[cfg(test)]
mod memory;

pub use error::{StoreError, StoreResult};
pub use flatten::{flatten_page, flatten_rows};
pub use models::{Post, Tag, TagId, User};
pub use reconcile::TagDiff;
pub use store::PostStore;
