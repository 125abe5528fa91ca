//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod pagination;
pub mod post;
pub mod tag;
pub mod user;
pub mod validation;

pub use pagination::{PageRequest, DEFAULT_LIMIT, MAX_LIMIT};
pub use post::{Category, NewPost, Post, PostPatch, PostRecord, PostTagRow, PostTitle};
pub use tag::{check_tag_id, parse_tag_id, Tag, TagId, TagName, MAX_TAG_ID};
pub use user::{Email, Password, User, UserPatch, Username};
pub use validation::ValidationError;
