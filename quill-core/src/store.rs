//! Transactional store seam for post and tag writes
//!
//! A `PostStore` is a handle on one open transaction. Every method runs
//! inside that transaction; the owner of the handle decides whether to
//! commit. Dropping an uncommitted transaction must discard its writes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{NewPost, PostPatch, PostRecord, Tag, TagId};

#[async_trait]
pub trait PostStore: Send {
    /// Insert a post row and return it with store-assigned fields.
    async fn insert_post(&mut self, post: &NewPost) -> StoreResult<PostRecord>;

    /// Fetch a post row and lock it for the rest of the transaction.
    async fn lock_post(&mut self, id: Uuid) -> StoreResult<Option<PostRecord>>;

    /// Apply scalar fields of `patch`, keeping stored values for `None`,
    /// and bump `updated_at`.
    async fn update_post(&mut self, id: Uuid, patch: &PostPatch) -> StoreResult<PostRecord>;

    /// Delete a post row. Returns whether a row was removed.
    async fn delete_post(&mut self, id: Uuid) -> StoreResult<bool>;

    async fn find_tag_by_name(&mut self, name: &str) -> StoreResult<Option<TagId>>;

    /// Create a tag by name, returning the id of the row now holding it.
    async fn insert_tag(&mut self, name: &str) -> StoreResult<TagId>;

    /// Make sure a tag row with `id` exists, creating a bare one if needed.
    /// Returns `true` when a row was created.
    async fn ensure_tag(&mut self, id: TagId) -> StoreResult<bool>;

    async fn linked_tag_ids(&mut self, post_id: Uuid) -> StoreResult<Vec<TagId>>;

    /// Idempotent link insert. Returns `false` if the pair already existed.
    async fn link_tag(&mut self, post_id: Uuid, tag_id: TagId) -> StoreResult<bool>;

    /// Remove the given links in one batch. Returns the number removed.
    async fn unlink_tags(&mut self, post_id: Uuid, tag_ids: &[TagId]) -> StoreResult<u64>;

    /// Remove every link of a post.
    async fn unlink_all(&mut self, post_id: Uuid) -> StoreResult<u64>;

    /// Tags joined through the link table, in join order.
    async fn tags_for_post(&mut self, post_id: Uuid) -> StoreResult<Vec<Tag>>;
}
