//! Tag reconciliation for post writes
//!
//! Create attaches tags by name, creating missing tags. Update reconciles
//! by tag id: only the difference between the linked set and the desired
//! set is written, so unchanged links are never touched and a no-op update
//! issues no link writes at all.
//!
//! Every function here runs against one [`PostStore`] transaction and
//! leaves commit to the caller. An `Err` means the caller must drop the
//! transaction, which discards everything written so far.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{check_tag_id, NewPost, Post, PostPatch, TagId, TagName};
use crate::store::PostStore;

/// Link changes needed to move a post from its current tags to the desired ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Desired but not linked, in desired order
    pub to_add: Vec<TagId>,
    /// Linked but not desired, ascending
    pub to_remove: Vec<TagId>,
}

impl TagDiff {
    pub fn compute(current: &[TagId], desired: &[TagId]) -> Self {
        let current_set: HashSet<TagId> = current.iter().copied().collect();
        let desired_set: HashSet<TagId> = desired.iter().copied().collect();

        let mut queued = HashSet::new();
        let to_add = desired
            .iter()
            .copied()
            .filter(|id| !current_set.contains(id) && queued.insert(*id))
            .collect();

        let mut to_remove: Vec<TagId> = current_set.difference(&desired_set).copied().collect();
        to_remove.sort_unstable();

        Self { to_add, to_remove }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Insert a post and attach the named tags, creating tags that don't exist.
pub async fn create_post<S>(store: &mut S, new_post: &NewPost) -> StoreResult<Post>
where
    S: PostStore + ?Sized,
{
    let record = store.insert_post(new_post).await?;
    attach_tags_by_name(store, record.id, &new_post.tags).await?;
    let tags = store.tags_for_post(record.id).await?;

    tracing::debug!(post_id = %record.id, tags = tags.len(), "created post");
    Ok(record.with_tags(tags))
}

/// Link every named tag to `post_id`. Repeated names are linked once.
async fn attach_tags_by_name<S>(store: &mut S, post_id: Uuid, names: &[TagName]) -> StoreResult<()>
where
    S: PostStore + ?Sized,
{
    let mut seen = HashSet::new();

    for name in names {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let tag_id = match store.find_tag_by_name(name.as_str()).await? {
            Some(id) => id,
            None => store.insert_tag(name.as_str()).await?,
        };
        store.link_tag(post_id, tag_id).await?;
    }

    Ok(())
}

fn check_tag_ids(ids: &[TagId]) -> StoreResult<()> {
    for &id in ids {
        check_tag_id(id)?;
    }
    Ok(())
}

/// Bring the links of `post_id` in line with `desired`.
///
/// Every desired id must lie in `1..=MAX_TAG_ID`; otherwise nothing is
/// written and the error is `Validation`.
pub async fn reconcile_tag_ids<S>(
    store: &mut S,
    post_id: Uuid,
    desired: &[TagId],
) -> StoreResult<TagDiff>
where
    S: PostStore + ?Sized,
{
    check_tag_ids(desired)?;
    let current = store.linked_tag_ids(post_id).await?;
    let diff = TagDiff::compute(&current, desired);
    if diff.is_empty() {
        return Ok(diff);
    }

    if !diff.to_remove.is_empty() {
        store.unlink_tags(post_id, &diff.to_remove).await?;
    }
    for &tag_id in &diff.to_add {
        store.ensure_tag(tag_id).await?;
        store.link_tag(post_id, tag_id).await?;
    }

    tracing::debug!(
        post_id = %post_id,
        added = diff.to_add.len(),
        removed = diff.to_remove.len(),
        "reconciled post tags"
    );
    Ok(diff)
}

/// Update scalar fields and, when `patch.tags` is set, reconcile tags.
///
/// Fails with `NotFound` or `Validation` before any write if the post
/// doesn't exist or a tag id is out of range. Returns the post as it stands
/// after the changes.
pub async fn update_post<S>(store: &mut S, id: Uuid, patch: &PostPatch) -> StoreResult<Post>
where
    S: PostStore + ?Sized,
{
    if let Some(desired) = &patch.tags {
        check_tag_ids(desired)?;
    }
    if store.lock_post(id).await?.is_none() {
        return Err(StoreError::not_found("post", id));
    }

    let record = store.update_post(id, patch).await?;
    if let Some(desired) = &patch.tags {
        reconcile_tag_ids(store, id, desired).await?;
    }
    let tags = store.tags_for_post(id).await?;

    Ok(record.with_tags(tags))
}

/// Remove a post and its links.
pub async fn delete_post<S>(store: &mut S, id: Uuid) -> StoreResult<()>
where
    S: PostStore + ?Sized,
{
    if store.lock_post(id).await?.is_none() {
        return Err(StoreError::not_found("post", id));
    }

    let unlinked = store.unlink_all(id).await?;
    store.delete_post(id).await?;

    tracing::debug!(post_id = %id, unlinked, "deleted post");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_adds_and_removes() {
        let diff = TagDiff::compute(&[1, 2, 3], &[3, 4, 1]);
        assert_eq!(diff.to_add, vec![4]);
        assert_eq!(diff.to_remove, vec![2]);
    }

    #[test]
    fn diff_of_equal_sets_is_empty() {
        let diff = TagDiff::compute(&[1, 2], &[2, 1]);
        assert!(diff.is_empty());
    }

    #[test]
    fn diff_collapses_repeated_desired_ids() {
        let diff = TagDiff::compute(&[], &[5, 2, 5, 2]);
        assert_eq!(diff.to_add, vec![5, 2]);
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn diff_to_empty_removes_everything_sorted() {
        let diff = TagDiff::compute(&[9, 3, 7], &[]);
        assert!(diff.to_add.is_empty());
        assert_eq!(diff.to_remove, vec![3, 7, 9]);
    }
}
