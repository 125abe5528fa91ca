//! In-memory `PostStore` for tests
//!
//! `MemoryStore::begin` hands out a transaction working on a copy of the
//! committed state. `MemoryTx::commit` publishes the copy; dropping the
//! transaction throws it away, like a rollback.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{NewPost, PostPatch, PostRecord, Tag, TagId};
use crate::store::PostStore;

/// Operation that fails on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertTag,
    LinkTag,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub posts: Vec<PostRecord>,
    pub tags: Vec<Tag>,
    pub links: Vec<(Uuid, TagId)>,
    clock: i64,
}

impl State {
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(self.clock)
    }

    fn next_tag_id(&self) -> TagId {
        self.tags.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    pub fn linked(&self, post_id: Uuid) -> Vec<TagId> {
        self.links
            .iter()
            .filter(|(p, _)| *p == post_id)
            .map(|(_, t)| *t)
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub committed: State,
    /// Link inserts and batch deletes issued, committed or not
    pub link_writes: usize,
    pub fail_on: Option<FailPoint>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> MemoryTx<'_> {
        let working = self.committed.clone();
        MemoryTx {
            store: self,
            working,
        }
    }

    /// Seed a committed post linked to `tags`, creating the tags.
    pub fn seed_post(&mut self, title: &str, tags: &[(TagId, &str)]) -> Uuid {
        let state = &mut self.committed;
        let now = state.tick();
        let id = Uuid::new_v4();
        state.posts.push(PostRecord {
            id,
            title: title.to_owned(),
            content: String::new(),
            category: "notes".to_owned(),
            created_at: now,
            updated_at: now,
        });
        for &(tag_id, name) in tags {
            if !state.tags.iter().any(|t| t.id == tag_id) {
                state.tags.push(Tag::new(tag_id, name));
            }
            state.links.push((id, tag_id));
        }
        id
    }
}

pub struct MemoryTx<'a> {
    store: &'a mut MemoryStore,
    working: State,
}

impl MemoryTx<'_> {
    pub fn commit(self) {
        self.store.committed = self.working;
    }

    fn fail_if(&self, point: FailPoint) -> StoreResult<()> {
        if self.store.fail_on == Some(point) {
            return Err(StoreError::transaction(format!("injected failure at {point:?}")));
        }
        Ok(())
    }

    fn post_mut(&mut self, id: Uuid) -> StoreResult<&mut PostRecord> {
        self.working
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("post", id))
    }
}

#[async_trait]
impl<'a> PostStore for MemoryTx<'a> {
    async fn insert_post(&mut self, post: &NewPost) -> StoreResult<PostRecord> {
        let now = self.working.tick();
        let record = PostRecord {
            id: Uuid::new_v4(),
            title: post.title.as_str().to_owned(),
            content: post.content.clone(),
            category: post.category.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.working.posts.push(record.clone());
        Ok(record)
    }

    async fn lock_post(&mut self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        Ok(self.working.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update_post(&mut self, id: Uuid, patch: &PostPatch) -> StoreResult<PostRecord> {
        let now = self.working.tick();
        let post = self.post_mut(id)?;
        if let Some(title) = &patch.title {
            post.title = title.as_str().to_owned();
        }
        if let Some(content) = &patch.content {
            post.content = content.clone();
        }
        if let Some(category) = &patch.category {
            post.category = category.as_str().to_owned();
        }
        post.updated_at = now;
        Ok(post.clone())
    }

    async fn delete_post(&mut self, id: Uuid) -> StoreResult<bool> {
        let before = self.working.posts.len();
        self.working.posts.retain(|p| p.id != id);
        self.working.links.retain(|(p, _)| *p != id);
        Ok(self.working.posts.len() < before)
    }

    async fn find_tag_by_name(&mut self, name: &str) -> StoreResult<Option<TagId>> {
        Ok(self
            .working
            .tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.id))
    }

    async fn insert_tag(&mut self, name: &str) -> StoreResult<TagId> {
        self.fail_if(FailPoint::InsertTag)?;
        if let Some(existing) = self.working.tags.iter().find(|t| t.name == name) {
            return Ok(existing.id);
        }
        let id = self.working.next_tag_id();
        self.working.tags.push(Tag::new(id, name));
        Ok(id)
    }

    async fn ensure_tag(&mut self, id: TagId) -> StoreResult<bool> {
        if self.working.tags.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        let name = Tag::placeholder_name(id);
        if self.working.tags.iter().any(|t| t.name == name) {
            return Err(StoreError::constraint("tags_name_key"));
        }
        self.working.tags.push(Tag::new(id, name));
        Ok(true)
    }

    async fn linked_tag_ids(&mut self, post_id: Uuid) -> StoreResult<Vec<TagId>> {
        Ok(self.working.linked(post_id))
    }

    async fn link_tag(&mut self, post_id: Uuid, tag_id: TagId) -> StoreResult<bool> {
        self.store.link_writes += 1;
        self.fail_if(FailPoint::LinkTag)?;
        if !self.working.posts.iter().any(|p| p.id == post_id)
            || !self.working.tags.iter().any(|t| t.id == tag_id)
        {
            return Err(StoreError::constraint("post_tags_fkey"));
        }
        if self.working.links.contains(&(post_id, tag_id)) {
            return Ok(false);
        }
        self.working.links.push((post_id, tag_id));
        Ok(true)
    }

    async fn unlink_tags(&mut self, post_id: Uuid, tag_ids: &[TagId]) -> StoreResult<u64> {
        self.store.link_writes += 1;
        let before = self.working.links.len();
        self.working
            .links
            .retain(|(p, t)| !(*p == post_id && tag_ids.contains(t)));
        Ok((before - self.working.links.len()) as u64)
    }

    async fn unlink_all(&mut self, post_id: Uuid) -> StoreResult<u64> {
        self.store.link_writes += 1;
        let before = self.working.links.len();
        self.working.links.retain(|(p, _)| *p != post_id);
        Ok((before - self.working.links.len()) as u64)
    }

    async fn tags_for_post(&mut self, post_id: Uuid) -> StoreResult<Vec<Tag>> {
        let tags = &self.working.tags;
        let mut linked: Vec<Tag> = self
            .working
            .links
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, tag_id)| tags.iter().find(|t| t.id == *tag_id).cloned())
            .collect();
        linked.sort_by_key(|t| t.id);
        Ok(linked)
    }
}
