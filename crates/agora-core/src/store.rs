//! The storage collaborator and its in-memory implementation.
//!
//! [`PostStore`] is the only way the core touches persisted interaction
//! sets. Writes go exclusively through
//! [`compare_and_swap`](PostStore::compare_and_swap), which persists a new
//! set only if the stored version still equals the version the writer
//! read. No lock is held between a load and the swap that follows it.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use agora_types::{InteractionSet, PostId};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The new set was persisted.
    Swapped,
    /// The stored version differs from the expected one; nothing was written.
    VersionMismatch {
        /// The version currently stored.
        current: u64,
    },
    /// The post no longer exists.
    Missing,
}

/// Persistence boundary for per-post interaction sets.
///
/// Implementations must make [`compare_and_swap`](Self::compare_and_swap)
/// atomic with respect to concurrent callers, and [`load`](Self::load)
/// must observe every swap that has already returned
/// [`CasOutcome::Swapped`].
pub trait PostStore: Send + Sync {
    /// Load the interaction set for `post_id`, or `None` if the post does not exist.
    fn load(
        &self,
        post_id: PostId,
    ) -> impl Future<Output = Result<Option<InteractionSet>, StoreError>> + Send;

    /// Persist `next` only if the stored version equals `expected_version`.
    fn compare_and_swap(
        &self,
        post_id: PostId,
        expected_version: u64,
        next: &InteractionSet,
    ) -> impl Future<Output = Result<CasOutcome, StoreError>> + Send;

    /// Create an empty set for a new post. Returns `false` if one already exists.
    fn create(&self, post_id: PostId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Remove the set of a deleted post. Returns `false` if none existed.
    fn delete(&self, post_id: PostId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

impl<S: PostStore> PostStore for Arc<S> {
    fn load(
        &self,
        post_id: PostId,
    ) -> impl Future<Output = Result<Option<InteractionSet>, StoreError>> + Send {
        (**self).load(post_id)
    }

    fn compare_and_swap(
        &self,
        post_id: PostId,
        expected_version: u64,
        next: &InteractionSet,
    ) -> impl Future<Output = Result<CasOutcome, StoreError>> + Send {
        (**self).compare_and_swap(post_id, expected_version, next)
    }

    fn create(&self, post_id: PostId) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).create(post_id)
    }

    fn delete(&self, post_id: PostId) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).delete(post_id)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local [`PostStore`] backed by a map behind an async lock.
///
/// The lock is held only for the duration of a single load or swap, never
/// across an engine application. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPostStore {
    posts: Arc<RwLock<BTreeMap<PostId, InteractionSet>>>,
}

impl MemoryPostStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostStore for MemoryPostStore {
    async fn load(&self, post_id: PostId) -> Result<Option<InteractionSet>, StoreError> {
        Ok(self.posts.read().await.get(&post_id).cloned())
    }

    async fn compare_and_swap(
        &self,
        post_id: PostId,
        expected_version: u64,
        next: &InteractionSet,
    ) -> Result<CasOutcome, StoreError> {
        let mut posts = self.posts.write().await;
        let Some(stored) = posts.get_mut(&post_id) else {
            return Ok(CasOutcome::Missing);
        };
        if stored.version != expected_version {
            return Ok(CasOutcome::VersionMismatch {
                current: stored.version,
            });
        }
        stored.clone_from(next);
        Ok(CasOutcome::Swapped)
    }

    async fn create(&self, post_id: PostId) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post_id) {
            return Ok(false);
        }
        posts.insert(post_id, InteractionSet::new());
        Ok(true)
    }

    async fn delete(&self, post_id: PostId) -> Result<bool, StoreError> {
        Ok(self.posts.write().await.remove(&post_id).is_some())
    }
}
