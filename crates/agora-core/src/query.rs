//! Read side: a user's flags on a post.
//!
//! Queries always go to the same store the engine writes through, so a
//! user re-reading immediately after a successful mutation observes it.

use agora_types::{
    InteractionFilter, InteractionOutcome, InteractionSet, PartialFlags, PostId, UserId,
};

use crate::error::EngineError;
use crate::store::PostStore;

/// Project `user`'s flags from `set`, restricted to `filter` when given.
///
/// Only the requested kinds are tested for membership.
pub fn project(set: &InteractionSet, user: UserId, filter: Option<&InteractionFilter>) -> PartialFlags {
    let Some(filter) = filter else {
        return set.flags_for(user).into();
    };
    let mut flags = PartialFlags::default();
    for kind in filter.kinds() {
        flags.set(kind, set.contains(kind, user));
    }
    flags
}

/// Computes per-user flags from stored interaction sets.
#[derive(Debug, Clone)]
pub struct InteractionQuery<S> {
    store: S,
}

impl<S: PostStore> InteractionQuery<S> {
    /// Create a query over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the committed set for `post_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the post does not exist, or
    /// [`EngineError::Store`] if the read fails.
    pub async fn load(&self, post_id: PostId) -> Result<InteractionSet, EngineError> {
        self.store
            .load(post_id)
            .await?
            .ok_or(EngineError::NotFound(post_id))
    }

    /// `user`'s flags on `post_id`, optionally filtered.
    ///
    /// # Errors
    ///
    /// See [`InteractionQuery::load`].
    pub async fn flags_for(
        &self,
        post_id: PostId,
        user: UserId,
        filter: Option<&InteractionFilter>,
    ) -> Result<PartialFlags, EngineError> {
        let set = self.load(post_id).await?;
        Ok(project(&set, user, filter))
    }

    /// Counts, version and all four flags for `user` on `post_id`.
    ///
    /// # Errors
    ///
    /// See [`InteractionQuery::load`].
    pub async fn summary(
        &self,
        post_id: PostId,
        user: UserId,
    ) -> Result<InteractionOutcome, EngineError> {
        let set = self.load(post_id).await?;
        Ok(InteractionOutcome::from_set(post_id, &set, user))
    }
}
