//! Error types for the interaction core.
//!
//! Errors are layered the same way the components are: a [`StoreError`]
//! from the storage collaborator, an [`EngineError`] from a single
//! compare-and-swap attempt, and a [`ServiceError`] carrying the
//! caller-visible taxonomy.

use agora_types::{PostId, UserId};

/// Failure reported by a [`PostStore`](crate::store::PostStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded into an interaction set.
    #[error("corrupt interaction record: {0}")]
    Corrupt(String),
}

/// Errors from one engine application.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The post does not exist.
    #[error("post {0} not found")]
    NotFound(PostId),

    /// The stored version moved between read and write.
    #[error("version conflict on post {post_id}: expected {expected}, found {found}")]
    Conflict {
        /// The contended post.
        post_id: PostId,
        /// Version the caller read.
        expected: u64,
        /// Version the store holds now.
        found: u64,
    },

    /// The sequence would leave a user both upvoting and downvoting.
    #[error("operation sequence leaves user {user} with both votes")]
    ExclusionViolated {
        /// The acting user.
        user: UserId,
    },

    /// The version counter cannot advance further.
    #[error("version counter exhausted")]
    VersionExhausted,

    /// The storage collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Caller-visible result taxonomy for interaction actions.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No authenticated caller.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The post id (or another input) is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The post does not exist.
    #[error("post {0} not found")]
    NotFound(PostId),

    /// Every attempt lost the compare-and-swap race.
    #[error("post {post_id} is contended: gave up after {attempts} attempts")]
    Conflict {
        /// The contended post.
        post_id: PostId,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Storage or invariant failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(post_id) => Self::NotFound(post_id),
            EngineError::Conflict { post_id, .. } => Self::Conflict {
                post_id,
                attempts: 1,
            },
            EngineError::ExclusionViolated { .. } | EngineError::VersionExhausted => {
                Self::Internal(err.to_string())
            }
            EngineError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}
