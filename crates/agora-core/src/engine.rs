//! The interaction engine: atomic application of operation sequences.
//!
//! [`transition`] is the pure state function: it applies an ordered
//! sequence of operations for one user to a private copy of a set and
//! reports whether anything changed. [`InteractionEngine::apply`] wraps it
//! with a load and a single compare-and-swap against the store.
//!
//! The engine never retries. A lost race surfaces as
//! [`EngineError::Conflict`] with nothing written, and the caller decides
//! whether to reload and try the named action again.

use agora_types::{InteractionSet, OperationAction, OperationSequence, PostId, UserId};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::store::{CasOutcome, PostStore};

/// A committed (or confirmed unchanged) interaction set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// The set as stored after the application.
    pub set: InteractionSet,
    /// Whether membership changed (and `version` advanced).
    pub changed: bool,
}

/// Apply `ops` for `user` to a copy of `current`.
///
/// Returns `Ok(None)` when the sequence leaves membership exactly as it
/// was; the caller must not persist anything and `version` stays put.
/// Otherwise returns the new set with `version` advanced by one.
///
/// # Errors
///
/// - [`EngineError::ExclusionViolated`] if `user` would end up in both
///   `upvotes` and `downvotes`.
/// - [`EngineError::VersionExhausted`] if `version` is already `u64::MAX`.
pub fn transition(
    current: &InteractionSet,
    user: UserId,
    ops: &OperationSequence,
) -> Result<Option<InteractionSet>, EngineError> {
    let mut next = current.clone();
    for op in ops {
        match op.action {
            OperationAction::Add => next.insert(op.kind, user),
            OperationAction::Remove => next.remove(op.kind, user),
        };
    }

    // Add-then-remove pairs flip membership twice and net to nothing.
    if next.same_members(current) {
        return Ok(None);
    }

    if next.upvotes.contains(&user) && next.downvotes.contains(&user) {
        return Err(EngineError::ExclusionViolated { user });
    }

    next.version = current
        .version
        .checked_add(1)
        .ok_or(EngineError::VersionExhausted)?;
    Ok(Some(next))
}

/// Applies operation sequences to stored interaction sets.
#[derive(Debug, Clone)]
pub struct InteractionEngine<S> {
    store: S,
}

impl<S: PostStore> InteractionEngine<S> {
    /// Create an engine over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load the set for `post_id`, apply `ops` for `user`, and persist the
    /// result with a compare-and-swap on the loaded version.
    ///
    /// When `expected_version` is given, the loaded version must match it;
    /// callers that decided on `ops` from an earlier read use this to make
    /// the decision and the write one atomic unit.
    ///
    /// A sequence that changes nothing is not written and returns the
    /// loaded set with `changed == false`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the post does not exist.
    /// - [`EngineError::Conflict`] if the stored version differs from the
    ///   expected one at load time or at swap time. Nothing is written.
    /// - Errors from [`transition`] and from the store.
    pub async fn apply(
        &self,
        post_id: PostId,
        user: UserId,
        expected_version: Option<u64>,
        ops: &OperationSequence,
    ) -> Result<Applied, EngineError> {
        let current = self
            .store
            .load(post_id)
            .await?
            .ok_or(EngineError::NotFound(post_id))?;

        if let Some(expected) = expected_version
            && expected != current.version
        {
            debug!(%post_id, expected, found = current.version, "stale expected version");
            return Err(EngineError::Conflict {
                post_id,
                expected,
                found: current.version,
            });
        }

        let Some(next) = transition(&current, user, ops)? else {
            debug!(%post_id, %user, version = current.version, "no-op sequence, nothing written");
            return Ok(Applied {
                set: current,
                changed: false,
            });
        };

        match self
            .store
            .compare_and_swap(post_id, current.version, &next)
            .await?
        {
            CasOutcome::Swapped => {
                debug!(%post_id, %user, version = next.version, "interaction set swapped");
                Ok(Applied {
                    set: next,
                    changed: true,
                })
            }
            CasOutcome::VersionMismatch { current: found } => {
                warn!(%post_id, expected = current.version, found, "compare-and-swap lost race");
                Err(EngineError::Conflict {
                    post_id,
                    expected: current.version,
                    found,
                })
            }
            CasOutcome::Missing => Err(EngineError::NotFound(post_id)),
        }
    }
}
