//! The interaction service: named actions at the system boundary.
//!
//! Every entry point takes the raw post id from the request and the
//! caller identity resolved by the authentication collaborator. Inputs are
//! validated before the engine is touched. Each named action is then
//! mapped to its fixed operation sequence and applied with a bounded
//! retry on compare-and-swap conflicts; every retry re-reads the set and
//! re-applies the *named action*, never a stale operation list.

use agora_types::{
    InteractionFilter, InteractionKind, InteractionOutcome, NamedAction, PartialFlags, PostId,
    UserId,
};
use tracing::{debug, info, warn};

use crate::config::InteractionsConfig;
use crate::engine::InteractionEngine;
use crate::error::{EngineError, ServiceError};
use crate::query::InteractionQuery;
use crate::store::PostStore;

/// Bounded retry policy for compare-and-swap conflicts.
///
/// Retries are immediate: a conflict means another writer committed, so
/// the re-read will see a fresh version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// A policy making at most `max_attempts` attempts (at least one).
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    /// Total attempts per action, including the first.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl From<&InteractionsConfig> for RetryPolicy {
    fn from(config: &InteractionsConfig) -> Self {
        Self::new(config.max_attempts)
    }
}

/// What a single attempt should apply.
#[derive(Debug, Clone, Copy)]
enum Plan {
    /// A named action with its fixed sequence.
    Fixed(NamedAction),
    /// A toggle resolved against the set read in the same attempt.
    Toggle(InteractionKind),
}

/// Boundary component for post interactions.
#[derive(Debug, Clone)]
pub struct InteractionService<S> {
    engine: InteractionEngine<S>,
    query: InteractionQuery<S>,
    policy: RetryPolicy,
}

impl<S: PostStore + Clone> InteractionService<S> {
    /// Create a service whose engine and query share `store`.
    pub fn new(store: S, policy: RetryPolicy) -> Self {
        Self {
            engine: InteractionEngine::new(store.clone()),
            query: InteractionQuery::new(store),
            policy,
        }
    }
}

impl<S: PostStore> InteractionService<S> {
    /// The retry policy in force.
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// The store shared by the engine and the query.
    pub const fn store(&self) -> &S {
        self.engine.store()
    }

    /// Replace any downvote by `caller` with an upvote.
    ///
    /// # Errors
    ///
    /// See [`InteractionService::perform`].
    pub async fn upvote(
        &self,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        self.perform(NamedAction::Upvote, post_id, caller).await
    }

    /// Replace any upvote by `caller` with a downvote.
    ///
    /// # Errors
    ///
    /// See [`InteractionService::perform`].
    pub async fn downvote(
        &self,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        self.perform(NamedAction::Downvote, post_id, caller).await
    }

    /// Clear both of `caller`'s votes.
    ///
    /// # Errors
    ///
    /// See [`InteractionService::perform`].
    pub async fn unvote(
        &self,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        self.perform(NamedAction::Unvote, post_id, caller).await
    }

    /// Hide the post for `caller`.
    ///
    /// # Errors
    ///
    /// See [`InteractionService::perform`].
    pub async fn hide(
        &self,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        self.perform(NamedAction::Hide, post_id, caller).await
    }

    /// Stop hiding the post for `caller`.
    ///
    /// # Errors
    ///
    /// See [`InteractionService::perform`].
    pub async fn unhide(
        &self,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        self.perform(NamedAction::Unhide, post_id, caller).await
    }

    /// Follow the post as `caller`.
    ///
    /// # Errors
    ///
    /// See [`InteractionService::perform`].
    pub async fn follow(
        &self,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        self.perform(NamedAction::Follow, post_id, caller).await
    }

    /// Stop following the post as `caller`.
    ///
    /// # Errors
    ///
    /// See [`InteractionService::perform`].
    pub async fn unfollow(
        &self,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        self.perform(NamedAction::Unfollow, post_id, caller).await
    }

    /// Validate inputs and apply `action` with bounded retry.
    ///
    /// Returns the committed aggregate and `caller`'s recomputed flags.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Unauthenticated`] if `caller` is `None`.
    /// - [`ServiceError::InvalidInput`] if `post_id` is not a valid id.
    /// - [`ServiceError::NotFound`] if the post does not exist.
    /// - [`ServiceError::Conflict`] if every attempt lost a race.
    /// - [`ServiceError::Internal`] on storage failure.
    pub async fn perform(
        &self,
        action: NamedAction,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        let (post_id, user) = validate(post_id, caller)?;
        self.run(post_id, user, Plan::Fixed(action)).await
    }

    /// Flip `caller`'s membership in `kind`.
    ///
    /// The current flag is read and the resulting named action applied
    /// inside the same compare-and-swap attempt, so two rapid toggles can
    /// never both decide from the same stale state.
    ///
    /// # Errors
    ///
    /// See [`InteractionService::perform`].
    pub async fn toggle(
        &self,
        kind: InteractionKind,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        let (post_id, user) = validate(post_id, caller)?;
        self.run(post_id, user, Plan::Toggle(kind)).await
    }

    /// `caller`'s flags on the post, restricted to `filter` if given.
    ///
    /// # Errors
    ///
    /// Unauthenticated, invalid input, not found, or internal; see
    /// [`InteractionService::perform`].
    pub async fn flags(
        &self,
        post_id: &str,
        caller: Option<UserId>,
        filter: Option<&InteractionFilter>,
    ) -> Result<PartialFlags, ServiceError> {
        let (post_id, user) = validate(post_id, caller)?;
        Ok(self.query.flags_for(post_id, user, filter).await?)
    }

    /// Counts, version and flags for `caller` on the post.
    ///
    /// # Errors
    ///
    /// Unauthenticated, invalid input, not found, or internal; see
    /// [`InteractionService::perform`].
    pub async fn summary(
        &self,
        post_id: &str,
        caller: Option<UserId>,
    ) -> Result<InteractionOutcome, ServiceError> {
        let (post_id, user) = validate(post_id, caller)?;
        Ok(self.query.summary(post_id, user).await?)
    }

    async fn run(
        &self,
        post_id: PostId,
        user: UserId,
        plan: Plan,
    ) -> Result<InteractionOutcome, ServiceError> {
        let max_attempts = self.policy.max_attempts();
        for attempt in 1..=max_attempts {
            let result = match plan {
                Plan::Fixed(action) => {
                    self.engine
                        .apply(post_id, user, None, action.operations())
                        .await
                }
                Plan::Toggle(kind) => {
                    let current = self.query.load(post_id).await?;
                    let action = NamedAction::toggle(kind, &current.flags_for(user));
                    debug!(%post_id, %user, %kind, %action, "toggle resolved");
                    self.engine
                        .apply(post_id, user, Some(current.version), action.operations())
                        .await
                }
            };

            match result {
                Ok(applied) => {
                    if applied.changed {
                        info!(%post_id, %user, ?plan, version = applied.set.version, attempt, "interaction applied");
                    }
                    return Ok(InteractionOutcome::from_set(post_id, &applied.set, user));
                }
                Err(EngineError::Conflict { found, .. }) => {
                    debug!(%post_id, %user, attempt, found, "conflict, re-reading");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(%post_id, %user, ?plan, attempts = max_attempts, "retries exhausted");
        Err(ServiceError::Conflict {
            post_id,
            attempts: max_attempts,
        })
    }
}

/// Check caller presence, then post id well-formedness.
fn validate(post_id: &str, caller: Option<UserId>) -> Result<(PostId, UserId), ServiceError> {
    let user = caller.ok_or(ServiceError::Unauthenticated)?;
    let post_id = PostId::parse(post_id)
        .ok_or_else(|| ServiceError::InvalidInput(format!("post id `{post_id}` is invalid")))?;
    Ok((post_id, user))
}
