//! Shared application state for the interaction API.

use agora_core::{InteractionService, PostStore};

use crate::auth::Authenticator;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. Holds no per-request data and no locks: concurrency control
/// lives entirely in the store's compare-and-swap.
pub struct AppState<S, A> {
    /// The interaction service.
    pub service: InteractionService<S>,
    /// Resolves bearer tokens to users.
    pub auth: A,
}

impl<S: PostStore, A: Authenticator> AppState<S, A> {
    /// Bundle a service and an authenticator.
    pub const fn new(service: InteractionService<S>, auth: A) -> Self {
        Self { service, auth }
    }
}
