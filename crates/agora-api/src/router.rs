//! Axum router construction for the interaction API.

use std::sync::Arc;

use agora_core::PostStore;
use axum::Router;
use axum::routing::{get, patch};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::Authenticator;
use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness probe
/// - `PATCH /posts/{id}/{action}` -- the seven named actions
/// - `PATCH /posts/{id}/toggle/{kind}` -- flip one flag
/// - `GET /posts/{id}/interactions` -- caller's flags
/// - `GET /posts/{id}/interactions/summary` -- counts, version and flags
///
/// CORS allows any origin so browser clients on other hosts can call it.
pub fn build_router<S, A>(state: Arc<AppState<S, A>>) -> Router
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Mutations
        .route("/posts/{id}/upvote", patch(handlers::upvote::<S, A>))
        .route("/posts/{id}/downvote", patch(handlers::downvote::<S, A>))
        .route("/posts/{id}/unvote", patch(handlers::unvote::<S, A>))
        .route("/posts/{id}/hide", patch(handlers::hide::<S, A>))
        .route("/posts/{id}/unhide", patch(handlers::unhide::<S, A>))
        .route("/posts/{id}/follow", patch(handlers::follow::<S, A>))
        .route("/posts/{id}/unfollow", patch(handlers::unfollow::<S, A>))
        .route("/posts/{id}/toggle/{kind}", patch(handlers::toggle::<S, A>))
        // Queries
        .route(
            "/posts/{id}/interactions",
            get(handlers::get_interactions::<S, A>),
        )
        .route(
            "/posts/{id}/interactions/summary",
            get(handlers::get_summary::<S, A>),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
