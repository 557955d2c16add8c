//! REST endpoint handlers for the interaction API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `PATCH` | `/posts/{id}/upvote` | Replace any downvote with an upvote |
//! | `PATCH` | `/posts/{id}/downvote` | Replace any upvote with a downvote |
//! | `PATCH` | `/posts/{id}/unvote` | Clear both votes |
//! | `PATCH` | `/posts/{id}/hide` | Hide the post |
//! | `PATCH` | `/posts/{id}/unhide` | Unhide the post |
//! | `PATCH` | `/posts/{id}/follow` | Follow the post |
//! | `PATCH` | `/posts/{id}/unfollow` | Unfollow the post |
//! | `PATCH` | `/posts/{id}/toggle/{kind}` | Flip one flag |
//! | `GET` | `/posts/{id}/interactions` | Caller's flags (`?filter=upvote,hide`) |
//! | `GET` | `/posts/{id}/interactions/summary` | Counts, version and flags |
//!
//! `filter` is a comma-separated list of kinds, not the JSON object
//! (`?filter={"upvote":true}`) older clients sent; that form is rejected as `400`.
//!
//! Mutations run on a spawned task: once a request is accepted, a client
//! disconnect drops only the response, never the write.

use std::sync::Arc;

use agora_core::PostStore;
use agora_types::{
    InteractionFilter, InteractionKind, InteractionOutcome, NamedAction, PartialFlags,
};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;

use crate::auth::{Authenticator, current_user};
use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /posts/{id}/interactions`.
#[derive(Debug, serde::Deserialize)]
pub struct InteractionsQuery {
    /// Comma-separated kinds to compute. Absent or empty means all four.
    pub filter: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// PATCH /posts/{id}/{action}
// ---------------------------------------------------------------------------

/// Resolve the caller, then run `action` to completion on its own task.
async fn act<S, A>(
    state: Arc<AppState<S, A>>,
    headers: &HeaderMap,
    post_id: String,
    action: NamedAction,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    let caller = current_user(&state.auth, headers).await?;
    let task = tokio::spawn(async move { state.service.perform(action, &post_id, caller).await });
    let outcome = task
        .await
        .map_err(|e| ApiError::Internal(format!("{action} task failed: {e}")))??;
    Ok(Json(outcome))
}

/// `PATCH /posts/{id}/upvote`.
pub async fn upvote<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    act(state, &headers, id, NamedAction::Upvote).await
}

/// `PATCH /posts/{id}/downvote`.
pub async fn downvote<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    act(state, &headers, id, NamedAction::Downvote).await
}

/// `PATCH /posts/{id}/unvote`.
pub async fn unvote<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    act(state, &headers, id, NamedAction::Unvote).await
}

/// `PATCH /posts/{id}/hide`.
pub async fn hide<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    act(state, &headers, id, NamedAction::Hide).await
}

/// `PATCH /posts/{id}/unhide`.
pub async fn unhide<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    act(state, &headers, id, NamedAction::Unhide).await
}

/// `PATCH /posts/{id}/follow`.
pub async fn follow<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    act(state, &headers, id, NamedAction::Follow).await
}

/// `PATCH /posts/{id}/unfollow`.
pub async fn unfollow<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    act(state, &headers, id, NamedAction::Unfollow).await
}

// ---------------------------------------------------------------------------
// PATCH /posts/{id}/toggle/{kind}
// ---------------------------------------------------------------------------

/// Flip the caller's membership in `kind`.
///
/// The decision is made from the stored set inside the same
/// compare-and-swap attempt as the write.
pub async fn toggle<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    let kind = InteractionKind::parse(&kind)
        .ok_or_else(|| ApiError::InvalidQuery(format!("unknown interaction kind `{kind}`")))?;
    let caller = current_user(&state.auth, &headers).await?;
    let task = tokio::spawn(async move { state.service.toggle(kind, &id, caller).await });
    let outcome = task
        .await
        .map_err(|e| ApiError::Internal(format!("toggle {kind} task failed: {e}")))??;
    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// GET /posts/{id}/interactions
// ---------------------------------------------------------------------------

/// Return the caller's flags, restricted to `?filter=` when present.
pub async fn get_interactions<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<InteractionsQuery>,
) -> Result<Json<PartialFlags>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    let filter = params
        .filter
        .as_deref()
        .map(InteractionFilter::parse_list)
        .transpose()
        .map_err(|e| ApiError::InvalidQuery(e.to_string()))?
        .filter(|f| !f.is_empty());

    let caller = current_user(&state.auth, &headers).await?;
    let flags = state.service.flags(&id, caller, filter.as_ref()).await?;
    Ok(Json(flags))
}

// ---------------------------------------------------------------------------
// GET /posts/{id}/interactions/summary
// ---------------------------------------------------------------------------

/// Return counts, version and all of the caller's flags.
pub async fn get_summary<S, A>(
    State(state): State<Arc<AppState<S, A>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<InteractionOutcome>, ApiError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    let caller = current_user(&state.auth, &headers).await?;
    let outcome = state.service.summary(&id, caller).await?;
    Ok(Json(outcome))
}
