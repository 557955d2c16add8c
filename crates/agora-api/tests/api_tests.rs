//! Integration tests for the interaction API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` against
//! an in-memory store, without starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use agora_api::{AppState, StaticTokens, build_router};
use agora_core::{InteractionService, MemoryPostStore, PostStore, RetryPolicy};
use agora_types::{PostId, UserId};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";

async fn make_app() -> (Router, PostId) {
    let store = MemoryPostStore::new();
    let post = PostId::new();
    store.create(post).await.unwrap();

    let auth = StaticTokens::default()
        .with_token(ALICE, UserId::new())
        .with_token(BOB, UserId::new());
    let service = InteractionService::new(store, RetryPolicy::default());
    let router = build_router(Arc::new(AppState::new(service, auth)));
    (router, post)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = make_app().await;
    let (status, json) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, post) = make_app().await;
    let (status, json) =
        send(&app, Method::PATCH, &format!("/posts/{post}/upvote"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["status"], 401);
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let (app, post) = make_app().await;
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/posts/{post}/interactions"),
        Some("stranger"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_post_id_is_bad_request() {
    let (app, _) = make_app().await;
    let (status, _) = send(&app, Method::PATCH, "/posts/not-a-uuid/hide", Some(ALICE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let (app, _) = make_app().await;
    let ghost = PostId::new();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/posts/{ghost}/follow"),
        Some(ALICE),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/posts/{ghost}/interactions"),
        Some(ALICE),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_votes_aggregate_across_users() {
    let (app, post) = make_app().await;

    let (status, json) =
        send(&app, Method::PATCH, &format!("/posts/{post}/upvote"), Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["upvotes"], 1);
    assert_eq!(json["flags"]["upvote"], true);

    let (_, json) =
        send(&app, Method::PATCH, &format!("/posts/{post}/downvote"), Some(BOB)).await;
    assert_eq!(json["upvotes"], 1);
    assert_eq!(json["downvotes"], 1);
    assert_eq!(json["flags"]["downvote"], true);
    assert_eq!(json["flags"]["upvote"], false);

    // Switching replaces the earlier vote.
    let (_, json) =
        send(&app, Method::PATCH, &format!("/posts/{post}/downvote"), Some(ALICE)).await;
    assert_eq!(json["upvotes"], 0);
    assert_eq!(json["downvotes"], 2);
    assert_eq!(json["version"], 3);
}

#[tokio::test]
async fn test_repeated_action_does_not_bump_version() {
    let (app, post) = make_app().await;
    let uri = format!("/posts/{post}/hide");

    let (_, first) = send(&app, Method::PATCH, &uri, Some(ALICE)).await;
    let (status, second) = send(&app, Method::PATCH, &uri, Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["version"], 1);
    assert_eq!(second["version"], 1);
    assert_eq!(second["flags"]["hide"], true);
}

#[tokio::test]
async fn test_filtered_query_returns_only_requested_flags() {
    let (app, post) = make_app().await;
    send(&app, Method::PATCH, &format!("/posts/{post}/follow"), Some(ALICE)).await;

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/posts/{post}/interactions?filter=follow,hide"),
        Some(ALICE),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["follow"], true);
    assert_eq!(json["hide"], false);
    assert!(json.get("upvote").is_none());
    assert!(json.get("downvote").is_none());

    let (_, json) = send(
        &app,
        Method::GET,
        &format!("/posts/{post}/interactions"),
        Some(ALICE),
    )
    .await;
    assert_eq!(json.as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unknown_filter_is_bad_request() {
    let (app, post) = make_app().await;
    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/posts/{post}/interactions?filter=upvote,bookmark"),
        Some(ALICE),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_json_object_filter_is_bad_request() {
    let (app, post) = make_app().await;
    // ?filter={"upvote":true}
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/posts/{post}/interactions?filter=%7B%22upvote%22%3Atrue%7D"),
        Some(ALICE),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toggle_flips_and_restores() {
    let (app, post) = make_app().await;
    let uri = format!("/posts/{post}/toggle/upvote");

    let (_, on) = send(&app, Method::PATCH, &uri, Some(BOB)).await;
    assert_eq!(on["flags"]["upvote"], true);
    assert_eq!(on["upvotes"], 1);

    let (_, off) = send(&app, Method::PATCH, &uri, Some(BOB)).await;
    assert_eq!(off["flags"]["upvote"], false);
    assert_eq!(off["upvotes"], 0);
}

#[tokio::test]
async fn test_toggle_unknown_kind_is_bad_request() {
    let (app, post) = make_app().await;
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/posts/{post}/toggle/bookmark"),
        Some(BOB),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary_reflects_previous_write() {
    let (app, post) = make_app().await;
    send(&app, Method::PATCH, &format!("/posts/{post}/upvote"), Some(ALICE)).await;

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/posts/{post}/interactions/summary"),
        Some(BOB),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["upvotes"], 1);
    assert_eq!(json["version"], 1);
    assert_eq!(json["flags"]["upvote"], false);
}
