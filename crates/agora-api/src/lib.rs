//! HTTP surface for post interactions.
//!
//! This crate provides an Axum server exposing the named interaction
//! actions as `PATCH` endpoints and the caller's flags as `GET`
//! endpoints. Every request is authenticated from its bearer token
//! through an [`Authenticator`]; the resolved user is passed to the
//! [`InteractionService`](agora_core::InteractionService) which owns
//! validation, retries and the compare-and-swap protocol.
//!
//! # Status codes
//!
//! | Failure | Status |
//! |---------|--------|
//! | No or unknown token | `401` |
//! | Malformed post id, unknown kind or filter | `400` |
//! | Post does not exist | `404` |
//! | Retry budget exhausted | `409` |
//! | Storage or auth backend failure | `500` |

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AuthError, Authenticator, StaticTokens};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
