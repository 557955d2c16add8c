//! Listener lifecycle.
//!
//! [`start_server`] binds the configured address and serves the router
//! until `Ctrl-C`. Shutdown is graceful: accepted requests, including
//! their spawned mutations, finish before it returns.

use std::net::SocketAddr;
use std::sync::Arc;

use agora_core::PostStore;
use agora_core::config::ServerSettings;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::auth::Authenticator;
use crate::router::build_router;
use crate::state::AppState;

/// Serve the interaction API on `settings.host:settings.port`.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is invalid or taken, and
/// [`ServerError::Serve`] if the accept loop fails.
pub async fn start_server<S, A>(
    settings: &ServerSettings,
    state: Arc<AppState<S, A>>,
) -> Result<(), ServerError>
where
    S: PostStore + 'static,
    A: Authenticator + 'static,
{
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address {}: {e}", settings.host)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("{addr}: {e}")))?;
    info!(%addr, "Interaction API listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(ctrl_c())
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    info!("Interaction API stopped");
    Ok(())
}

/// Resolves on `Ctrl-C`, or at once if the signal cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C; shutting down");
    }
}

/// Listener failures.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The address could not be parsed or bound.
    #[error("cannot bind {0}")]
    Bind(String),

    /// The accept loop failed.
    #[error("server failed: {0}")]
    Serve(String),
}
