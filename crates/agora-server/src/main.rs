//! Agora interaction server.
//!
//! Loads configuration, picks the storage and authentication backends it
//! names, and serves the interaction API until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `agora-config.yaml` (or defaults)
//! 2. Initialize structured logging (tracing)
//! 3. Open the interaction store (in-memory, or `PostgreSQL` + migrations)
//! 4. Open the authenticator (static tokens, or `Dragonfly` sessions)
//! 5. Serve HTTP until shutdown

mod auth;
mod error;

use std::path::Path;
use std::sync::Arc;

use agora_api::{AppState, Authenticator, StaticTokens};
use agora_core::config::{AuthBackend, LogFormat, LoggingConfig, StorageBackend};
use agora_core::{AgoraConfig, InteractionService, MemoryPostStore, PostStore, RetryPolicy};
use agora_db::{DragonflyPool, PostgresConfig, PostgresPool};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::auth::DragonflySessions;
use crate::error::ServerError;

const CONFIG_PATH: &str = "agora-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, a backend connection, or the HTTP
/// server fails.
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = load_config()?;
    init_tracing(&config.logging);

    info!(
        host = config.server.host,
        port = config.server.port,
        max_attempts = config.interactions.max_attempts,
        storage = ?config.storage.backend,
        auth = ?config.auth.backend,
        "agora-server starting"
    );

    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("using in-memory storage; interactions are lost on restart");
            with_auth(&config, MemoryPostStore::new()).await
        }
        StorageBackend::Postgres => {
            let pool = PostgresPool::connect(&PostgresConfig::from(&config.infrastructure)).await?;
            pool.run_migrations().await?;
            let result = with_auth(&config, pool.interactions()).await;
            pool.close().await;
            result
        }
    }
}

/// Open the configured authenticator, then serve with `store`.
async fn with_auth<S>(config: &AgoraConfig, store: S) -> Result<(), ServerError>
where
    S: PostStore + Clone + 'static,
{
    match config.auth.backend {
        AuthBackend::Static => {
            if config.auth.tokens.is_empty() {
                warn!("static auth has no tokens; every request will be rejected");
            }
            serve(config, store, StaticTokens::new(config.auth.tokens.clone())).await
        }
        AuthBackend::Dragonfly => {
            let pool = DragonflyPool::connect(&config.infrastructure.dragonfly_url).await?;
            serve(config, store, DragonflySessions::new(pool)).await
        }
    }
}

async fn serve<S, A>(config: &AgoraConfig, store: S, auth: A) -> Result<(), ServerError>
where
    S: PostStore + Clone + 'static,
    A: Authenticator + 'static,
{
    let service = InteractionService::new(store, RetryPolicy::from(&config.interactions));
    let state = Arc::new(AppState::new(service, auth));
    agora_api::start_server(&config.server, state).await?;
    Ok(())
}

/// Load configuration from `agora-config.yaml`.
///
/// Falls back to defaults (still honoring env overrides) when the file
/// does not exist.
fn load_config() -> Result<AgoraConfig, ServerError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(AgoraConfig::from_file(config_path)?)
    } else {
        let mut config = AgoraConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }
}

/// Initialize the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
