//! Error types for the server binary.
//!
//! [`ServerError`] wraps every failure mode during startup and serving so
//! `main` can propagate with `?`.

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: agora_core::ConfigError,
    },

    /// A database or session store could not be reached or migrated.
    #[error("database error: {source}")]
    Db {
        /// The underlying data layer error.
        #[from]
        source: agora_db::DbError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("api error: {source}")]
    Api {
        /// The underlying server error.
        #[from]
        source: agora_api::ServerError,
    },
}
