//! Data layer for Agora post interactions (`PostgreSQL` + `Dragonfly`).
//!
//! `PostgreSQL` holds the authoritative interaction set of every post and
//! serves both reads and version-checked writes, so a caller always reads
//! its own writes. `Dragonfly` holds login sessions written by the
//! sign-in service; the API reads them to authenticate callers.
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`interaction_store`] -- [`PostStore`](agora_core::PostStore) over `post_interactions`
//! - [`dragonfly`] -- `Dragonfly` session lookup
//! - [`error`] -- Shared error types

pub mod dragonfly;
pub mod error;
pub mod interaction_store;
pub mod postgres;

// Re-export primary types for convenience.
pub use dragonfly::DragonflyPool;
pub use error::DbError;
pub use interaction_store::PgInteractionStore;
pub use postgres::{PostgresConfig, PostgresPool};
