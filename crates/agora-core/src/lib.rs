//! Per-post interaction state machine for Agora.
//!
//! Upvote, downvote, hide and follow are per-user memberships on a post.
//! Votes are mutually exclusive, every membership change is idempotent,
//! and concurrent writers on the same post are serialized by a
//! compare-and-swap on the set's version rather than by locks.
//!
//! # Architecture
//!
//! ```text
//! InteractionService  -- validation, named action -> operation sequence,
//!     |                  bounded retry on conflict
//!     +-- InteractionEngine -- load, pure transition, one CAS, no retries
//!     +-- InteractionQuery  -- flags and aggregates from committed state
//!             |
//!             +-- PostStore (memory here, PostgreSQL in agora-db)
//! ```
//!
//! # Modules
//!
//! - [`engine`] -- Pure transition and atomic application
//! - [`query`] -- Flag projection and aggregate reads
//! - [`service`] -- Named actions, validation and retry policy
//! - [`store`] -- The storage trait and an in-memory implementation
//! - [`config`] -- YAML configuration
//! - [`error`] -- Error taxonomy

pub mod config;
pub mod engine;
pub mod error;
pub mod query;
pub mod service;
pub mod store;

pub use config::{AgoraConfig, ConfigError};
pub use engine::{Applied, InteractionEngine, transition};
pub use error::{EngineError, ServiceError, StoreError};
pub use query::InteractionQuery;
pub use service::{InteractionService, RetryPolicy};
pub use store::{CasOutcome, MemoryPostStore, PostStore};
