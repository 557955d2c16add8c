//! Shared type definitions for Agora post interactions.
//!
//! This crate is the single source of truth for the interaction data
//! model used by the server, the storage layer and the client
//! reconciler. Types flow to `TypeScript` via `ts-rs` for the browser
//! client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for posts and users
//! - [`enums`] -- Interaction kinds and operation actions
//! - [`actions`] -- Operations and the named-action table
//! - [`structs`] -- The interaction set, flags, filters and outcomes

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{NamedAction, Operation, OperationSequence};
pub use enums::{InteractionKind, OperationAction};
pub use ids::{PostId, UserId};
pub use structs::{
    InteractionFilter, InteractionFlags, InteractionOutcome, InteractionSet, PartialFlags,
    UnknownKind,
};
