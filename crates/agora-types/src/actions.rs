//! Operations and the named-action table.
//!
//! A [`NamedAction`] is what a caller asks for (`upvote`, `unfollow`, ...).
//! Each one maps to a fixed [`OperationSequence`] that the engine applies
//! left to right. The order inside a sequence is what keeps votes mutually
//! exclusive: `upvote` removes any downvote before adding the upvote.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{InteractionKind, OperationAction};
use crate::structs::InteractionFlags;

/// A single add/remove instruction against one interaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Operation {
    /// Add or remove.
    pub action: OperationAction,
    /// Which member set the operation targets.
    pub kind: InteractionKind,
}

impl Operation {
    /// An operation adding the user to `kind`.
    pub const fn add(kind: InteractionKind) -> Self {
        Self {
            action: OperationAction::Add,
            kind,
        }
    }

    /// An operation removing the user from `kind`.
    pub const fn remove(kind: InteractionKind) -> Self {
        Self {
            action: OperationAction::Remove,
            kind,
        }
    }
}

/// An ordered list of operations applied atomically against one post.
pub type OperationSequence = [Operation];

const ADD_UPVOTE: Operation = Operation::add(InteractionKind::Upvote);
const REMOVE_UPVOTE: Operation = Operation::remove(InteractionKind::Upvote);
const ADD_DOWNVOTE: Operation = Operation::add(InteractionKind::Downvote);
const REMOVE_DOWNVOTE: Operation = Operation::remove(InteractionKind::Downvote);

const UPVOTE_OPS: &OperationSequence = &[REMOVE_DOWNVOTE, ADD_UPVOTE];
const DOWNVOTE_OPS: &OperationSequence = &[REMOVE_UPVOTE, ADD_DOWNVOTE];
const UNVOTE_OPS: &OperationSequence = &[REMOVE_UPVOTE, REMOVE_DOWNVOTE];
const HIDE_OPS: &OperationSequence = &[Operation::add(InteractionKind::Hide)];
const UNHIDE_OPS: &OperationSequence = &[Operation::remove(InteractionKind::Hide)];
const FOLLOW_OPS: &OperationSequence = &[Operation::add(InteractionKind::Follow)];
const UNFOLLOW_OPS: &OperationSequence = &[Operation::remove(InteractionKind::Follow)];

// ---------------------------------------------------------------------------
// Named actions
// ---------------------------------------------------------------------------

/// A caller-visible interaction action on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NamedAction {
    /// Replace any downvote with an upvote.
    Upvote,
    /// Replace any upvote with a downvote.
    Downvote,
    /// Clear both votes.
    Unvote,
    /// Hide the post.
    Hide,
    /// Stop hiding the post.
    Unhide,
    /// Follow the post.
    Follow,
    /// Stop following the post.
    Unfollow,
}

impl NamedAction {
    /// Every named action.
    pub const ALL: [Self; 7] = [
        Self::Upvote,
        Self::Downvote,
        Self::Unvote,
        Self::Hide,
        Self::Unhide,
        Self::Follow,
        Self::Unfollow,
    ];

    /// The fixed operation sequence this action applies.
    pub const fn operations(self) -> &'static OperationSequence {
        match self {
            Self::Upvote => UPVOTE_OPS,
            Self::Downvote => DOWNVOTE_OPS,
            Self::Unvote => UNVOTE_OPS,
            Self::Hide => HIDE_OPS,
            Self::Unhide => UNHIDE_OPS,
            Self::Follow => FOLLOW_OPS,
            Self::Unfollow => UNFOLLOW_OPS,
        }
    }

    /// The wire name of this action (the last path segment of its route).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
            Self::Unvote => "unvote",
            Self::Hide => "hide",
            Self::Unhide => "unhide",
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
        }
    }

    /// Resolve a toggle on `kind` against the user's current flags.
    ///
    /// Toggling a set flag clears it; toggling a clear flag sets it. For
    /// votes, clearing always maps to [`NamedAction::Unvote`].
    pub const fn toggle(kind: InteractionKind, current: &InteractionFlags) -> Self {
        match kind {
            InteractionKind::Upvote if current.upvote => Self::Unvote,
            InteractionKind::Upvote => Self::Upvote,
            InteractionKind::Downvote if current.downvote => Self::Unvote,
            InteractionKind::Downvote => Self::Downvote,
            InteractionKind::Hide if current.hide => Self::Unhide,
            InteractionKind::Hide => Self::Hide,
            InteractionKind::Follow if current.follow => Self::Unfollow,
            InteractionKind::Follow => Self::Follow,
        }
    }
}

impl core::fmt::Display for NamedAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
