//! Enumeration types for post interactions.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Interaction kinds
// ---------------------------------------------------------------------------

/// One of the four per-user interactions a post tracks.
///
/// `Upvote` and `Downvote` are mutually exclusive for a given user.
/// `Hide` and `Follow` are independent of votes and of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum InteractionKind {
    /// The user endorses the post.
    Upvote,
    /// The user disapproves of the post.
    Downvote,
    /// The user hid the post from their feeds.
    Hide,
    /// The user follows the post for activity.
    Follow,
}

impl InteractionKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Upvote, Self::Downvote, Self::Hide, Self::Follow];

    /// The wire name of this kind (as used in paths and filters).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
            Self::Hide => "hide",
            Self::Follow => "follow",
        }
    }

    /// Parse a wire name. Surrounding whitespace is ignored; matching is case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "upvote" => Some(Self::Upvote),
            "downvote" => Some(Self::Downvote),
            "hide" => Some(Self::Hide),
            "follow" => Some(Self::Follow),
            _ => None,
        }
    }

    /// Whether this kind is one of the two mutually exclusive votes.
    pub const fn is_vote(self) -> bool {
        matches!(self, Self::Upvote | Self::Downvote)
    }
}

impl core::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Operation action
// ---------------------------------------------------------------------------

/// Whether an [`Operation`](crate::Operation) adds or removes membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum OperationAction {
    /// Insert the user into the kind's member set.
    Add,
    /// Remove the user from the kind's member set.
    Remove,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_kind() {
        for kind in InteractionKind::ALL {
            assert_eq!(InteractionKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_wrong_case() {
        assert_eq!(InteractionKind::parse("like"), None);
        assert_eq!(InteractionKind::parse("Upvote"), None);
        assert_eq!(InteractionKind::parse(" hide "), Some(InteractionKind::Hide));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&InteractionKind::Downvote).ok();
        assert_eq!(json.as_deref(), Some("\"downvote\""));
    }
}
