//! Core entity structs: the per-post interaction set and the payloads
//! derived from it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::InteractionKind;
use crate::ids::{PostId, UserId};

// ---------------------------------------------------------------------------
// InteractionSet
// ---------------------------------------------------------------------------

/// The mutable per-post collection of user interaction memberships.
///
/// One instance exists per post. `version` advances by exactly one on
/// every mutation that changes membership and never on a no-op, so it can
/// serve as the compare-and-swap token for concurrent writers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InteractionSet {
    /// Users who upvoted the post.
    pub upvotes: BTreeSet<UserId>,
    /// Users who downvoted the post.
    pub downvotes: BTreeSet<UserId>,
    /// Users who hid the post.
    pub hides: BTreeSet<UserId>,
    /// Users who follow the post.
    pub follows: BTreeSet<UserId>,
    /// Monotonic mutation counter.
    pub version: u64,
}

impl InteractionSet {
    /// Create an empty set at version 0.
    pub const fn new() -> Self {
        Self {
            upvotes: BTreeSet::new(),
            downvotes: BTreeSet::new(),
            hides: BTreeSet::new(),
            follows: BTreeSet::new(),
            version: 0,
        }
    }

    /// The member set for `kind`.
    pub const fn members(&self, kind: InteractionKind) -> &BTreeSet<UserId> {
        match kind {
            InteractionKind::Upvote => &self.upvotes,
            InteractionKind::Downvote => &self.downvotes,
            InteractionKind::Hide => &self.hides,
            InteractionKind::Follow => &self.follows,
        }
    }

    const fn members_mut(&mut self, kind: InteractionKind) -> &mut BTreeSet<UserId> {
        match kind {
            InteractionKind::Upvote => &mut self.upvotes,
            InteractionKind::Downvote => &mut self.downvotes,
            InteractionKind::Hide => &mut self.hides,
            InteractionKind::Follow => &mut self.follows,
        }
    }

    /// Whether `user` is a member of `kind`.
    pub fn contains(&self, kind: InteractionKind, user: UserId) -> bool {
        self.members(kind).contains(&user)
    }

    /// Add `user` to `kind`. Returns `true` if membership changed.
    ///
    /// Does not touch `version`; the engine owns version bookkeeping.
    pub fn insert(&mut self, kind: InteractionKind, user: UserId) -> bool {
        self.members_mut(kind).insert(user)
    }

    /// Remove `user` from `kind`. Returns `true` if membership changed.
    pub fn remove(&mut self, kind: InteractionKind, user: UserId) -> bool {
        self.members_mut(kind).remove(&user)
    }

    /// Whether two sets hold identical memberships, ignoring `version`.
    pub fn same_members(&self, other: &Self) -> bool {
        self.upvotes == other.upvotes
            && self.downvotes == other.downvotes
            && self.hides == other.hides
            && self.follows == other.follows
    }

    /// Whether no user is both an upvoter and a downvoter.
    pub fn votes_are_exclusive(&self) -> bool {
        self.upvotes.is_disjoint(&self.downvotes)
    }

    /// Number of upvotes, derived from membership.
    pub fn upvote_count(&self) -> u64 {
        u64::try_from(self.upvotes.len()).unwrap_or(u64::MAX)
    }

    /// Number of downvotes, derived from membership.
    pub fn downvote_count(&self) -> u64 {
        u64::try_from(self.downvotes.len()).unwrap_or(u64::MAX)
    }

    /// All four flags for `user`.
    pub fn flags_for(&self, user: UserId) -> InteractionFlags {
        InteractionFlags {
            upvote: self.upvotes.contains(&user),
            downvote: self.downvotes.contains(&user),
            hide: self.hides.contains(&user),
            follow: self.follows.contains(&user),
        }
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// A single user's membership across the four interaction kinds.
///
/// Derived on demand from an [`InteractionSet`]; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InteractionFlags {
    /// The user upvoted the post.
    pub upvote: bool,
    /// The user downvoted the post.
    pub downvote: bool,
    /// The user hid the post.
    pub hide: bool,
    /// The user follows the post.
    pub follow: bool,
}

impl InteractionFlags {
    /// The flag for `kind`.
    pub const fn get(&self, kind: InteractionKind) -> bool {
        match kind {
            InteractionKind::Upvote => self.upvote,
            InteractionKind::Downvote => self.downvote,
            InteractionKind::Hide => self.hide,
            InteractionKind::Follow => self.follow,
        }
    }

    /// Set the flag for `kind`.
    pub const fn set(&mut self, kind: InteractionKind, value: bool) {
        match kind {
            InteractionKind::Upvote => self.upvote = value,
            InteractionKind::Downvote => self.downvote = value,
            InteractionKind::Hide => self.hide = value,
            InteractionKind::Follow => self.follow = value,
        }
    }
}

/// A filtered view of [`InteractionFlags`].
///
/// Flags outside the requested filter are `None` and omitted from JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PartialFlags {
    /// Upvote flag, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub upvote: Option<bool>,
    /// Downvote flag, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub downvote: Option<bool>,
    /// Hide flag, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub hide: Option<bool>,
    /// Follow flag, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub follow: Option<bool>,
}

impl PartialFlags {
    /// Set the entry for `kind`.
    pub const fn set(&mut self, kind: InteractionKind, value: bool) {
        let slot = match kind {
            InteractionKind::Upvote => &mut self.upvote,
            InteractionKind::Downvote => &mut self.downvote,
            InteractionKind::Hide => &mut self.hide,
            InteractionKind::Follow => &mut self.follow,
        };
        *slot = Some(value);
    }
}

impl From<InteractionFlags> for PartialFlags {
    fn from(flags: InteractionFlags) -> Self {
        Self {
            upvote: Some(flags.upvote),
            downvote: Some(flags.downvote),
            hide: Some(flags.hide),
            follow: Some(flags.follow),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Restricts which flags a query computes.
///
/// An absent filter means all four kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionFilter {
    kinds: BTreeSet<InteractionKind>,
}

impl InteractionFilter {
    /// A filter selecting exactly `kinds`.
    pub fn only(kinds: impl IntoIterator<Item = InteractionKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list such as `upvote,downvote`.
    ///
    /// Empty segments are skipped, so an empty string yields an empty
    /// filter (which the caller may treat as "no filter").
    ///
    /// # Errors
    ///
    /// Returns [`UnknownKind`] naming the first segment that is not an
    /// interaction kind.
    pub fn parse_list(s: &str) -> Result<Self, UnknownKind> {
        s.split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                InteractionKind::parse(segment).ok_or_else(|| UnknownKind(segment.to_owned()))
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|kinds| Self { kinds })
    }

    /// Whether `kind` is selected.
    pub fn includes(&self, kind: InteractionKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Whether the filter selects nothing.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Selected kinds in display order.
    pub fn kinds(&self) -> impl Iterator<Item = InteractionKind> + '_ {
        self.kinds.iter().copied()
    }
}

/// A filter segment that does not name an interaction kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interaction kind `{0}`")]
pub struct UnknownKind(pub String);

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The authoritative aggregate returned after every action.
///
/// Carries the derived counts, the version they were read at, and the
/// caller's own flags. Clients overwrite any optimistic state with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InteractionOutcome {
    /// The post the aggregate belongs to.
    pub post_id: PostId,
    /// `|upvotes|`.
    pub upvotes: u64,
    /// `|downvotes|`.
    pub downvotes: u64,
    /// Version of the set the aggregate was computed from.
    pub version: u64,
    /// The caller's flags at that version.
    pub flags: InteractionFlags,
}

impl InteractionOutcome {
    /// Build the aggregate for `user` from a committed set.
    pub fn from_set(post_id: PostId, set: &InteractionSet, user: UserId) -> Self {
        Self {
            post_id,
            upvotes: set.upvote_count(),
            downvotes: set.downvote_count(),
            version: set.version,
            flags: set.flags_for(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_report_changes() {
        let mut set = InteractionSet::new();
        let user = UserId::new();

        assert!(set.insert(InteractionKind::Hide, user));
        assert!(!set.insert(InteractionKind::Hide, user));
        assert!(set.contains(InteractionKind::Hide, user));
        assert!(set.remove(InteractionKind::Hide, user));
        assert!(!set.remove(InteractionKind::Hide, user));
        assert_eq!(set.version, 0);
    }

    #[test]
    fn same_members_ignores_version() {
        let a = InteractionSet::new();
        let b = InteractionSet {
            version: 9,
            ..InteractionSet::new()
        };
        assert!(a.same_members(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn exclusivity_detects_double_vote() {
        let user = UserId::new();
        let mut set = InteractionSet::new();
        set.insert(InteractionKind::Upvote, user);
        assert!(set.votes_are_exclusive());
        set.insert(InteractionKind::Downvote, user);
        assert!(!set.votes_are_exclusive());
    }

    #[test]
    fn counts_are_derived_from_membership() {
        let mut set = InteractionSet::new();
        set.insert(InteractionKind::Upvote, UserId::new());
        set.insert(InteractionKind::Upvote, UserId::new());
        set.insert(InteractionKind::Downvote, UserId::new());
        assert_eq!(set.upvote_count(), 2);
        assert_eq!(set.downvote_count(), 1);
    }

    #[test]
    fn filter_parses_comma_list() {
        let filter = InteractionFilter::parse_list("upvote, follow,,").ok();
        assert_eq!(
            filter,
            Some(InteractionFilter::only([
                InteractionKind::Upvote,
                InteractionKind::Follow
            ]))
        );
    }

    #[test]
    fn filter_rejects_unknown_segment() {
        let err = InteractionFilter::parse_list("upvote,like");
        assert_eq!(err, Err(UnknownKind("like".to_owned())));
    }

    #[test]
    fn unknown_kind_message_names_the_segment() {
        let err: Box<dyn std::error::Error> = Box::new(UnknownKind("like".to_owned()));
        assert_eq!(err.to_string(), "unknown interaction kind `like`");
    }

    #[test]
    fn partial_flags_omit_unrequested_kinds() {
        let mut partial = PartialFlags::default();
        partial.set(InteractionKind::Downvote, true);
        let json = serde_json::to_value(partial).ok();
        assert_eq!(json, Some(serde_json::json!({ "downvote": true })));
    }
}
