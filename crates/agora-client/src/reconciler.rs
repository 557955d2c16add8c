//! Optimistic interaction state for post cards.
//!
//! [`ClientReconciler`] owns one [`CardState`] per tracked post. A user
//! intent is applied to the displayed counts and flags immediately, then
//! sent to the server. The server's answer *replaces* the displayed state
//! rather than being merged into it, so an optimistic delta can never be
//! counted twice.
//!
//! # Ordering
//!
//! At most one request per post is in flight. Intents arriving while one
//! is outstanding are queued and issued one at a time once the in-flight
//! response has been reconciled. The queue holds at most one intent per
//! dimension (votes, hide, follow): a later vote replaces a queued vote,
//! but never a queued hide or follow.
//! Every issued request carries a sequence number from a counter shared by
//! all cards; a response whose number is not the card's in-flight number
//! is stale and dropped. This also covers cards that were forgotten or
//! re-seeded while a request was outstanding.
//!
//! The reconciler performs no IO. [`ClientReconciler::dispatch`] drives a
//! request and its queued follow-ups through an
//! [`InteractionTransport`].

use std::collections::{BTreeMap, VecDeque};

use agora_types::{
    InteractionFlags, InteractionKind, InteractionOutcome, NamedAction, OperationAction, PostId,
};
use tracing::debug;

use crate::error::ClientError;
use crate::transport::InteractionTransport;

/// What a card displays: counts, the version they belong to and the
/// user's own flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardView {
    /// Displayed upvote count.
    pub upvotes: u64,
    /// Displayed downvote count.
    pub downvotes: u64,
    /// Server version of the last confirmed state.
    pub version: u64,
    /// The signed-in user's flags.
    pub flags: InteractionFlags,
}

impl CardView {
    /// Apply the local effect of `action`: flip the flags it touches and
    /// move the vote counts with them.
    #[must_use]
    pub fn with_action(mut self, action: NamedAction) -> Self {
        for op in action.operations() {
            let present = self.flags.get(op.kind);
            match op.action {
                OperationAction::Add if !present => {
                    self.flags.set(op.kind, true);
                    self.adjust_count(op.kind, true);
                }
                OperationAction::Remove if present => {
                    self.flags.set(op.kind, false);
                    self.adjust_count(op.kind, false);
                }
                OperationAction::Add | OperationAction::Remove => {}
            }
        }
        self
    }

    const fn adjust_count(&mut self, kind: InteractionKind, up: bool) {
        let count = match kind {
            InteractionKind::Upvote => &mut self.upvotes,
            InteractionKind::Downvote => &mut self.downvotes,
            InteractionKind::Hide | InteractionKind::Follow => return,
        };
        *count = if up {
            count.saturating_add(1)
        } else {
            count.saturating_sub(1)
        };
    }
}

impl From<&InteractionOutcome> for CardView {
    fn from(outcome: &InteractionOutcome) -> Self {
        Self {
            upvotes: outcome.upvotes,
            downvotes: outcome.downvotes,
            version: outcome.version,
            flags: outcome.flags,
        }
    }
}

/// A request the caller must send and later hand back to
/// [`ClientReconciler::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    /// Target post.
    pub post_id: PostId,
    /// The action to perform.
    pub action: NamedAction,
    /// Sequence number identifying this request.
    pub seq: u64,
}

/// Independent parts of a card that intents can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Vote,
    Hide,
    Follow,
}

impl Dimension {
    const fn of(action: NamedAction) -> Self {
        match action {
            NamedAction::Upvote | NamedAction::Downvote | NamedAction::Unvote => Self::Vote,
            NamedAction::Hide | NamedAction::Unhide => Self::Hide,
            NamedAction::Follow | NamedAction::Unfollow => Self::Follow,
        }
    }
}

/// Per-post reconciliation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardState {
    /// Last state the server confirmed.
    confirmed: CardView,
    /// What the card shows: `confirmed` plus any pending optimistic delta.
    displayed: CardView,
    /// Sequence number of the outstanding request.
    in_flight: Option<u64>,
    /// Intents received while a request was outstanding, oldest first,
    /// at most one per dimension.
    queued: VecDeque<NamedAction>,
    /// Message from the last failed request, cleared on the next intent.
    error: Option<String>,
}

impl CardState {
    fn seeded(view: CardView) -> Self {
        Self {
            confirmed: view,
            displayed: view,
            ..Self::default()
        }
    }

    /// What the card displays.
    pub const fn view(&self) -> &CardView {
        &self.displayed
    }

    /// Last server-confirmed state.
    pub const fn confirmed(&self) -> &CardView {
        &self.confirmed
    }

    /// `true` while a request is outstanding.
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Intents waiting for the outstanding request, oldest first.
    pub fn queued(&self) -> impl Iterator<Item = NamedAction> + '_ {
        self.queued.iter().copied()
    }

    /// Transient error message from the last failed request.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Client-side owner of every tracked card's interaction state.
#[derive(Debug, Default)]
pub struct ClientReconciler {
    cards: BTreeMap<PostId, CardState>,
    next_seq: u64,
}

impl ClientReconciler {
    /// An empty reconciler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `post_id` from an authoritative outcome, replacing
    /// any existing state. A request outstanding for the old state will
    /// be dropped when it returns.
    pub fn track(&mut self, post_id: PostId, outcome: &InteractionOutcome) {
        self.cards
            .insert(post_id, CardState::seeded(CardView::from(outcome)));
    }

    /// Stop tracking `post_id`. Responses still in flight for it are
    /// ignored; the server keeps whatever it committed.
    pub fn forget(&mut self, post_id: PostId) -> bool {
        self.cards.remove(&post_id).is_some()
    }

    /// The card for `post_id`, if tracked.
    pub fn card(&self, post_id: PostId) -> Option<&CardState> {
        self.cards.get(&post_id)
    }

    /// Record a user intent for `post_id`.
    ///
    /// The optimistic delta is applied at once. Returns the ticket to send,
    /// or `None` if the post is untracked or a request is already in
    /// flight. A queued intent replaces any queued intent of the same
    /// dimension and keeps every other one.
    pub fn request(&mut self, post_id: PostId, action: NamedAction) -> Option<Ticket> {
        let card = self.cards.get_mut(&post_id)?;
        card.error = None;
        card.displayed = card.displayed.with_action(action);

        if card.in_flight.is_some() {
            debug!(%post_id, %action, "request in flight; intent queued");
            let dimension = Dimension::of(action);
            card.queued.retain(|queued| Dimension::of(*queued) != dimension);
            card.queued.push_back(action);
            return None;
        }

        Some(issue(&mut self.next_seq, card, post_id, action))
    }

    /// Record a toggle of `kind`, resolved against the displayed flags.
    pub fn toggle(&mut self, post_id: PostId, kind: InteractionKind) -> Option<Ticket> {
        let flags = self.cards.get(&post_id)?.displayed.flags;
        self.request(post_id, NamedAction::toggle(kind, &flags))
    }

    /// Reconcile the response to `ticket`.
    ///
    /// A success replaces the confirmed state with the server's values; the
    /// card then shows it with the deltas of every still-queued intent. A
    /// failure reverts to the last confirmed state, drops all queued
    /// intents and records the error. Stale tickets change nothing.
    ///
    /// Returns the ticket for the oldest queued intent, if one is issued.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        result: Result<InteractionOutcome, ClientError>,
    ) -> Option<Ticket> {
        let Some(card) = self.cards.get_mut(&ticket.post_id) else {
            debug!(post_id = %ticket.post_id, seq = ticket.seq, "response for untracked post dropped");
            return None;
        };
        if card.in_flight != Some(ticket.seq) {
            debug!(post_id = %ticket.post_id, seq = ticket.seq, "stale response dropped");
            return None;
        }
        card.in_flight = None;

        match result {
            Ok(outcome) => {
                card.confirmed = CardView::from(&outcome);
                card.displayed = card
                    .queued
                    .iter()
                    .fold(card.confirmed, |view, queued| view.with_action(*queued));
            }
            Err(e) => {
                debug!(post_id = %ticket.post_id, action = %ticket.action, error = %e, "reverting");
                card.displayed = card.confirmed;
                card.queued.clear();
                card.error = Some(e.to_string());
                return None;
            }
        }

        let next = card.queued.pop_front()?;
        Some(issue(&mut self.next_seq, card, ticket.post_id, next))
    }

    /// Record `action` and drive it, plus any follow-ups queued meanwhile,
    /// through `transport` until the card is idle.
    ///
    /// Returns the final displayed view, or `None` if the post is not
    /// tracked. Request failures are recorded on the card, not returned.
    pub async fn dispatch<T: InteractionTransport>(
        &mut self,
        transport: &T,
        post_id: PostId,
        action: NamedAction,
    ) -> Option<CardView> {
        let mut ticket = self.request(post_id, action);
        while let Some(current) = ticket {
            let result = transport.perform(current.post_id, current.action).await;
            ticket = self.resolve(current, result);
        }
        self.card(post_id).map(|card| card.displayed)
    }

    /// Fetch the authoritative summary for `post_id` and (re)track it.
    ///
    /// # Errors
    ///
    /// Returns the transport error; the card is left unchanged.
    pub async fn load<T: InteractionTransport>(
        &mut self,
        transport: &T,
        post_id: PostId,
    ) -> Result<CardView, ClientError> {
        let outcome = transport.summary(post_id).await?;
        self.track(post_id, &outcome);
        Ok(CardView::from(&outcome))
    }
}

/// Mark `action` in flight on `card` under the next sequence number.
/// Its delta is already part of the displayed view.
fn issue(next_seq: &mut u64, card: &mut CardState, post_id: PostId, action: NamedAction) -> Ticket {
    let seq = *next_seq;
    *next_seq = seq.saturating_add(1);
    card.in_flight = Some(seq);
    Ticket {
        post_id,
        action,
        seq,
    }
}
