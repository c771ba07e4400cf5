//! Transition engine
//!
//! `advance` is the only place a session's state changes. It walks the
//! table rows leaving the current state in declared order and applies the
//! first one whose guard holds: side effect first, then the new state. A
//! message that matches nothing leaves the session exactly as it was.

use super::guard::{parse_draft, resolve_number, Guard};
use super::table::{Effect, TransitionTable};
use super::StatState;
use crate::session::{Draft, Player, RosterError, Session, Stat};
use thiserror::Error;

/// What a side effect did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Nothing,
    DraftStored(Draft),
    PlayerAdded(Player),
    DraftDiscarded,
    PlayerSelected(String),
    SelectionCleared,
    Recorded { player: String, stat: Stat },
}

/// One applied table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub from: StatState,
    pub to: StatState,
    pub guard: Guard,
    pub applied: Applied,
}

/// Result of a successful `advance`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// Always at least one step; two when a leaf was reached and committed
    pub steps: Vec<Step>,
}

impl TransitionResult {
    pub fn final_state(&self) -> StatState {
        self.steps
            .last()
            .map_or(StatState::default(), |step| step.to)
    }

    /// The event committed during this advance, if any
    pub fn recorded(&self) -> Option<(&str, Stat)> {
        self.steps.iter().find_map(|step| match &step.applied {
            Applied::Recorded { player, stat } => Some((player.as_str(), *stat)),
            _ => None,
        })
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("no transition out of {state} matches the message")]
    NoMatch { state: StatState },
    #[error("transition out of {state} rejected: {source}")]
    Rejected {
        state: StatState,
        source: RosterError,
    },
}

/// Advance a session by one message.
///
/// When the first step lands on a leaf recording state, the leaf's own rows
/// are tried once more with the same message so the event is committed in
/// the same call. If that commit cannot fire the session waits in the leaf.
pub fn advance(
    table: &TransitionTable,
    session: &mut Session,
    text: &str,
) -> Result<TransitionResult, TransitionError> {
    let first = apply_first(table, session, text)?.ok_or(TransitionError::NoMatch {
        state: session.state,
    })?;
    let mut steps = vec![first];

    if session.state.is_leaf() {
        match apply_first(table, session, text) {
            Ok(Some(commit)) => steps.push(commit),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    conv_id = %session.conversation_id,
                    state = %session.state,
                    error = %e,
                    "Commit rejected, waiting in leaf"
                );
            }
        }
    }

    Ok(TransitionResult { steps })
}

fn apply_first(
    table: &TransitionTable,
    session: &mut Session,
    text: &str,
) -> Result<Option<Step>, TransitionError> {
    let from = session.state;
    let current: &Session = session;
    let Some(transition) = table
        .outgoing(from)
        .find(|t| t.guard.evaluate(current, text))
        .copied()
    else {
        return Ok(None);
    };

    let applied = apply_effect(transition.effect, session, text).map_err(|source| {
        TransitionError::Rejected {
            state: from,
            source,
        }
    })?;
    session.state = transition.dest;

    Ok(Some(Step {
        from,
        to: transition.dest,
        guard: transition.guard,
        applied,
    }))
}

// Effects validate before they mutate, so an error leaves the session as it was.
fn apply_effect(effect: Effect, session: &mut Session, text: &str) -> Result<Applied, RosterError> {
    match effect {
        Effect::None => Ok(Applied::Nothing),
        Effect::StoreDraft => {
            let draft = parse_draft(session, text)
                .ok_or_else(|| RosterError::InvalidName(text.trim().to_string()))?;
            session.pending_draft = Some(draft.clone());
            Ok(Applied::DraftStored(draft))
        }
        Effect::ConfirmPlayer => {
            let draft = session
                .pending_draft
                .clone()
                .ok_or(RosterError::NoPendingDraft)?;
            let player = session.roster.add_player(draft)?.clone();
            session.pending_draft = None;
            Ok(Applied::PlayerAdded(player))
        }
        Effect::DiscardDraft => {
            session.pending_draft = None;
            Ok(Applied::DraftDiscarded)
        }
        Effect::SelectPlayer => {
            let name = resolve_number(session, text)
                .ok_or_else(|| RosterError::UnknownNumber(text.trim().to_string()))?;
            session.active_player = Some(name.clone());
            Ok(Applied::PlayerSelected(name))
        }
        Effect::ClearSelection => {
            session.active_player = None;
            Ok(Applied::SelectionCleared)
        }
        Effect::Record(stat) => {
            let name = session
                .active_player()
                .map(|p| p.name.clone())
                .ok_or(RosterError::NoActivePlayer)?;
            session.roster.record(&name, stat)?;
            session.active_player = None;
            Ok(Applied::Recorded { player: name, stat })
        }
    }
}
