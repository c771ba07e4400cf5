//! Declarative transition table
//!
//! The table is an ordered list of records. For a given source state the
//! engine tries records in the order they are declared here and applies the
//! first one whose guard holds.

use super::guard::Guard;
use super::StatState;
use crate::session::{ShotKind, Stat};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Side effect applied together with a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Keep the typed name as the pending draft
    StoreDraft,
    /// Append the pending draft to the roster
    ConfirmPlayer,
    /// Throw the pending draft away
    DiscardDraft,
    /// Set the active player from a jersey number
    SelectPlayer,
    /// Abort the in-progress event; the ledger is left alone
    ClearSelection,
    /// Credit the active player with one event
    Record(Stat),
}

/// Where a committed event returns to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopBack {
    /// Back to roster entry, so players can still be added mid-game
    #[default]
    EnterPlayer,
    /// Straight to the next jersey number
    EnterNumber,
}

impl LoopBack {
    pub fn state(self) -> StatState {
        match self {
            LoopBack::EnterPlayer => StatState::EnterPlayer,
            LoopBack::EnterNumber => StatState::EnterNumber,
        }
    }
}

impl FromStr for LoopBack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "enter_player" => Ok(LoopBack::EnterPlayer),
            "enter_number" => Ok(LoopBack::EnterNumber),
            other => Err(format!(
                "expected enter_player or enter_number, got {other:?}"
            )),
        }
    }
}

/// One (source, guard, destination, side effect) rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub source: StatState,
    pub guard: Guard,
    pub dest: StatState,
    pub effect: Effect,
}

impl Transition {
    const fn new(source: StatState, guard: Guard, dest: StatState, effect: Effect) -> Self {
        Self {
            source,
            guard,
            dest,
            effect,
        }
    }
}

/// The event a leaf state stands for
pub fn leaf_stat(state: StatState) -> Option<Stat> {
    let shot = |kind, made| Some(Stat::Shot { kind, made });
    match state {
        StatState::TwoPtMade => shot(ShotKind::TwoPoint, true),
        StatState::TwoPtMiss => shot(ShotKind::TwoPoint, false),
        StatState::ThreePtMade => shot(ShotKind::ThreePoint, true),
        StatState::ThreePtMiss => shot(ShotKind::ThreePoint, false),
        StatState::FreePtMade => shot(ShotKind::FreeThrow, true),
        StatState::FreePtMiss => shot(ShotKind::FreeThrow, false),
        StatState::ORebound => Some(Stat::OffensiveRebound),
        StatState::DRebound => Some(Stat::DefensiveRebound),
        _ => None,
    }
}

/// Ordered transition records for one configuration
#[derive(Debug, Clone)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
    loop_back: LoopBack,
}

impl TransitionTable {
    pub fn new(loop_back: LoopBack) -> Self {
        use Effect as E;
        use Guard as G;
        use StatState as S;

        let mut transitions = vec![
            // Roster entry
            Transition::new(S::User, G::IsGoingToEnterPlayer, S::EnterPlayer, E::None),
            Transition::new(S::EnterPlayer, G::IsGoingToAddPlayer, S::AddPlayer, E::StoreDraft),
            Transition::new(S::AddPlayer, G::IsGoingToSuccessPlayer, S::SuccessPlayer, E::ConfirmPlayer),
            Transition::new(S::AddPlayer, G::IsRejectingDraft, S::EnterPlayer, E::DiscardDraft),
            Transition::new(S::SuccessPlayer, G::IsGoingToEnterPlayer2, S::EnterPlayer, E::None),
            Transition::new(S::SuccessPlayer, G::IsGoingToEnterNumber, S::EnterNumber, E::None),
            Transition::new(S::EnterPlayer, G::IsGoingToEnterNumber, S::EnterNumber, E::None),
            // Player selection
            Transition::new(S::EnterNumber, G::IsGoingToStatistic, S::Statistic, E::SelectPlayer),
            // Category routing
            Transition::new(S::Statistic, G::IsGoingToTwoPt, S::TwoPt, E::None),
            Transition::new(S::Statistic, G::IsGoingToThreePt, S::ThreePt, E::None),
            Transition::new(S::Statistic, G::IsGoingToFreePt, S::FreePt, E::None),
            Transition::new(S::Statistic, G::IsGoingToRebound, S::Rebound, E::None),
            Transition::new(S::Statistic, G::IsGoingToShow, S::Show, E::None),
            // Outcome routing
            Transition::new(S::TwoPt, G::IsMade, S::TwoPtMade, E::None),
            Transition::new(S::TwoPt, G::IsMiss, S::TwoPtMiss, E::None),
            Transition::new(S::ThreePt, G::IsMade, S::ThreePtMade, E::None),
            Transition::new(S::ThreePt, G::IsMiss, S::ThreePtMiss, E::None),
            Transition::new(S::FreePt, G::IsMade, S::FreePtMade, E::None),
            Transition::new(S::FreePt, G::IsMiss, S::FreePtMiss, E::None),
            Transition::new(S::Rebound, G::IsOffensive, S::ORebound, E::None),
            Transition::new(S::Rebound, G::IsDefensive, S::DRebound, E::None),
        ];

        // Abort rules come before commits so a leaf that receives "clear"
        // never records its event.
        transitions.extend(
            StatState::ALL
                .into_iter()
                .filter(|s| s.is_clearable())
                .map(|s| Transition::new(s, G::Clear, S::EnterPlayer, E::ClearSelection)),
        );
        transitions.extend(StatState::LEAVES.into_iter().filter_map(|s| {
            leaf_stat(s).map(|stat| Transition::new(s, G::GotIt, loop_back.state(), E::Record(stat)))
        }));

        Self {
            transitions,
            loop_back,
        }
    }

    pub fn loop_back(&self) -> LoopBack {
        self.loop_back
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Records leaving `state`, in declared order
    pub fn outgoing(&self, state: StatState) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.source == state)
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::new(LoopBack::default())
    }
}
