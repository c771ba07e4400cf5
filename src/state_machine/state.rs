//! Session step identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The step a data-entry session is currently at.
///
/// Serialized names match the identifiers users see in the diagnostic
/// graph, including the capitalized rebound states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StatState {
    /// Fresh conversation, waiting for "start"
    #[default]
    #[serde(rename = "user")]
    User,
    #[serde(rename = "enter_player")]
    EnterPlayer,
    /// A draft name is waiting for confirmation
    #[serde(rename = "add_player")]
    AddPlayer,
    #[serde(rename = "success_player")]
    SuccessPlayer,
    /// Waiting for the jersey number of the player the next event belongs to
    #[serde(rename = "enter_number")]
    EnterNumber,
    /// Active player selected, waiting for an event category
    #[serde(rename = "statistic")]
    Statistic,
    #[serde(rename = "twopt")]
    TwoPt,
    #[serde(rename = "threept")]
    ThreePt,
    #[serde(rename = "freept")]
    FreePt,
    #[serde(rename = "Rebound")]
    Rebound,
    #[serde(rename = "show")]
    Show,
    #[serde(rename = "twoptmade")]
    TwoPtMade,
    #[serde(rename = "twoptmiss")]
    TwoPtMiss,
    #[serde(rename = "threeptmade")]
    ThreePtMade,
    #[serde(rename = "threeptmiss")]
    ThreePtMiss,
    #[serde(rename = "freeptmade")]
    FreePtMade,
    #[serde(rename = "freeptmiss")]
    FreePtMiss,
    #[serde(rename = "ORebound")]
    ORebound,
    #[serde(rename = "DRebound")]
    DRebound,
}

impl StatState {
    pub const ALL: [StatState; 19] = [
        StatState::User,
        StatState::EnterPlayer,
        StatState::AddPlayer,
        StatState::SuccessPlayer,
        StatState::EnterNumber,
        StatState::Statistic,
        StatState::TwoPt,
        StatState::ThreePt,
        StatState::FreePt,
        StatState::Rebound,
        StatState::Show,
        StatState::TwoPtMade,
        StatState::TwoPtMiss,
        StatState::ThreePtMade,
        StatState::ThreePtMiss,
        StatState::FreePtMade,
        StatState::FreePtMiss,
        StatState::ORebound,
        StatState::DRebound,
    ];

    /// Leaf states where an event is fully described and waits to be committed
    pub const LEAVES: [StatState; 8] = [
        StatState::TwoPtMade,
        StatState::TwoPtMiss,
        StatState::ThreePtMade,
        StatState::ThreePtMiss,
        StatState::FreePtMade,
        StatState::FreePtMiss,
        StatState::ORebound,
        StatState::DRebound,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatState::User => "user",
            StatState::EnterPlayer => "enter_player",
            StatState::AddPlayer => "add_player",
            StatState::SuccessPlayer => "success_player",
            StatState::EnterNumber => "enter_number",
            StatState::Statistic => "statistic",
            StatState::TwoPt => "twopt",
            StatState::ThreePt => "threept",
            StatState::FreePt => "freept",
            StatState::Rebound => "Rebound",
            StatState::Show => "show",
            StatState::TwoPtMade => "twoptmade",
            StatState::TwoPtMiss => "twoptmiss",
            StatState::ThreePtMade => "threeptmade",
            StatState::ThreePtMiss => "threeptmiss",
            StatState::FreePtMade => "freeptmade",
            StatState::FreePtMiss => "freeptmiss",
            StatState::ORebound => "ORebound",
            StatState::DRebound => "DRebound",
        }
    }

    /// Check if this is a leaf recording state
    pub fn is_leaf(self) -> bool {
        Self::LEAVES.contains(&self)
    }

    /// States an in-progress event can be aborted from with "clear"
    pub fn is_clearable(self) -> bool {
        matches!(
            self,
            StatState::Statistic
                | StatState::TwoPt
                | StatState::ThreePt
                | StatState::FreePt
                | StatState::Rebound
                | StatState::Show
        ) || self.is_leaf()
    }
}

impl fmt::Display for StatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown state identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown state: {0}")]
pub struct UnknownState(pub String);

impl FromStr for StatState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}
