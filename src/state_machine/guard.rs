//! Named guard predicates
//!
//! Every guard is a pure function of the session and the message text. Text
//! is normalized (trimmed, inner whitespace collapsed, lowercased) before it
//! is compared against a guard's vocabulary, so "MADE", " made " and "Made"
//! all behave the same.

use crate::session::ledger::parse_number;
use crate::session::{Draft, Session};

const START: &[&str] = &["start", "add player", "begin"];
const CONFIRM: &[&str] = &["confirm", "yes", "y", "ok"];
const REJECT: &[&str] = &["no", "n", "retry"];
const ADD_ANOTHER: &[&str] = &["add player", "add another", "another", "next player"];
const DONE: &[&str] = &["done", "finish", "start game"];
const TWO_POINT: &[&str] = &["2pt", "2", "two", "2 pointer", "twopt"];
const THREE_POINT: &[&str] = &["3pt", "3", "three", "3 pointer", "threept"];
const FREE_THROW: &[&str] = &["ft", "1pt", "free throw", "freethrow", "freept"];
const REBOUND: &[&str] = &["rebound", "reb", "rb"];
const SHOW: &[&str] = &["show", "stats", "box score"];
const MADE: &[&str] = &["made", "make", "in", "hit", "good"];
const MISS: &[&str] = &["miss", "missed", "out", "no good"];
const OFFENSIVE: &[&str] = &["offensive", "off", "o", "oreb"];
const DEFENSIVE: &[&str] = &["defensive", "def", "d", "dreb"];
const CLEAR: &[&str] = &["clear", "cancel", "reset"];

/// Guards referenced by the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    IsGoingToEnterPlayer,
    IsGoingToAddPlayer,
    IsGoingToSuccessPlayer,
    IsRejectingDraft,
    IsGoingToEnterPlayer2,
    IsGoingToEnterNumber,
    IsGoingToStatistic,
    IsGoingToTwoPt,
    IsGoingToThreePt,
    IsGoingToFreePt,
    IsGoingToRebound,
    IsGoingToShow,
    IsMade,
    IsMiss,
    IsOffensive,
    IsDefensive,
    GotIt,
    Clear,
}

impl Guard {
    pub const ALL: [Guard; 18] = [
        Guard::IsGoingToEnterPlayer,
        Guard::IsGoingToAddPlayer,
        Guard::IsGoingToSuccessPlayer,
        Guard::IsRejectingDraft,
        Guard::IsGoingToEnterPlayer2,
        Guard::IsGoingToEnterNumber,
        Guard::IsGoingToStatistic,
        Guard::IsGoingToTwoPt,
        Guard::IsGoingToThreePt,
        Guard::IsGoingToFreePt,
        Guard::IsGoingToRebound,
        Guard::IsGoingToShow,
        Guard::IsMade,
        Guard::IsMiss,
        Guard::IsOffensive,
        Guard::IsDefensive,
        Guard::GotIt,
        Guard::Clear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Guard::IsGoingToEnterPlayer => "is_going_to_enter_player",
            Guard::IsGoingToAddPlayer => "is_going_to_add_player",
            Guard::IsGoingToSuccessPlayer => "is_going_to_success_player",
            Guard::IsRejectingDraft => "is_rejecting_draft",
            Guard::IsGoingToEnterPlayer2 => "is_going_to_enter_player2",
            Guard::IsGoingToEnterNumber => "is_going_to_enter_number",
            Guard::IsGoingToStatistic => "is_going_to_statistic",
            Guard::IsGoingToTwoPt => "is_going_to_twopt",
            Guard::IsGoingToThreePt => "is_going_to_threept",
            Guard::IsGoingToFreePt => "is_going_to_freept",
            Guard::IsGoingToRebound => "is_going_to_rebound",
            Guard::IsGoingToShow => "is_going_to_show",
            Guard::IsMade => "is_made",
            Guard::IsMiss => "is_miss",
            Guard::IsOffensive => "is_offensive",
            Guard::IsDefensive => "is_defensive",
            Guard::GotIt => "gotit",
            Guard::Clear => "clear",
        }
    }

    /// Fixed keywords this guard accepts. Empty for guards that inspect
    /// free text or session data instead.
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Guard::IsGoingToEnterPlayer => START,
            Guard::IsGoingToSuccessPlayer => CONFIRM,
            Guard::IsRejectingDraft => REJECT,
            Guard::IsGoingToEnterPlayer2 => ADD_ANOTHER,
            Guard::IsGoingToEnterNumber => DONE,
            Guard::IsGoingToTwoPt => TWO_POINT,
            Guard::IsGoingToThreePt => THREE_POINT,
            Guard::IsGoingToFreePt => FREE_THROW,
            Guard::IsGoingToRebound => REBOUND,
            Guard::IsGoingToShow => SHOW,
            Guard::IsMade => MADE,
            Guard::IsMiss => MISS,
            Guard::IsOffensive => OFFENSIVE,
            Guard::IsDefensive => DEFENSIVE,
            Guard::Clear => CLEAR,
            Guard::IsGoingToAddPlayer | Guard::IsGoingToStatistic | Guard::GotIt => &[],
        }
    }

    /// Evaluate this guard against a session and a raw message
    pub fn evaluate(self, session: &Session, text: &str) -> bool {
        let text = normalize(text);
        match self {
            Guard::IsGoingToAddPlayer => draft_from(session, &text).is_some(),
            Guard::IsGoingToEnterNumber => {
                !session.roster.is_empty() && DONE.contains(&text.as_str())
            }
            Guard::IsGoingToStatistic => resolve_number(session, &text).is_some(),
            Guard::GotIt => session.active_player().is_some(),
            keyword => keyword.vocabulary().contains(&text.as_str()),
        }
    }
}

/// Trim, collapse inner whitespace and lowercase
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True if `word` belongs to any guard vocabulary
pub fn is_reserved(word: &str) -> bool {
    let word = normalize(word);
    Guard::ALL
        .iter()
        .any(|guard| guard.vocabulary().contains(&word.as_str()))
}

/// Parse a message as a new player draft the roster would accept.
///
/// The player name keeps the user's casing; only reserved-word and
/// duplicate checks use the normalized form.
pub fn parse_draft(session: &Session, text: &str) -> Option<Draft> {
    draft_from(session, &normalize(text))?;
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    Draft::parse(&collapsed)
}

fn draft_from(session: &Session, normalized: &str) -> Option<Draft> {
    if is_reserved(normalized) {
        return None;
    }
    let draft = Draft::parse(normalized)?;
    if is_reserved(&draft.name) || session.roster.accepts(&draft).is_err() {
        return None;
    }
    Some(draft)
}

/// Resolve a jersey-number message to a roster player's name
pub fn resolve_number(session: &Session, text: &str) -> Option<String> {
    let number = parse_number(&normalize(text))?;
    session
        .roster
        .select_by_number(number)
        .map(|player| player.name.clone())
}
