//! Roster and per-player stat ledger

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A registered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub number: Option<u32>,
}

/// A player name typed but not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub name: String,
    /// Jersey number given alongside the name, if any
    pub number: Option<u32>,
}

impl Draft {
    /// Split "Alice 3", "#3 Alice" or plain "Alice" into name and number.
    ///
    /// Returns `None` when no name remains after taking the number off.
    pub fn parse(text: &str) -> Option<Self> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        // Digits that overflow a jersey number must not leak into the name
        if [tokens.first(), tokens.last()]
            .into_iter()
            .flatten()
            .any(|t| is_numeric(t) && parse_number(t).is_none())
        {
            return None;
        }
        let (number, name_tokens) = match tokens.as_slice() {
            [] => return None,
            [only] => (None, vec![*only]),
            [first, rest @ ..] if parse_number(first).is_some() => {
                (parse_number(first), rest.to_vec())
            }
            [init @ .., last] if parse_number(last).is_some() => {
                (parse_number(last), init.to_vec())
            }
            all => (None, all.to_vec()),
        };
        let name = name_tokens.join(" ");
        if name.is_empty() || is_numeric(&name) {
            return None;
        }
        Some(Self { name, number })
    }
}

/// Parse a jersey number, allowing a leading `#`
pub fn parse_number(token: &str) -> Option<u32> {
    if !is_numeric(token) {
        return None;
    }
    token.strip_prefix('#').unwrap_or(token).parse().ok()
}

fn is_numeric(token: &str) -> bool {
    let digits = token.strip_prefix('#').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Shot category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotKind {
    TwoPoint,
    ThreePoint,
    FreeThrow,
}

impl ShotKind {
    pub fn points(self) -> u32 {
        match self {
            ShotKind::TwoPoint => 2,
            ShotKind::ThreePoint => 3,
            ShotKind::FreeThrow => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShotKind::TwoPoint => "2PT",
            ShotKind::ThreePoint => "3PT",
            ShotKind::FreeThrow => "FT",
        }
    }
}

/// One recordable event: a shot with its outcome, or a rebound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stat {
    Shot { kind: ShotKind, made: bool },
    OffensiveRebound,
    DefensiveRebound,
}

impl Stat {
    pub fn describe(self) -> String {
        match self {
            Stat::Shot { kind, made: true } => format!("{} made", kind.label()),
            Stat::Shot { kind, made: false } => format!("{} missed", kind.label()),
            Stat::OffensiveRebound => "offensive rebound".to_string(),
            Stat::DefensiveRebound => "defensive rebound".to_string(),
        }
    }
}

/// Accumulated counts for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub twopt_made: u32,
    pub twopt_miss: u32,
    pub threept_made: u32,
    pub threept_miss: u32,
    pub freept_made: u32,
    pub freept_miss: u32,
    pub off_rebound: u32,
    pub def_rebound: u32,
}

impl StatLine {
    fn counter_mut(&mut self, stat: Stat) -> &mut u32 {
        match stat {
            Stat::Shot { kind: ShotKind::TwoPoint, made: true } => &mut self.twopt_made,
            Stat::Shot { kind: ShotKind::TwoPoint, made: false } => &mut self.twopt_miss,
            Stat::Shot { kind: ShotKind::ThreePoint, made: true } => &mut self.threept_made,
            Stat::Shot { kind: ShotKind::ThreePoint, made: false } => &mut self.threept_miss,
            Stat::Shot { kind: ShotKind::FreeThrow, made: true } => &mut self.freept_made,
            Stat::Shot { kind: ShotKind::FreeThrow, made: false } => &mut self.freept_miss,
            Stat::OffensiveRebound => &mut self.off_rebound,
            Stat::DefensiveRebound => &mut self.def_rebound,
        }
    }

    /// Bump the counter for `stat` by one
    pub fn record(&mut self, stat: Stat) {
        let counter = self.counter_mut(stat);
        *counter = counter.saturating_add(1);
    }

    /// Made and attempted counts for a shot category
    pub fn shooting(&self, kind: ShotKind) -> (u32, u32) {
        let (made, miss) = match kind {
            ShotKind::TwoPoint => (self.twopt_made, self.twopt_miss),
            ShotKind::ThreePoint => (self.threept_made, self.threept_miss),
            ShotKind::FreeThrow => (self.freept_made, self.freept_miss),
        };
        (made, made + miss)
    }

    pub fn points(&self) -> u32 {
        [ShotKind::TwoPoint, ShotKind::ThreePoint, ShotKind::FreeThrow]
            .into_iter()
            .map(|kind| self.shooting(kind).0 * kind.points())
            .sum()
    }

    pub fn rebounds(&self) -> u32 {
        self.off_rebound + self.def_rebound
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("player already on the roster: {0}")]
    DuplicateName(String),
    #[error("jersey number already taken: {0}")]
    DuplicateNumber(u32),
    #[error("player not on the roster: {0}")]
    UnknownPlayer(String),
    #[error("no player wears number {0}")]
    UnknownNumber(String),
    #[error("not a usable player name: {0}")]
    InvalidName(String),
    #[error("no player name waiting for confirmation")]
    NoPendingDraft,
    #[error("no player selected")]
    NoActivePlayer,
}

/// Players of one session plus their accumulated counts.
///
/// Players keep insertion order; the ledger is keyed by player name, which
/// is unique within a roster (case-insensitively).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
    ledger: HashMap<String, StatLine>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look a player up by name, ignoring case (Unicode lowercase)
    pub fn find(&self, name: &str) -> Option<&Player> {
        let folded = name.to_lowercase();
        self.players
            .iter()
            .find(|p| p.name.to_lowercase() == folded)
    }

    pub fn number_taken(&self, number: u32) -> bool {
        self.players.iter().any(|p| p.number == Some(number))
    }

    /// Check whether a draft could be confirmed without conflicts
    pub fn accepts(&self, draft: &Draft) -> Result<(), RosterError> {
        if self.find(&draft.name).is_some() {
            return Err(RosterError::DuplicateName(draft.name.clone()));
        }
        match draft.number {
            Some(n) if self.number_taken(n) => Err(RosterError::DuplicateNumber(n)),
            _ => Ok(()),
        }
    }

    /// Append a player. Without an explicit number the lowest free one is used.
    pub fn add_player(&mut self, draft: Draft) -> Result<&Player, RosterError> {
        self.accepts(&draft)?;
        let number = draft.number.unwrap_or_else(|| self.lowest_free_number());
        self.players.push(Player {
            name: draft.name,
            number: Some(number),
        });
        Ok(&self.players[self.players.len() - 1])
    }

    fn lowest_free_number(&self) -> u32 {
        (1..).find(|n| !self.number_taken(*n)).unwrap_or(0)
    }

    pub fn select_by_number(&self, number: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.number == Some(number))
    }

    /// Add one event to a player's line, creating the line on first use
    pub fn record(&mut self, name: &str, stat: Stat) -> Result<&StatLine, RosterError> {
        let key = self
            .find(name)
            .map(|p| p.name.clone())
            .ok_or_else(|| RosterError::UnknownPlayer(name.to_string()))?;
        let line = self.ledger.entry(key).or_default();
        line.record(stat);
        Ok(line)
    }

    pub fn line(&self, name: &str) -> StatLine {
        self.ledger.get(name).copied().unwrap_or_default()
    }

    /// Every player with their line, in roster order
    pub fn snapshot(&self) -> Vec<(Player, StatLine)> {
        self.players
            .iter()
            .map(|p| (p.clone(), self.line(&p.name)))
            .collect()
    }
}
