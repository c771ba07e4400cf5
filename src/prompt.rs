//! Reply text for the chat user
//!
//! Replies are built from what the engine just did plus a prompt for the
//! state the session ended up in.

use crate::session::{Player, Session, ShotKind, StatLine};
use crate::state_machine::{Applied, StatState, TransitionResult};
use std::fmt::Write;

/// Sent by the transport when no transition matched
pub const FALLBACK_REPLY: &str = "Not Entering any State";

/// Full reply for a successful advance
pub fn render_reply(result: &TransitionResult, session: &Session) -> String {
    let mut lines: Vec<String> = result
        .steps
        .iter()
        .filter_map(|step| acknowledge(&step.applied))
        .collect();
    lines.push(state_prompt(result.final_state(), session));
    lines.join("\n")
}

fn acknowledge(applied: &Applied) -> Option<String> {
    match applied {
        Applied::Nothing | Applied::DraftStored(_) => None,
        Applied::PlayerAdded(player) => Some(format!("Added {}.", player_label(player))),
        Applied::DraftDiscarded => Some("Okay, let's try that name again.".to_string()),
        Applied::PlayerSelected(name) => Some(format!("{name} selected.")),
        Applied::SelectionCleared => Some("Cleared the current entry.".to_string()),
        Applied::Recorded { player, stat } => {
            Some(format!("Recorded {} for {player}.", stat.describe()))
        }
    }
}

/// What to ask the user for while the session sits in `state`
pub fn state_prompt(state: StatState, session: &Session) -> String {
    match state {
        StatState::User => "Send 'start' to set up your roster.".to_string(),
        StatState::EnterPlayer => "Enter a player name (optionally with a jersey number), \
             or 'done' when the roster is complete."
            .to_string(),
        StatState::AddPlayer => match &session.pending_draft {
            Some(draft) => {
                let number = draft
                    .number
                    .map_or_else(|| "next free number".to_string(), |n| format!("#{n}"));
                format!(
                    "Add {} ({number})? Reply 'confirm' or 'no'.",
                    draft.name
                )
            }
            None => "Reply 'confirm' or 'no'.".to_string(),
        },
        StatState::SuccessPlayer => {
            "Send 'add player' for another player, or 'done' to start recording.".to_string()
        }
        StatState::EnterNumber => {
            let roster: Vec<String> = session.roster.players().iter().map(player_label).collect();
            format!(
                "Enter the jersey number of the player.\nRoster: {}",
                roster.join(", ")
            )
        }
        StatState::Statistic => "Choose: 2pt, 3pt, ft, rebound, show, or clear.".to_string(),
        StatState::TwoPt | StatState::ThreePt | StatState::FreePt => {
            "Made or miss? ('clear' to cancel)".to_string()
        }
        StatState::Rebound => "Offensive or defensive? ('clear' to cancel)".to_string(),
        StatState::Show => format!("{}\nSend 'clear' to continue.", box_score(session)),
        leaf => format!(
            "{leaf} is waiting for a selected player. Send 'clear' to start over."
        ),
    }
}

/// One line per player, in roster order
pub fn box_score(session: &Session) -> String {
    let snapshot = session.roster.snapshot();
    if snapshot.is_empty() {
        return "No players yet.".to_string();
    }
    let mut out = String::new();
    for (i, (player, line)) in snapshot.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&stat_row(player, line));
    }
    out
}

fn stat_row(player: &Player, line: &StatLine) -> String {
    let mut row = format!("{}: {} PTS", player_label(player), line.points());
    for kind in [ShotKind::TwoPoint, ShotKind::ThreePoint, ShotKind::FreeThrow] {
        let (made, attempted) = line.shooting(kind);
        let _ = write!(row, " | {} {made}/{attempted}", kind.label());
    }
    let _ = write!(
        row,
        " | REB {} (O {}, D {})",
        line.rebounds(),
        line.off_rebound,
        line.def_rebound
    );
    row
}

fn player_label(player: &Player) -> String {
    match player.number {
        Some(n) => format!("#{n} {}", player.name),
        None => player.name.clone(),
    }
}
