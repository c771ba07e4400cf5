//! Session driver
//!
//! The single seam between the transport and the state machine: resolve the
//! conversation's session, advance it under its lock, and render the reply.

use crate::prompt::render_reply;
use crate::session::SessionStore;
use crate::state_machine::{advance, TransitionError, TransitionTable};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// What happened to one inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandleOutcome {
    pub matched: bool,
    pub reply_text: Option<String>,
}

impl HandleOutcome {
    fn matched(reply: String) -> Self {
        Self {
            matched: true,
            reply_text: Some(reply),
        }
    }

    fn unmatched() -> Self {
        Self {
            matched: false,
            reply_text: None,
        }
    }
}

/// Applies inbound messages to their conversations
pub struct SessionDriver {
    table: TransitionTable,
    sessions: Arc<SessionStore>,
}

impl SessionDriver {
    pub fn new(table: TransitionTable, sessions: Arc<SessionStore>) -> Self {
        Self { table, sessions }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Advance one conversation by one message
    pub fn handle(&self, conversation_id: &str, text: &str) -> HandleOutcome {
        self.sessions.with_session(conversation_id, |session| {
            let from = session.state;
            match advance(&self.table, session, text) {
                Ok(result) => {
                    session.last_active = Utc::now();
                    for step in &result.steps {
                        tracing::info!(
                            conv_id = %conversation_id,
                            from = %step.from,
                            to = %step.to,
                            guard = step.guard.name(),
                            "Transition"
                        );
                    }
                    if let Some((player, stat)) = result.recorded() {
                        tracing::info!(
                            conv_id = %conversation_id,
                            player = %player,
                            stat = %stat.describe(),
                            "Recorded event"
                        );
                    }
                    HandleOutcome::matched(render_reply(&result, session))
                }
                Err(TransitionError::NoMatch { state }) => {
                    tracing::debug!(conv_id = %conversation_id, state = %state, text = %text, "No transition matched");
                    HandleOutcome::unmatched()
                }
                Err(e) => {
                    tracing::warn!(conv_id = %conversation_id, state = %from, error = %e, "Transition rejected");
                    HandleOutcome::unmatched()
                }
            }
        })
    }
}
