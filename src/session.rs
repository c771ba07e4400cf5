//! Per-conversation session state
//!
//! Each conversation owns one `Session`. The store hands out one lock per
//! session so different conversations advance independently while steps for
//! the same conversation are applied one at a time.

pub mod ledger;

pub use ledger::{Draft, Player, Roster, RosterError, ShotKind, Stat, StatLine};

use crate::state_machine::StatState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// One conversation's data-entry progress
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub conversation_id: String,
    pub state: StatState,
    pub roster: Roster,
    /// Name of the player the in-progress event belongs to
    pub active_player: Option<String>,
    pub pending_draft: Option<Draft>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: conversation_id.into(),
            state: StatState::default(),
            roster: Roster::new(),
            active_player: None,
            pending_draft: None,
            created_at: now,
            last_active: now,
        }
    }

    /// Resolve the active player against the roster
    pub fn active_player(&self) -> Option<&Player> {
        self.active_player
            .as_deref()
            .and_then(|name| self.roster.find(name))
    }
}

/// Keyed store of sessions, one per conversation id
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for a conversation, creating it on first touch
    pub fn get_or_create(&self, conversation_id: &str) -> Arc<Mutex<Session>> {
        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(session) = sessions.get(conversation_id) {
                return Arc::clone(session);
            }
        }

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        // Another request may have created it between the two locks
        let session = sessions
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                tracing::info!(conv_id = %conversation_id, "Creating session");
                Arc::new(Mutex::new(Session::new(conversation_id)))
            });
        Arc::clone(session)
    }

    /// Run `f` with exclusive access to one conversation's session
    pub fn with_session<R>(&self, conversation_id: &str, f: impl FnOnce(&mut Session) -> R) -> R {
        let session = self.get_or_create(conversation_id);
        let mut guard = lock(&session);
        f(&mut guard)
    }

    /// Copy of a session's current value, if it exists
    pub fn snapshot(&self, conversation_id: &str) -> Option<Session> {
        let session = {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            sessions.get(conversation_id).map(Arc::clone)
        }?;
        let guard = lock(&session);
        Some(guard.clone())
    }

    /// Drop a conversation's session; the next message starts over
    #[allow(dead_code)] // Operator reset, not reachable from chat
    pub fn remove(&self, conversation_id: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(conversation_id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// A panic mid-transition cannot leave a session half-updated: the state
// field is written last, so the poisoned value is still usable.
fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
