//! Sessions by chat id, with last-activity tracking for cleanup.

use crate::chat::ChatId;
use crate::session::TournamentSession;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-chat entry: session + last activity time.
struct SessionEntry {
    session: TournamentSession,
    last_activity: Instant,
}

/// Owns every in-progress session. A chat has at most one.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<ChatId, SessionEntry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session for the chat, replacing any previous one.
    pub fn start(&mut self, chat: ChatId, session: TournamentSession) {
        if let Some(old) = self.sessions.insert(
            chat,
            SessionEntry {
                session,
                last_activity: Instant::now(),
            },
        ) {
            if old.session.holds_unsaved() {
                log::error!(
                    "Chat {} dropped finished but unsaved tournament '{}'",
                    chat,
                    old.session.name()
                );
            } else {
                log::info!(
                    "Chat {} replaced unfinished tournament '{}'",
                    chat,
                    old.session.name()
                );
            }
        }
    }

    /// Session for the chat. Touching it refreshes last_activity.
    pub fn get_mut(&mut self, chat: ChatId) -> Option<&mut TournamentSession> {
        self.sessions.get_mut(&chat).map(|entry| {
            entry.last_activity = Instant::now();
            &mut entry.session
        })
    }

    pub fn get(&self, chat: ChatId) -> Option<&TournamentSession> {
        self.sessions.get(&chat).map(|entry| &entry.session)
    }

    pub fn remove(&mut self, chat: ChatId) -> Option<TournamentSession> {
        self.sessions.remove(&chat).map(|entry| entry.session)
    }

    /// Drop the chat's session if it reached a terminal state.
    pub fn remove_if_terminal(&mut self, chat: ChatId) {
        if self.get(chat).is_some_and(TournamentSession::is_terminal) {
            self.sessions.remove(&chat);
        }
    }

    /// Remove sessions idle for at least `timeout`. Returns how many were removed.
    /// Sessions holding a finished but unsaved tournament are never pruned.
    pub fn prune_inactive(&mut self, timeout: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|chat, entry| {
            if entry.last_activity.elapsed() < timeout {
                return true;
            }
            if entry.session.holds_unsaved() {
                log::warn!(
                    "Chat {} is idle but tournament '{}' is not saved yet, keeping it",
                    chat,
                    entry.session.name()
                );
                return true;
            }
            false
        });
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
