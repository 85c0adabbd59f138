//! Event routing: commands, buttons and text go to the chat's session or to
//! the history browser.

use crate::chat::{Action, ButtonId, ChatId, Event, Reply};
use crate::history::HistoryStore;
use crate::models::TournamentId;
use crate::registry::SessionRegistry;
use crate::render;
use crate::session::TournamentSession;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// The whole bot: every chat's session plus the shared history.
pub struct Bot<H> {
    sessions: SessionRegistry,
    history: H,
    rng: StdRng,
}

impl<H: HistoryStore> Bot<H> {
    pub fn new(history: H) -> Self {
        Self::with_rng(history, StdRng::from_entropy())
    }

    /// Same seed and same events give the same brackets.
    pub fn with_seed(history: H, seed: u64) -> Self {
        Self::with_rng(history, StdRng::seed_from_u64(seed))
    }

    fn with_rng(history: H, rng: StdRng) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            history,
            rng,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Drop sessions idle for `timeout`.
    pub fn prune_inactive(&mut self, timeout: Duration) -> usize {
        self.sessions.prune_inactive(timeout)
    }

    /// Handle one inbound event for a chat and return the replies to render.
    pub fn handle(&mut self, chat: ChatId, event: Event) -> Vec<Reply> {
        match event {
            Event::Command { name, args } => self.handle_command(chat, &name, &args),
            Event::Button { data } => self.handle_button(chat, &data),
            Event::Text { text } => {
                let Some(session) = self.sessions.get_mut(chat) else {
                    return Vec::new();
                };
                let replies = session.handle_text(&text, &mut self.rng, &mut self.history);
                self.sessions.remove_if_terminal(chat);
                replies
            }
        }
    }

    fn handle_command(&mut self, chat: ChatId, name: &str, args: &str) -> Vec<Reply> {
        let name = name.trim().trim_start_matches('/');
        let args = args.trim();
        match name {
            "tournament" => {
                if args.is_empty() {
                    return vec![Reply::text(render::TOURNAMENT_USAGE)];
                }
                if let Some(reply) = self.unsaved_guard(chat) {
                    return vec![reply];
                }
                log::info!("Chat {} creates tournament '{}'", chat, args);
                let (session, reply) = TournamentSession::manual(args);
                self.sessions.start(chat, session);
                vec![reply]
            }
            "randomtournament" => {
                if args.is_empty() {
                    return vec![Reply::text(render::RANDOM_TOURNAMENT_USAGE)];
                }
                if let Some(reply) = self.unsaved_guard(chat) {
                    return vec![reply];
                }
                log::info!("Chat {} creates randomized tournament '{}'", chat, args);
                let (session, reply) = TournamentSession::randomized(args);
                self.sessions.start(chat, session);
                vec![reply]
            }
            "cancel" => match self.sessions.remove(chat) {
                Some(mut session) => vec![session.cancel()],
                None => vec![Reply::text("There is no tournament in progress.")],
            },
            "historytournament" => vec![self.history_list()],
            "start" | "help" => vec![Reply::text(format!(
                "{}\n{}\n/historytournament - browse finished tournaments\n/cancel - stop the current tournament",
                render::TOURNAMENT_USAGE,
                render::RANDOM_TOURNAMENT_USAGE
            ))],
            _ => {
                log::debug!("Unknown command '{}' from chat {}", name, chat);
                Vec::new()
            }
        }
    }

    /// A chat whose finished tournament is not saved yet must retry or cancel
    /// before starting another one.
    fn unsaved_guard(&self, chat: ChatId) -> Option<Reply> {
        let session = self.sessions.get(chat).filter(|s| s.holds_unsaved())?;
        log::warn!(
            "Chat {} tried to start a tournament while '{}' is unsaved",
            chat,
            session.name()
        );
        Some(Reply::with_actions(
            format!(
                "⚠ Tournament '{}' is finished but not saved yet. Retry saving it, or use /cancel to discard it.",
                session.name()
            ),
            vec![Action::new("🔁 Retry saving", ButtonId::RetrySave)],
        ))
    }

    fn handle_button(&mut self, chat: ChatId, data: &str) -> Vec<Reply> {
        let button = ButtonId::parse(data);
        match &button {
            ButtonId::View(raw) => vec![self.history_detail(raw)],
            ButtonId::Delete(raw) => vec![self.delete_record(raw)],
            ButtonId::BackToHistory => vec![self.history_list()],
            ButtonId::NewTournament => vec![Reply::text(format!(
                "{}\n{}",
                render::TOURNAMENT_USAGE,
                render::RANDOM_TOURNAMENT_USAGE
            ))],
            _ => {
                let Some(session) = self.sessions.get_mut(chat) else {
                    return Vec::new();
                };
                let replies = session.handle_button(&button, &mut self.history);
                self.sessions.remove_if_terminal(chat);
                replies
            }
        }
    }

    fn history_list(&self) -> Reply {
        match self.history.list() {
            Ok(summaries) => render::history_list(&summaries),
            Err(e) => {
                log::error!("Failed to list history: {}", e);
                Reply::text("❌ Could not read the tournament history.")
            }
        }
    }

    fn history_detail(&self, raw: &str) -> Reply {
        let Ok(id) = raw.parse::<TournamentId>() else {
            return Reply::text("❌ Tournament not found.");
        };
        match self.history.get(&id) {
            Ok(Some(record)) => render::history_detail(id, &record),
            Ok(None) => Reply::text("❌ Tournament not found."),
            Err(e) => {
                log::error!("Failed to read tournament {}: {}", id, e);
                Reply::text("❌ Could not read the tournament history.")
            }
        }
    }

    fn delete_record(&mut self, raw: &str) -> Reply {
        let Ok(id) = raw.parse::<TournamentId>() else {
            return Reply::text("❌ Tournament was already deleted.");
        };
        match self.history.delete(&id) {
            Ok(true) => {
                log::info!("Deleted tournament {} from history", id);
                Reply::text("✅ Tournament deleted from history.")
            }
            Ok(false) => Reply::text("❌ Tournament was already deleted."),
            Err(e) => {
                log::error!("Failed to delete tournament {}: {}", id, e);
                Reply::text("❌ Could not delete the tournament.")
            }
        }
    }
}
