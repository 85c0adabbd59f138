//! Per-chat tournament session: collects entrants, then plays out the bracket.

use crate::chat::{Action, ButtonId, Reply};
use crate::history::HistoryStore;
use crate::logic::{
    advance_stage, build_stage, parse_count, parse_player_name, parse_score, parse_team_block,
    partition_players, Advance, PLAYER_COUNTS, TEAM_COUNTS,
};
use crate::models::{Bracket, Player, Team, Tournament, TournamentError, TournamentId};
use crate::render;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Where a session is in its lifecycle. Each state carries only its own data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// Manual flow: waiting for a team count.
    AwaitingSize,
    /// Randomized flow: waiting for a player count.
    AwaitingPlayerCount,
    CollectingTeams {
        size: usize,
        teams: Vec<Team>,
    },
    CollectingPlayers {
        count: usize,
        players: Vec<Player>,
    },
    /// Bracket in play since `started_at`. `selected` is the match the next
    /// score applies to.
    PlayingBracket {
        team_count: usize,
        started_at: DateTime<Utc>,
        bracket: Bracket,
        selected: Option<usize>,
    },
    /// Bracket finished but the history write failed; the record is held
    /// until a retry succeeds or the session is cancelled.
    AwaitingSave {
        record: Tournament,
    },
    /// Stored in history. Terminal.
    Finished {
        id: TournamentId,
    },
    /// Terminal; nothing was stored.
    Cancelled,
}

/// One tournament under construction, owned by a single chat.
#[derive(Clone, Debug)]
pub struct TournamentSession {
    name: String,
    state: SessionState,
}

impl TournamentSession {
    /// Start the manual flow. Returns the session and the size prompt.
    pub fn manual(name: impl Into<String>) -> (Self, Reply) {
        (Self::with_state(name, SessionState::AwaitingSize), render::size_prompt())
    }

    /// Start the randomized flow. Returns the session and the player count prompt.
    pub fn randomized(name: impl Into<String>) -> (Self, Reply) {
        (
            Self::with_state(name, SessionState::AwaitingPlayerCount),
            render::player_count_prompt(),
        )
    }

    fn with_state(name: impl Into<String>, state: SessionState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The bracket, while one is in play.
    pub fn bracket(&self) -> Option<&Bracket> {
        match &self.state {
            SessionState::PlayingBracket { bracket, .. } => Some(bracket),
            _ => None,
        }
    }

    /// A finished tournament is waiting for a successful history write.
    pub fn holds_unsaved(&self) -> bool {
        matches!(self.state, SessionState::AwaitingSave { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            SessionState::Finished { .. } | SessionState::Cancelled
        )
    }

    /// Abandon the session from any state. Nothing is stored.
    pub fn cancel(&mut self) -> Reply {
        if let SessionState::AwaitingSave { record } = &self.state {
            log::warn!("Discarding unsaved tournament '{}'", record.name);
        }
        self.state = SessionState::Cancelled;
        Reply::text("⏹ Tournament creation cancelled.")
    }

    /// Handle a button press. Buttons that do not apply to the current state
    /// are ignored.
    pub fn handle_button<H: HistoryStore + ?Sized>(&mut self, button: &ButtonId, store: &mut H) -> Vec<Reply> {
        match button {
            ButtonId::Size(raw) if matches!(self.state, SessionState::AwaitingSize) => {
                vec![self.select_size(raw)]
            }
            ButtonId::Players(raw) if matches!(self.state, SessionState::AwaitingPlayerCount) => {
                vec![self.select_player_count(raw)]
            }
            ButtonId::Match(raw) if matches!(self.state, SessionState::PlayingBracket { .. }) => {
                let reply = self
                    .select_match(raw)
                    .unwrap_or_else(|e| self.reprompt(&e));
                vec![reply]
            }
            ButtonId::RetrySave => {
                match std::mem::replace(&mut self.state, SessionState::Cancelled) {
                    SessionState::AwaitingSave { record } => self.finish(record, store),
                    other => {
                        self.state = other;
                        Vec::new()
                    }
                }
            }
            _ => {
                log::debug!("Ignoring button {} in state {}", button, self.state_name());
                Vec::new()
            }
        }
    }

    /// Handle a free-text message. Text is ignored while waiting for a button.
    pub fn handle_text<R, H>(&mut self, text: &str, rng: &mut R, store: &mut H) -> Vec<Reply>
    where
        R: Rng + ?Sized,
        H: HistoryStore + ?Sized,
    {
        let result = match self.state {
            SessionState::CollectingTeams { .. } => self.add_team(text, rng),
            SessionState::CollectingPlayers { .. } => self.add_player(text, rng),
            SessionState::PlayingBracket { .. } => self.enter_score(text, rng, store),
            _ => {
                log::debug!("Ignoring text in state {}", self.state_name());
                Ok(Vec::new())
            }
        };
        result.unwrap_or_else(|e| {
            log::debug!("Rejected input for '{}': {}", self.name, e);
            vec![self.reprompt(&e)]
        })
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            SessionState::AwaitingSize => "awaiting_size",
            SessionState::AwaitingPlayerCount => "awaiting_player_count",
            SessionState::CollectingTeams { .. } => "collecting_teams",
            SessionState::CollectingPlayers { .. } => "collecting_players",
            SessionState::PlayingBracket { .. } => "playing_bracket",
            SessionState::AwaitingSave { .. } => "awaiting_save",
            SessionState::Finished { .. } => "finished",
            SessionState::Cancelled => "cancelled",
        }
    }

    /// Error message plus the format the current state expects.
    fn reprompt(&self, e: &TournamentError) -> Reply {
        let hint = match &self.state {
            SessionState::CollectingTeams { .. } => {
                format!("\nSend the team as 4 lines:\n{}", render::TEAM_FORMAT_HINT)
            }
            SessionState::CollectingPlayers { .. } => "\nSend the player's name.".to_string(),
            SessionState::PlayingBracket { selected: Some(_), .. } => {
                format!("\n{}", render::SCORE_FORMAT_HINT)
            }
            _ => String::new(),
        };
        Reply::text(format!("❌ {}{}", e, hint))
    }

    /// An unsupported size ends the session.
    fn select_size(&mut self, raw: &str) -> Reply {
        let Some(size) = parse_count(raw, &TEAM_COUNTS) else {
            log::info!("Unsupported size '{}' for '{}', ending session", raw, self.name);
            self.state = SessionState::Cancelled;
            return Reply::text("Unsupported tournament size.");
        };
        self.state = SessionState::CollectingTeams {
            size,
            teams: Vec::with_capacity(size),
        };
        Reply::text(format!(
            "Collecting teams for a tournament of {} teams.\nSend the first team as:\n{}",
            size,
            render::TEAM_FORMAT_HINT
        ))
    }

    fn select_player_count(&mut self, raw: &str) -> Reply {
        let Some(count) = parse_count(raw, &PLAYER_COUNTS) else {
            log::info!("Unsupported player count '{}' for '{}', ending session", raw, self.name);
            self.state = SessionState::Cancelled;
            return Reply::text("Unsupported number of players.");
        };
        self.state = SessionState::CollectingPlayers {
            count,
            players: Vec::with_capacity(count),
        };
        Reply::text(format!(
            "Collecting {} players. Send the first player's name:",
            count
        ))
    }

    fn add_team<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Result<Vec<Reply>, TournamentError> {
        let team = parse_team_block(text)?;
        let SessionState::CollectingTeams { size, teams } = &mut self.state else {
            return Err(TournamentError::InvalidState);
        };
        let team_name = team.name.clone();
        teams.push(team);
        if teams.len() < *size {
            return Ok(vec![Reply::text(format!(
                "✅ Team '{}' added!\nRemaining: {}\nSend the next team in the same format:",
                team_name,
                *size - teams.len()
            ))]);
        }
        let teams = std::mem::take(teams);
        Ok(vec![self.start_bracket(teams, rng)])
    }

    fn add_player<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Result<Vec<Reply>, TournamentError> {
        let player = parse_player_name(text)?;
        let SessionState::CollectingPlayers { count, players } = &mut self.state else {
            return Err(TournamentError::InvalidState);
        };
        let player_name = player.name.clone();
        players.push(player);
        if players.len() < *count {
            return Ok(vec![Reply::text(format!(
                "✅ Player '{}' added ({}/{}). Send the next name:",
                player_name,
                players.len(),
                *count
            ))]);
        }
        let players = std::mem::take(players);
        let teams = partition_players(players, rng);
        let drawn = render::drawn_teams(&teams);
        Ok(vec![drawn, self.start_bracket(teams, rng)])
    }

    fn start_bracket<R: Rng + ?Sized>(&mut self, teams: Vec<Team>, rng: &mut R) -> Reply {
        let team_count = teams.len();
        let bracket = Bracket::new(build_stage(teams, rng));
        log::info!("Tournament '{}' started with {} teams", self.name, team_count);
        let reply = render::bracket(&self.name, &bracket);
        self.state = SessionState::PlayingBracket {
            team_count,
            started_at: Utc::now(),
            bracket,
            selected: None,
        };
        reply
    }

    fn select_match(&mut self, raw: &str) -> Result<Reply, TournamentError> {
        let idx: usize = raw
            .trim()
            .parse()
            .map_err(|_| TournamentError::UnknownMatch(raw.to_string()))?;
        let SessionState::PlayingBracket { bracket, selected, .. } = &mut self.state else {
            return Err(TournamentError::InvalidState);
        };
        let m = bracket
            .current()
            .and_then(|stage| stage.get(idx))
            .ok_or(TournamentError::MatchNotFound(idx))?;
        if m.is_resolved() {
            return Err(TournamentError::MatchAlreadyResolved(idx));
        }
        let opponent = m.team_2.as_ref().map(|t| t.name.as_str()).unwrap_or("—");
        let prompt = format!(
            "🔢 Match {}: {} vs {}\n{}",
            idx + 1,
            m.team_1.name,
            opponent,
            render::SCORE_FORMAT_HINT
        );
        *selected = Some(idx);
        Ok(Reply::text(prompt))
    }

    fn enter_score<R, H>(&mut self, text: &str, rng: &mut R, store: &mut H) -> Result<Vec<Reply>, TournamentError>
    where
        R: Rng + ?Sized,
        H: HistoryStore + ?Sized,
    {
        let SessionState::PlayingBracket {
            team_count,
            started_at,
            bracket,
            selected,
        } = &mut self.state
        else {
            return Err(TournamentError::InvalidState);
        };
        let idx = selected.ok_or(TournamentError::NoMatchSelected)?;
        let (score_1, score_2) = parse_score(text)?;
        let stage = bracket
            .current_mut()
            .ok_or(TournamentError::InvalidState)?;
        stage
            .get_mut(idx)
            .ok_or(TournamentError::MatchNotFound(idx))?
            .record_score(score_1, score_2)?;
        *selected = None;

        match advance_stage(stage, *team_count, rng) {
            Advance::Pending => Ok(vec![render::bracket(&self.name, bracket)]),
            Advance::Next(next) => {
                log::debug!("'{}' advances to a stage of {} matches", self.name, next.len());
                bracket.push(next);
                Ok(vec![render::bracket(&self.name, bracket)])
            }
            Advance::Finished => {
                let record = Tournament::new(self.name.clone(), *started_at, std::mem::take(bracket));
                Ok(self.finish(record, store))
            }
        }
    }

    /// Store the finished tournament. On failure keep the record and offer a retry.
    fn finish<H: HistoryStore + ?Sized>(&mut self, record: Tournament, store: &mut H) -> Vec<Reply> {
        let standings = render::summary(&record);
        match store.put(record.clone()) {
            Ok(id) => {
                log::info!("Tournament '{}' finished and saved as {}", self.name, id);
                self.state = SessionState::Finished { id };
                vec![Reply::text(format!("{}\n\n✅ Tournament saved to history.", standings))]
            }
            Err(e) => {
                log::error!("Failed to save tournament '{}': {}", self.name, e);
                self.state = SessionState::AwaitingSave { record };
                vec![Reply::with_actions(
                    format!("{}\n\n⚠ Could not save the tournament to history: {}", standings, e),
                    vec![Action::new("🔁 Retry saving", ButtonId::RetrySave)],
                )]
            }
        }
    }
}
