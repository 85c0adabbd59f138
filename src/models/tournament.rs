//! Completed tournament record and input validation errors.

use crate::models::game::{Bracket, Stage};
use crate::models::player::Team;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Date format used wherever a tournament's creation time is shown.
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Errors from validating user input or stepping the bracket.
/// None of these are fatal: the session re-prompts and keeps its state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Team block did not have exactly four lines.
    MalformedTeam { lines: usize },
    /// Team name or a player name in the team block was blank.
    EmptyField,
    /// Blank player name in the randomized flow.
    EmptyPlayerName,
    /// Score was not `X:Y` with two integers.
    MalformedScore,
    /// Score contained a negative number.
    NegativeScore,
    /// Both sides scored the same; there is no tie-break rule.
    TiedScore,
    /// Team count is not one of the supported bracket sizes.
    UnsupportedSize(usize),
    /// Player count is not one of the supported pool sizes.
    UnsupportedPlayerCount(usize),
    /// A score arrived before any match was picked.
    NoMatchSelected,
    /// Match index is not in the current stage.
    MatchNotFound(usize),
    /// Match id in a button is not a match number.
    UnknownMatch(String),
    /// Match already has a result.
    MatchAlreadyResolved(usize),
    /// Action does not apply in the current state.
    InvalidState,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::MalformedTeam { lines } => write!(
                f,
                "Wrong format: expected exactly 4 lines (team name and 3 players), got {}",
                lines
            ),
            TournamentError::EmptyField => write!(f, "All fields are required"),
            TournamentError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            TournamentError::MalformedScore => write!(f, "Wrong format: use X:Y, for example 3:1"),
            TournamentError::NegativeScore => write!(f, "Scores must be non-negative integers"),
            TournamentError::TiedScore => write!(f, "A match cannot end in a draw"),
            TournamentError::UnsupportedSize(n) => write!(f, "Unsupported tournament size: {}", n),
            TournamentError::UnsupportedPlayerCount(n) => {
                write!(f, "Unsupported number of players: {}", n)
            }
            TournamentError::NoMatchSelected => write!(f, "Pick a match before entering a score"),
            TournamentError::MatchNotFound(idx) => write!(f, "Match {} does not exist", idx + 1),
            TournamentError::UnknownMatch(raw) => write!(f, "Unknown match '{}'", raw),
            TournamentError::MatchAlreadyResolved(idx) => {
                write!(f, "Match {} already has a result", idx + 1)
            }
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a stored tournament.
pub type TournamentId = Uuid;

/// A finished tournament as kept in history. Immutable once stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub stages: Bracket,
}

impl Tournament {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>, stages: Bracket) -> Self {
        Self {
            name: name.into(),
            created_at,
            stages,
        }
    }

    pub fn stages(&self) -> &[Stage] {
        self.stages.stages()
    }

    pub fn champion(&self) -> Option<&Team> {
        self.stages.champion()
    }

    pub fn runner_up(&self) -> Option<&Team> {
        self.stages.runner_up()
    }

    pub fn third_place(&self) -> Option<&Team> {
        self.stages.third_place()
    }

    /// Creation time as shown to users.
    pub fn date_label(&self) -> String {
        self.created_at.format(DATE_FORMAT).to_string()
    }
}
