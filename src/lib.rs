//! Single-elimination tournament bot: bracket engine, chat sessions and history.

pub mod bot;
pub mod chat;
pub mod config;
pub mod history;
pub mod logic;
pub mod models;
pub mod registry;
pub mod render;
pub mod session;

pub use bot::Bot;
pub use chat::{Action, ButtonId, ChatId, Event, Reply};
pub use config::{Config, ConfigError};
pub use history::{HistoryError, HistoryStore, JsonFileHistory, MemoryHistory, TournamentSummary};
pub use logic::{
    advance_rule, advance_stage, build_stage, parse_count, parse_player_name, parse_score,
    parse_team_block, partition_players, Advance, AdvanceRule, PLAYER_COUNTS, TEAM_COUNTS,
};
pub use models::{
    Bracket, GameMatch, Player, Side, Stage, Team, Tournament, TournamentError, TournamentId,
    TEAM_SIZE,
};
pub use registry::SessionRegistry;
pub use session::{SessionState, TournamentSession};
