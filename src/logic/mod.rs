//! Tournament business logic: bracket setup, advancement, input parsing.

mod advance;
mod input;
mod setup;

pub use advance::{advance_rule, advance_stage, Advance, AdvanceRule, THIRD_PLACE_MIN_TEAMS};
pub use input::{parse_count, parse_player_name, parse_score, parse_team_block};
pub use setup::{build_stage, partition_players, PLAYER_COUNTS, TEAM_COUNTS};
