//! Data structures for the bracket: players, teams, matches, stages, stored tournaments.

mod game;
mod player;
mod tournament;

pub use game::{Bracket, GameMatch, Side, Stage};
pub use player::{Player, Team, TEAM_SIZE};
pub use tournament::{Tournament, TournamentError, TournamentId, DATE_FORMAT};
