//! Stage advancement: ordinary halving, the final/third-place fork, and the
//! end of the tournament.

use crate::logic::setup::build_stage;
use crate::models::{GameMatch, Stage};
use rand::Rng;

/// Smallest field that plays a third-place match.
pub const THIRD_PLACE_MIN_TEAMS: usize = 4;

/// What a stage leads to, decided once per advancement.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdvanceRule {
    /// Some match still has no result.
    Pending,
    /// Two contested semifinals: next comes the final plus the third-place match.
    Fork,
    /// One title winner is left.
    Finished,
    /// Winners are paired again into a smaller stage.
    Halve,
}

/// Outcome of advancing a stage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advance {
    Pending,
    Next(Stage),
    Finished,
}

/// Decide how `stage` advances in a tournament that started with `team_count` teams.
pub fn advance_rule(stage: &Stage, team_count: usize) -> AdvanceRule {
    if !stage.is_complete() {
        return AdvanceRule::Pending;
    }
    if is_semifinal_pair(stage, team_count) {
        return AdvanceRule::Fork;
    }
    if stage.advancing().len() <= 1 {
        return AdvanceRule::Finished;
    }
    AdvanceRule::Halve
}

fn is_semifinal_pair(stage: &Stage, team_count: usize) -> bool {
    team_count >= THIRD_PLACE_MIN_TEAMS
        && stage.len() == 2
        && !stage.has_third_place()
        && stage.matches.iter().all(|m| !m.is_bye())
}

/// Produce the next stage, or report that the bracket is pending or finished.
pub fn advance_stage<R: Rng + ?Sized>(stage: &Stage, team_count: usize, rng: &mut R) -> Advance {
    match advance_rule(stage, team_count) {
        AdvanceRule::Pending => Advance::Pending,
        AdvanceRule::Finished => Advance::Finished,
        AdvanceRule::Fork => Advance::Next(fork_stage(stage)),
        AdvanceRule::Halve => Advance::Next(build_stage(stage.advancing(), rng)),
    }
}

/// Final between the semifinal winners, third-place match between the losers.
fn fork_stage(semifinals: &Stage) -> Stage {
    let mut winners = semifinals.advancing().into_iter();
    let mut losers = semifinals.losers().into_iter();
    let mut matches = Vec::with_capacity(2);
    if let (Some(a), Some(b)) = (winners.next(), winners.next()) {
        matches.push(GameMatch::new(a, b));
    }
    if let (Some(a), Some(b)) = (losers.next(), losers.next()) {
        matches.push(GameMatch::third_place(a, b));
    }
    Stage::new(matches)
}
