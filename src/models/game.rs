//! Match, Stage and Bracket for a single-elimination tournament.

use crate::models::player::Team;
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// Which side of a match won.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// A single match. `team_2` is absent for a bye (or a lone finalist).
///
/// Scores are both set or both unset. `winner` is set once a result is
/// recorded, or immediately for a bye.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub team_1: Team,
    pub team_2: Option<Team>,
    pub score_1: Option<u32>,
    pub score_2: Option<u32>,
    pub winner: Option<Side>,
    #[serde(default)]
    pub is_third_place: bool,
}

impl GameMatch {
    /// An unplayed match between two teams.
    pub fn new(team_1: Team, team_2: Team) -> Self {
        Self {
            team_1,
            team_2: Some(team_2),
            score_1: None,
            score_2: None,
            winner: None,
            is_third_place: false,
        }
    }

    /// A match with no opponent; `team_1` advances without playing.
    pub fn bye(team_1: Team) -> Self {
        Self {
            team_1,
            team_2: None,
            score_1: None,
            score_2: None,
            winner: Some(Side::One),
            is_third_place: false,
        }
    }

    /// The match for third place, played by the two semifinal losers.
    pub fn third_place(team_1: Team, team_2: Team) -> Self {
        Self {
            is_third_place: true,
            ..Self::new(team_1, team_2)
        }
    }

    pub fn is_bye(&self) -> bool {
        self.team_2.is_none()
    }

    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    pub fn has_scores(&self) -> bool {
        self.score_1.is_some() && self.score_2.is_some()
    }

    pub fn team(&self, side: Side) -> Option<&Team> {
        match side {
            Side::One => Some(&self.team_1),
            Side::Two => self.team_2.as_ref(),
        }
    }

    pub fn winner_team(&self) -> Option<&Team> {
        self.winner.and_then(|side| self.team(side))
    }

    /// The beaten side. None for a bye or an unplayed match.
    pub fn loser_team(&self) -> Option<&Team> {
        self.winner.and_then(|side| self.team(side.other()))
    }

    /// Record the final score. The higher score wins; ties are refused since
    /// there is no tie-break rule.
    pub fn record_score(&mut self, score_1: u32, score_2: u32) -> Result<Side, TournamentError> {
        if self.is_bye() || self.is_resolved() {
            return Err(TournamentError::InvalidState);
        }
        if score_1 == score_2 {
            return Err(TournamentError::TiedScore);
        }
        let winner = if score_1 > score_2 { Side::One } else { Side::Two };
        self.score_1 = Some(score_1);
        self.score_2 = Some(score_2);
        self.winner = Some(winner);
        Ok(winner)
    }
}

/// One round of matches played in parallel. Order only matters for display
/// and for addressing a match by index.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage {
    pub matches: Vec<GameMatch>,
}

impl Stage {
    pub fn new(matches: Vec<GameMatch>) -> Self {
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&GameMatch> {
        self.matches.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut GameMatch> {
        self.matches.get_mut(idx)
    }

    /// Every match has a winner.
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(GameMatch::is_resolved)
    }

    pub fn has_third_place(&self) -> bool {
        self.matches.iter().any(|m| m.is_third_place)
    }

    /// Indices of matches still waiting for a result.
    pub fn unresolved(&self) -> Vec<usize> {
        self.matches
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_resolved())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Winners that stay in contention, in match order. The third-place match
    /// never feeds the next round.
    pub fn advancing(&self) -> Vec<Team> {
        self.matches
            .iter()
            .filter(|m| !m.is_third_place)
            .filter_map(|m| m.winner_team().cloned())
            .collect()
    }

    /// Losers of contested matches, in match order.
    pub fn losers(&self) -> Vec<Team> {
        self.matches
            .iter()
            .filter_map(|m| m.loser_team().cloned())
            .collect()
    }

    /// The match deciding the title: the only non-third-place match, if the
    /// stage has exactly one.
    pub fn final_match(&self) -> Option<&GameMatch> {
        let mut contenders = self.matches.iter().filter(|m| !m.is_third_place);
        match (contenders.next(), contenders.next()) {
            (Some(m), None) => Some(m),
            _ => None,
        }
    }

    pub fn third_place_match(&self) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.is_third_place)
    }
}

/// Append-only list of stages; stage i+1 is derived from stage i.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bracket {
    stages: Vec<Stage>,
}

impl Bracket {
    pub fn new(first: Stage) -> Self {
        Self {
            stages: vec![first],
        }
    }

    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn current(&self) -> Option<&Stage> {
        self.stages.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Stage> {
        self.stages.last_mut()
    }

    /// Winner of the title match in the last stage, once played.
    pub fn champion(&self) -> Option<&Team> {
        self.current()?.final_match()?.winner_team()
    }

    pub fn runner_up(&self) -> Option<&Team> {
        self.current()?.final_match()?.loser_team()
    }

    pub fn third_place(&self) -> Option<&Team> {
        self.current()?.third_place_match()?.winner_team()
    }
}
