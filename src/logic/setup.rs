//! Setup phase: turn the entrants into the first stage of the bracket.

use crate::models::{GameMatch, Player, Stage, Team, TEAM_SIZE};
use rand::seq::SliceRandom;
use rand::Rng;

/// Bracket sizes offered for manually entered teams.
pub const TEAM_COUNTS: [usize; 4] = [2, 4, 8, 16];

/// Pool sizes offered for the randomized flow.
pub const PLAYER_COUNTS: [usize; 2] = [6, 12];

/// Build a stage from the given competitors.
///
/// 1. A single competitor gets a pre-decided match with no opponent.
/// 2. Otherwise shuffle and pair consecutively.
/// 3. With an odd count the last competitor gets a bye and advances at once.
pub fn build_stage<R: Rng + ?Sized>(mut teams: Vec<Team>, rng: &mut R) -> Stage {
    if teams.len() == 1 {
        return Stage::new(teams.into_iter().map(GameMatch::bye).collect());
    }
    teams.shuffle(rng);

    let mut matches = Vec::with_capacity(teams.len().div_ceil(2));
    let mut iter = teams.into_iter();
    while let Some(team_1) = iter.next() {
        match iter.next() {
            Some(team_2) => matches.push(GameMatch::new(team_1, team_2)),
            None => {
                log::debug!("{} gets a bye", team_1.name);
                matches.push(GameMatch::bye(team_1));
            }
        }
    }
    Stage::new(matches)
}

/// Split a pool of players into randomly drawn teams of [`TEAM_SIZE`],
/// named `Team A`, `Team B`, ... in draw order.
///
/// The caller checks the pool size; players left over after the last full
/// team are not placed.
pub fn partition_players<R: Rng + ?Sized>(mut players: Vec<Player>, rng: &mut R) -> Vec<Team> {
    debug_assert_eq!(players.len() % TEAM_SIZE, 0);
    players.shuffle(rng);
    players
        .chunks_exact(TEAM_SIZE)
        .enumerate()
        .map(|(i, chunk)| Team::new(format!("Team {}", team_letter(i)), chunk.to_vec()))
        .collect()
}

/// `0 -> A`, `1 -> B`, ... wrapping to `AA`, `AB` past `Z`.
fn team_letter(mut i: usize) -> String {
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (i % 26) as u8);
        if i < 26 {
            break;
        }
        i = i / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}
