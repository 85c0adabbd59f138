//! Parsing of free-text and button input into validated values.

use crate::models::{Player, Team, TournamentError, TEAM_SIZE};

/// Parse a team block: team name on the first line, then one player per line.
pub fn parse_team_block(text: &str) -> Result<Team, TournamentError> {
    let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
    if lines.len() != TEAM_SIZE + 1 {
        return Err(TournamentError::MalformedTeam { lines: lines.len() });
    }
    if lines.iter().any(|line| line.is_empty()) {
        return Err(TournamentError::EmptyField);
    }
    let players = lines[1..].iter().map(|name| Player::new(*name)).collect();
    Ok(Team::new(lines[0], players))
}

/// Parse a single player name for the randomized flow.
pub fn parse_player_name(text: &str) -> Result<Player, TournamentError> {
    let name = text.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyPlayerName);
    }
    Ok(Player::new(name))
}

/// Parse `X:Y` into two non-negative scores.
pub fn parse_score(text: &str) -> Result<(u32, u32), TournamentError> {
    let (left, right) = text
        .trim()
        .split_once(':')
        .ok_or(TournamentError::MalformedScore)?;
    Ok((parse_points(left)?, parse_points(right)?))
}

fn parse_points(raw: &str) -> Result<u32, TournamentError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| TournamentError::MalformedScore)?;
    if value < 0 {
        return Err(TournamentError::NegativeScore);
    }
    u32::try_from(value).map_err(|_| TournamentError::MalformedScore)
}

/// Parse a numeric selection and check it against the allowed values.
pub fn parse_count(raw: &str, allowed: &[usize]) -> Option<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| allowed.contains(n))
}
