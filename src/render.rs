//! Text rendering for chat replies.

use crate::chat::{Action, ButtonId, Reply};
use crate::history::TournamentSummary;
use crate::logic::{PLAYER_COUNTS, TEAM_COUNTS};
use crate::models::{Bracket, GameMatch, Team, Tournament, TournamentId, DATE_FORMAT};
use std::fmt::Write;

pub const TEAM_FORMAT_HINT: &str = "Team name\nPlayer 1\nPlayer 2\nPlayer 3";
pub const SCORE_FORMAT_HINT: &str = "Send the result as X:Y, for example 3:2 (team 1 : team 2)";
pub const TOURNAMENT_USAGE: &str = "Usage: /tournament <tournament name>";
pub const RANDOM_TOURNAMENT_USAGE: &str = "Usage: /randomtournament <tournament name>";

pub fn size_prompt() -> Reply {
    let actions = TEAM_COUNTS
        .iter()
        .map(|n| Action::new(format!("Tournament of {} teams", n), ButtonId::Size(n.to_string())))
        .collect();
    Reply::with_actions("Choose the tournament size:", actions)
}

pub fn player_count_prompt() -> Reply {
    let actions = PLAYER_COUNTS
        .iter()
        .map(|n| Action::new(format!("{} players", n), ButtonId::Players(n.to_string())))
        .collect();
    Reply::with_actions("How many players take part?", actions)
}

fn match_line(m: &GameMatch) -> String {
    let prefix = if m.is_third_place { "3rd place: " } else { "" };
    match (&m.team_2, m.score_1, m.score_2) {
        (None, _, _) => format!("{}{} — (bye)", prefix, m.team_1.name),
        (Some(t2), Some(s1), Some(s2)) => {
            format!("{}{} {}:{} {}", prefix, m.team_1.name, s1, s2, t2.name)
        }
        (Some(t2), _, _) => format!("{}{} — {}", prefix, m.team_1.name, t2.name),
    }
}

/// Roster block for one team.
pub fn format_team(team: Option<&Team>) -> String {
    let Some(team) = team else {
        return "—".to_string();
    };
    let mut out = team.name.clone();
    for (i, player) in team.players.iter().enumerate() {
        let _ = write!(out, "\nPlayer {}: {}", i + 1, player);
    }
    out
}

/// Standings of an in-progress bracket, with one action per unplayed match.
pub fn bracket(name: &str, bracket: &Bracket) -> Reply {
    let mut text = format!("Tournament: {}\n", name);
    for (i, stage) in bracket.stages().iter().enumerate() {
        let _ = write!(text, "\nStage {}:\n", i + 1);
        for m in &stage.matches {
            let _ = writeln!(text, "{}", match_line(m));
        }
    }
    let actions = bracket
        .current()
        .map(|stage| {
            stage
                .unresolved()
                .into_iter()
                .map(|idx| {
                    Action::new(
                        format!("Enter result of match {}", idx + 1),
                        ButtonId::Match(idx.to_string()),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    Reply::with_actions(text.trim_end(), actions)
}

/// Teams drawn in the randomized flow.
pub fn drawn_teams(teams: &[Team]) -> Reply {
    let blocks: Vec<String> = teams.iter().map(|t| format_team(Some(t))).collect();
    Reply::text(format!("Teams drawn:\n\n{}", blocks.join("\n\n")))
}

/// Final standings of a finished tournament.
pub fn summary(t: &Tournament) -> String {
    let mut text = match t.champion() {
        Some(champion) => format!("🏆 Winner of tournament '{}': {}!", t.name, champion.name),
        None => format!("Tournament '{}' is over.", t.name),
    };
    if let Some(runner_up) = t.runner_up() {
        let _ = write!(text, "\n🥈 Runner-up: {}", runner_up.name);
    }
    if let Some(third) = t.third_place() {
        let _ = write!(text, "\n🥉 Third place: {}", third.name);
    }
    text
}

pub fn history_list(summaries: &[TournamentSummary]) -> Reply {
    if summaries.is_empty() {
        return Reply::text("📁 Tournament history is empty.");
    }
    let mut actions: Vec<Action> = summaries
        .iter()
        .map(|s| {
            Action::new(
                format!("{} ({})", s.name, s.created_at.format(DATE_FORMAT)),
                ButtonId::View(s.id.to_string()),
            )
        })
        .collect();
    actions.push(Action::new("➕ Create a new tournament", ButtonId::NewTournament));
    Reply::with_actions("📁 Tournament history:", actions)
}

/// Full record: every stage, and rosters for matches that were played.
pub fn history_detail(id: TournamentId, t: &Tournament) -> Reply {
    let mut text = format!("{}\n📅 Date: {}\n", t.name, t.date_label());
    for (i, stage) in t.stages().iter().enumerate() {
        let _ = write!(text, "\nStage {}:\n", i + 1);
        for m in &stage.matches {
            let _ = writeln!(text, "{}", match_line(m));
            if m.has_scores() {
                let _ = writeln!(
                    text,
                    "👥 Players:\n{}\n{}",
                    format_team(Some(&m.team_1)),
                    format_team(m.team_2.as_ref())
                );
            }
        }
    }
    let _ = write!(text, "\n{}", summary(t));
    let actions = vec![
        Action::new("🗑 Delete tournament", ButtonId::Delete(id.to_string())),
        Action::new("⬅ Back to list", ButtonId::BackToHistory),
    ];
    Reply::with_actions(text, actions)
}
