//! Integration tests for the bracket engine: building, partitioning, advancing.

use bracket_bot::{
    advance_rule, advance_stage, build_stage, partition_players, Advance, AdvanceRule, Bracket,
    GameMatch, Player, Side, Stage, Team, Tournament, TournamentError, PLAYER_COUNTS,
    TEAM_COUNTS, TEAM_SIZE,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| {
            Team::new(
                format!("T{i}"),
                (0..TEAM_SIZE).map(|p| Player::new(format!("T{i}P{p}"))).collect(),
            )
        })
        .collect()
}

/// Team 1 wins every open match of the stage.
fn play_stage(stage: &mut Stage) {
    for m in &mut stage.matches {
        if !m.is_resolved() {
            m.record_score(3, 1).unwrap();
        }
    }
}

/// Play every stage until the bracket finishes; returns it.
fn play_bracket(n: usize, seed: u64) -> Bracket {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bracket = Bracket::new(build_stage(teams(n), &mut rng));
    loop {
        let stage = bracket.current_mut().unwrap();
        play_stage(stage);
        match advance_stage(stage, n, &mut rng) {
            Advance::Next(next) => bracket.push(next),
            Advance::Finished => return bracket,
            Advance::Pending => panic!("stage still pending after playing it"),
        }
    }
}

fn stage_sizes(bracket: &Bracket) -> Vec<usize> {
    bracket.stages().iter().map(Stage::len).collect()
}

#[test]
fn first_stage_pairs_every_team_once() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in TEAM_COUNTS {
        let stage = build_stage(teams(n), &mut rng);
        assert_eq!(stage.len(), n.div_ceil(2));

        let mut seen: HashMap<String, usize> = HashMap::new();
        for m in &stage.matches {
            assert!(!m.is_resolved());
            assert!(!m.is_third_place);
            *seen.entry(m.team_1.name.clone()).or_default() += 1;
            *seen.entry(m.team_2.as_ref().unwrap().name.clone()).or_default() += 1;
        }
        assert_eq!(seen.len(), n);
        assert!(seen.values().all(|&count| count == 1));
    }
}

#[test]
fn same_seed_gives_same_pairing() {
    let a = build_stage(teams(16), &mut StdRng::seed_from_u64(42));
    let b = build_stage(teams(16), &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn single_team_is_decided_immediately() {
    let stage = build_stage(teams(1), &mut StdRng::seed_from_u64(1));
    assert_eq!(stage.len(), 1);
    let m = &stage.matches[0];
    assert!(m.team_2.is_none());
    assert_eq!(m.winner, Some(Side::One));
    assert!(!m.has_scores());
    assert_eq!(advance_rule(&stage, 1), AdvanceRule::Finished);
}

#[test]
fn odd_count_gives_a_resolved_bye() {
    let stage = build_stage(teams(5), &mut StdRng::seed_from_u64(3));
    assert_eq!(stage.len(), 3);
    let byes: Vec<&GameMatch> = stage.matches.iter().filter(|m| m.is_bye()).collect();
    assert_eq!(byes.len(), 1);
    assert_eq!(byes[0].winner, Some(Side::One));
    assert_eq!(stage.unresolved().len(), 2);
}

#[test]
fn partition_makes_full_teams_from_every_player() {
    let mut rng = StdRng::seed_from_u64(11);
    for count in PLAYER_COUNTS {
        let players: Vec<Player> = (0..count).map(|i| Player::new(format!("P{i}"))).collect();
        let drawn = partition_players(players, &mut rng);
        assert_eq!(drawn.len(), count / TEAM_SIZE);

        let mut names: Vec<String> = Vec::new();
        for (i, team) in drawn.iter().enumerate() {
            assert_eq!(team.players.len(), TEAM_SIZE);
            assert_eq!(team.name, format!("Team {}", (b'A' + i as u8) as char));
            names.extend(team.players.iter().map(|p| p.name.clone()));
        }
        names.sort();
        let mut expected: Vec<String> = (0..count).map(|i| format!("P{i}")).collect();
        expected.sort();
        assert_eq!(names, expected);
    }
}

#[test]
fn higher_score_wins() {
    let mut t = teams(2).into_iter();
    let (a, b) = (t.next().unwrap(), t.next().unwrap());

    let mut m = GameMatch::new(a.clone(), b.clone());
    assert_eq!(m.record_score(3, 1), Ok(Side::One));
    assert_eq!(m.winner_team(), Some(&a));
    assert_eq!(m.loser_team(), Some(&b));

    let mut m = GameMatch::new(a, b.clone());
    assert_eq!(m.record_score(1, 3), Ok(Side::Two));
    assert_eq!(m.winner_team(), Some(&b));
}

#[test]
fn tie_is_refused_and_leaves_match_open() {
    let mut t = teams(2).into_iter();
    let mut m = GameMatch::new(t.next().unwrap(), t.next().unwrap());
    assert_eq!(m.record_score(2, 2), Err(TournamentError::TiedScore));
    assert!(!m.has_scores());
    assert!(!m.is_resolved());
}

#[test]
fn played_match_cannot_be_scored_again() {
    let mut t = teams(2).into_iter();
    let mut m = GameMatch::new(t.next().unwrap(), t.next().unwrap());
    m.record_score(1, 0).unwrap();
    assert_eq!(m.record_score(0, 1), Err(TournamentError::InvalidState));
    assert_eq!(m.score_1, Some(1));
}

#[test]
fn unfinished_stage_is_pending() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut stage = build_stage(teams(4), &mut rng);
    stage.matches[0].record_score(2, 0).unwrap();
    assert_eq!(advance_rule(&stage, 4), AdvanceRule::Pending);
    assert_eq!(advance_stage(&stage, 4, &mut rng), Advance::Pending);
}

#[test]
fn two_teams_finish_after_one_match() {
    let bracket = play_bracket(2, 9);
    assert_eq!(stage_sizes(&bracket), vec![1]);
    assert!(bracket.champion().is_some());
    assert!(bracket.third_place().is_none());
}

#[test]
fn semifinals_fork_into_final_and_third_place() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut semis = build_stage(teams(4), &mut rng);
    semis.matches[0].record_score(3, 1).unwrap();
    semis.matches[1].record_score(0, 2).unwrap();
    assert_eq!(advance_rule(&semis, 4), AdvanceRule::Fork);

    let winners = semis.advancing();
    let losers = semis.losers();
    let Advance::Next(finals) = advance_stage(&semis, 4, &mut rng) else {
        panic!("expected a final stage");
    };
    assert_eq!(finals.len(), 2);

    let final_match = finals.final_match().unwrap();
    assert!(!final_match.is_third_place);
    assert_eq!(final_match.team_1, winners[0]);
    assert_eq!(final_match.team_2.as_ref(), Some(&winners[1]));

    let third = finals.third_place_match().unwrap();
    assert!(third.is_third_place);
    assert_eq!(third.team_1, losers[0]);
    assert_eq!(third.team_2.as_ref(), Some(&losers[1]));
    assert!(finals.unresolved().len() == 2);
}

#[test]
fn fork_needs_at_least_four_teams() {
    // Two contested matches in a 3-team field halve instead of forking.
    let mut t = teams(4).into_iter();
    let mut stage = Stage::new(vec![
        GameMatch::new(t.next().unwrap(), t.next().unwrap()),
        GameMatch::new(t.next().unwrap(), t.next().unwrap()),
    ]);
    play_stage(&mut stage);
    assert_eq!(advance_rule(&stage, 3), AdvanceRule::Halve);
    assert_eq!(advance_rule(&stage, 4), AdvanceRule::Fork);
}

#[test]
fn final_with_third_place_finishes_once_both_are_played() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut semis = build_stage(teams(4), &mut rng);
    play_stage(&mut semis);
    let Advance::Next(mut finals) = advance_stage(&semis, 4, &mut rng) else {
        panic!("expected a final stage");
    };
    finals.matches[0].record_score(5, 4).unwrap();
    assert_eq!(advance_rule(&finals, 4), AdvanceRule::Pending);
    finals.matches[1].record_score(1, 0).unwrap();
    assert_eq!(advance_rule(&finals, 4), AdvanceRule::Finished);
}

#[test]
fn four_teams_store_winner_and_third_place() {
    let bracket = play_bracket(4, 13);
    assert_eq!(stage_sizes(&bracket), vec![2, 2]);
    let record = Tournament::new("Cup", Utc::now(), bracket);
    assert!(record.champion().is_some());
    assert!(record.runner_up().is_some());
    assert!(record.third_place().is_some());
    assert_ne!(record.champion(), record.third_place());
}

#[test]
fn eight_teams_halve_then_fork() {
    let bracket = play_bracket(8, 17);
    assert_eq!(stage_sizes(&bracket), vec![4, 2, 2]);
    assert!(bracket.current().unwrap().has_third_place());
}

#[test]
fn sixteen_teams_play_four_rounds() {
    let bracket = play_bracket(16, 23);
    assert_eq!(stage_sizes(&bracket), vec![8, 4, 2, 2]);
}

#[test]
fn odd_fields_never_drop_a_team() {
    // 6 teams: 3 winners, then a match plus a bye, then a final without a
    // third-place match because the bye has no loser.
    let bracket = play_bracket(6, 29);
    assert_eq!(stage_sizes(&bracket), vec![3, 2, 1]);
    assert!(bracket.champion().is_some());
    assert!(bracket.third_place().is_none());

    let bracket = play_bracket(3, 31);
    assert_eq!(stage_sizes(&bracket), vec![2, 1]);
    assert!(bracket.champion().is_some());
}
