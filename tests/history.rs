//! Integration tests for the history stores and input parsing.

use bracket_bot::{
    parse_score, parse_team_block, Bracket, GameMatch, HistoryStore, JsonFileHistory,
    MemoryHistory, Player, Stage, Team, Tournament, TournamentError,
};
use chrono::{TimeZone, Utc};
use std::path::PathBuf;
use uuid::Uuid;

fn team(name: &str) -> Team {
    Team::new(
        name,
        vec![Player::new("a"), Player::new("b"), Player::new("c")],
    )
}

fn record(name: &str) -> Tournament {
    let mut played = GameMatch::new(team("Red"), team("Blue"));
    played.record_score(4, 2).unwrap();
    let stage = Stage::new(vec![played, GameMatch::new(team("Green"), team("Gold")), GameMatch::bye(team("Solo"))]);
    let created_at = Utc.with_ymd_and_hms(2025, 3, 14, 18, 30, 0).unwrap();
    Tournament::new(name, created_at, Bracket::new(stage))
}

#[test]
fn memory_store_put_list_get_delete() {
    let mut store = MemoryHistory::new();
    let first = store.put(record("One")).unwrap();
    let second = store.put(record("Two")).unwrap();
    assert_ne!(first, second);

    let list = store.list().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name, "One");
    assert_eq!(list[1].name, "Two");

    assert_eq!(store.get(&first).unwrap(), Some(record("One")));
    assert!(store.delete(&first).unwrap());
    assert_eq!(store.get(&first).unwrap(), None);
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn deleting_unknown_id_reports_failure() {
    let mut store = MemoryHistory::new();
    store.put(record("Kept")).unwrap();
    assert!(!store.delete(&Uuid::now_v7()).unwrap());
    assert_eq!(store.len(), 1);
}

/// Unique history path in the temp dir; both the file and its temp sibling
/// are removed on drop, even when an assertion fails.
struct TempHistoryFile(PathBuf);

impl TempHistoryFile {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("bracket_bot_{}.json", Uuid::now_v7())))
    }
}

impl Drop for TempHistoryFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
        let _ = std::fs::remove_file(JsonFileHistory::new(&self.0).temp_path());
    }
}

#[test]
fn json_file_store_keeps_absent_fields() {
    let file = TempHistoryFile::new();
    let mut store = JsonFileHistory::new(&file.0);
    assert!(store.list().unwrap().is_empty());

    let id = store.put(record("Saved")).unwrap();

    // A fresh handle reads the same file.
    let reopened = JsonFileHistory::new(&file.0);
    let loaded = reopened.get(&id).unwrap().unwrap();
    assert_eq!(loaded, record("Saved"));
    let stage = &loaded.stages()[0];
    assert_eq!(stage.matches[1].score_1, None);
    assert!(stage.matches[2].team_2.is_none());

    let json = std::fs::read_to_string(&file.0).unwrap();
    assert!(json.contains("\"team_2\": null"));
    assert!(json.contains("\"score_1\": null"));
    assert!(json.contains("\"is_third_place\": false"));

    let list = reopened.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].champion.as_deref(), None);

    assert!(store.delete(&id).unwrap());
    assert!(!store.delete(&id).unwrap());
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn leftover_partial_write_does_not_break_history() {
    let file = TempHistoryFile::new();
    let mut store = JsonFileHistory::new(&file.0);
    let kept = store.put(record("Kept")).unwrap();

    // An interrupted write leaves a truncated temp file next to the history.
    std::fs::write(store.temp_path(), "{\"broken\": [").unwrap();

    assert_eq!(store.list().unwrap().len(), 1);
    assert_eq!(store.get(&kept).unwrap(), Some(record("Kept")));

    let added = store.put(record("Next")).unwrap();
    assert!(!store.temp_path().exists());
    let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Kept", "Next"]);
    assert!(store.get(&added).unwrap().is_some());
}

#[test]
fn date_label_uses_day_month_year() {
    assert_eq!(record("Dated").date_label(), "14.03.2025 18:30");
}

#[test]
fn score_parsing() {
    assert_eq!(parse_score("3:1"), Ok((3, 1)));
    assert_eq!(parse_score(" 0 : 12 "), Ok((0, 12)));
    assert_eq!(parse_score("abc"), Err(TournamentError::MalformedScore));
    assert_eq!(parse_score("3-2"), Err(TournamentError::MalformedScore));
    assert_eq!(parse_score("1:2:3"), Err(TournamentError::MalformedScore));
    assert_eq!(parse_score("-1:2"), Err(TournamentError::NegativeScore));
}

#[test]
fn team_block_parsing() {
    let t = parse_team_block("  Wolves \n Ann\nBob \n Cid\n").unwrap();
    assert_eq!(t.name, "Wolves");
    let names: Vec<&str> = t.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bob", "Cid"]);

    assert_eq!(
        parse_team_block("Wolves\nAnn\nBob"),
        Err(TournamentError::MalformedTeam { lines: 3 })
    );
    assert_eq!(
        parse_team_block("Wolves\nAnn\n  \nCid"),
        Err(TournamentError::EmptyField)
    );
}
