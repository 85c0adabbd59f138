//! History of completed tournaments: the store interface and two backends.

use crate::models::{Tournament, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Errors from reading or writing the history.
#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    Format(serde_json::Error),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::Io(e) => write!(f, "history storage error: {}", e),
            HistoryError::Format(e) => write!(f, "history format error: {}", e),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Io(e) => Some(e),
            HistoryError::Format(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(e: std::io::Error) -> Self {
        HistoryError::Io(e)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Format(e)
    }
}

/// Listing view of a stored tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub champion: Option<String>,
}

impl TournamentSummary {
    pub fn from_record(id: TournamentId, t: &Tournament) -> Self {
        Self {
            id,
            name: t.name.clone(),
            created_at: t.created_at,
            champion: t.champion().map(|team| team.name.clone()),
        }
    }
}

/// Key-value store of finished tournaments. Each call stands alone; records
/// are only ever added whole or deleted whole.
pub trait HistoryStore {
    /// Store a record under a fresh id.
    fn put(&mut self, record: Tournament) -> Result<TournamentId, HistoryError>;
    /// All records, oldest first.
    fn list(&self) -> Result<Vec<TournamentSummary>, HistoryError>;
    fn get(&self, id: &TournamentId) -> Result<Option<Tournament>, HistoryError>;
    /// Remove a record. `Ok(false)` if there was nothing to remove.
    fn delete(&mut self, id: &TournamentId) -> Result<bool, HistoryError>;
}

/// Ids are UUIDv7: time ordered, so map order is creation order.
fn fresh_id() -> TournamentId {
    Uuid::now_v7()
}

fn summarize(records: &BTreeMap<TournamentId, Tournament>) -> Vec<TournamentSummary> {
    records
        .iter()
        .map(|(id, t)| TournamentSummary::from_record(*id, t))
        .collect()
}

/// In-process history, lost on restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryHistory {
    records: BTreeMap<TournamentId, Tournament>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistoryStore for MemoryHistory {
    fn put(&mut self, record: Tournament) -> Result<TournamentId, HistoryError> {
        let id = fresh_id();
        self.records.insert(id, record);
        Ok(id)
    }

    fn list(&self) -> Result<Vec<TournamentSummary>, HistoryError> {
        Ok(summarize(&self.records))
    }

    fn get(&self, id: &TournamentId) -> Result<Option<Tournament>, HistoryError> {
        Ok(self.records.get(id).cloned())
    }

    fn delete(&mut self, id: &TournamentId) -> Result<bool, HistoryError> {
        Ok(self.records.remove(id).is_some())
    }
}

/// History kept in one pretty-printed JSON object keyed by id. The file is
/// read on every call and replaced on every change.
#[derive(Clone, Debug)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<TournamentId, Tournament>, HistoryError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Sibling file the next version is written to before it replaces the history.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Write to the temp file, then rename it over the history so a failed
    /// write never leaves a truncated file behind.
    fn save(&self, records: &BTreeMap<TournamentId, Tournament>) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HistoryStore for JsonFileHistory {
    fn put(&mut self, record: Tournament) -> Result<TournamentId, HistoryError> {
        let mut records = self.load()?;
        let id = fresh_id();
        records.insert(id, record);
        self.save(&records)?;
        Ok(id)
    }

    fn list(&self) -> Result<Vec<TournamentSummary>, HistoryError> {
        Ok(summarize(&self.load()?))
    }

    fn get(&self, id: &TournamentId) -> Result<Option<Tournament>, HistoryError> {
        Ok(self.load()?.remove(id))
    }

    fn delete(&mut self, id: &TournamentId) -> Result<bool, HistoryError> {
        let mut records = self.load()?;
        if records.remove(id).is_none() {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }
}
