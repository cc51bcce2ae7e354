//! Game stores: where outbound writes end up.
//!
//! A store is the local stand-in for the backend. Applying a write is
//! idempotent on its `WriteKey`, and a game-data write older than the one
//! already stored never replaces it.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use decolagem_core::commands::ChoiceEffect;
use decolagem_core::persist::{GameData, OutboundWrite, WritePayload};

/// Keys further than this below the newest applied key count as applied.
/// Retries finish long before this many newer writes are produced.
const APPLIED_WINDOW: u64 = 256;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store record is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// A challenge answer as recorded by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedChoice {
    pub seq: u64,
    pub index: usize,
    pub waypoint: String,
    pub choice: ChoiceEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedTransfer {
    pub seq: u64,
    pub to_team: String,
    pub amount: u64,
}

/// Everything stored for one team in one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    #[serde(default)]
    pub game_data: Option<GameData>,
    /// Sequence number of the write that produced `game_data`.
    #[serde(default)]
    pub game_data_seq: u64,
    #[serde(default)]
    pub choices: Vec<RecordedChoice>,
    #[serde(default)]
    pub transfers: Vec<RecordedTransfer>,
    /// Every key up to and including this one has been applied.
    #[serde(default)]
    pub applied_through: u64,
    /// Applied keys above `applied_through`, left by gaps in the sequence.
    #[serde(default)]
    pub applied_above: BTreeSet<u64>,
}

impl TeamRecord {
    /// Apply a write. Returns false if its key was already applied.
    pub fn apply(&mut self, write: &OutboundWrite) -> bool {
        let seq = write.key.seq;
        if seq <= self.applied_through || !self.applied_above.insert(seq) {
            return false;
        }
        self.compact();
        match &write.payload {
            WritePayload::GameData { data } => {
                if seq > self.game_data_seq {
                    self.game_data = Some((**data).clone());
                    self.game_data_seq = seq;
                }
            }
            WritePayload::Choice {
                index,
                waypoint,
                choice,
            } => self.choices.push(RecordedChoice {
                seq,
                index: *index,
                waypoint: waypoint.clone(),
                choice: choice.clone(),
            }),
            WritePayload::Transfer { to_team, amount } => {
                self.transfers.push(RecordedTransfer {
                    seq,
                    to_team: to_team.clone(),
                    amount: *amount,
                })
            }
        }
        true
    }

    /// Highest key applied so far.
    pub fn last_seq(&self) -> u64 {
        self.applied_above
            .iter()
            .next_back()
            .copied()
            .unwrap_or(self.applied_through)
    }

    /// Fold contiguous keys, and keys outside the window, into the watermark.
    fn compact(&mut self) {
        let floor = self.last_seq().saturating_sub(APPLIED_WINDOW);
        if floor > self.applied_through {
            self.applied_through = floor;
            self.applied_above.retain(|seq| *seq > floor);
        }
        while self.applied_above.remove(&(self.applied_through + 1)) {
            self.applied_through += 1;
        }
    }
}

/// Backend stand-in the writer delivers to.
pub trait GameStore: Send {
    /// The team's record, if one exists.
    fn record(&self, game_number: u32, team: &str) -> Result<Option<TeamRecord>, StoreError>;

    /// Apply one write. Re-applying a key is a successful no-op.
    fn apply(&mut self, write: &OutboundWrite) -> Result<(), StoreError>;

    /// The team's saved game data, if any.
    fn load_game(&self, game_number: u32, team: &str) -> Result<Option<GameData>, StoreError> {
        Ok(self
            .record(game_number, team)?
            .and_then(|record| record.game_data))
    }

    /// Last write key applied for the team, so new keys can continue after it.
    fn last_seq(&self, game_number: u32, team: &str) -> Result<u64, StoreError> {
        Ok(self
            .record(game_number, team)?
            .map(|record| record.last_seq())
            .unwrap_or(0))
    }
}

/// One pretty-printed JSON file per game and team under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, game_number: u32, team: &str) -> PathBuf {
        let slug: String = team
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("game-{game_number}-{slug}.json"))
    }
}

impl GameStore for JsonFileStore {
    fn record(&self, game_number: u32, team: &str) -> Result<Option<TeamRecord>, StoreError> {
        let path = self.record_path(game_number, team);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn apply(&mut self, write: &OutboundWrite) -> Result<(), StoreError> {
        let key = &write.key;
        let mut record = self.record(key.game_number, &key.team)?.unwrap_or_default();
        if !record.apply(write) {
            log::debug!("write {} already applied", key);
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(self.record_path(key.game_number, &key.team), json)?;
        Ok(())
    }
}

/// In-memory store with injectable failures, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<(u32, String), TeamRecord>,
    /// Number of upcoming `apply` calls that fail.
    failures: u32,
    attempts: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` applies fail.
    pub fn fail_next(&mut self, count: u32) {
        self.failures = count;
    }

    /// Number of `apply` calls so far, failed ones included.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn insert_game(&mut self, data: GameData) {
        let record = self
            .records
            .entry((data.game_number, data.team.clone()))
            .or_default();
        record.game_data = Some(data);
    }
}

impl GameStore for MemoryStore {
    fn record(&self, game_number: u32, team: &str) -> Result<Option<TeamRecord>, StoreError> {
        Ok(self.records.get(&(game_number, team.to_string())).cloned())
    }

    fn apply(&mut self, write: &OutboundWrite) -> Result<(), StoreError> {
        self.attempts += 1;
        if self.failures > 0 {
            self.failures -= 1;
            return Err(StoreError::Rejected("injected failure".to_string()));
        }
        let key = &write.key;
        self.records
            .entry((key.game_number, key.team.clone()))
            .or_default()
            .apply(write);
        Ok(())
    }
}
