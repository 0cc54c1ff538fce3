//! High score persistence.
//!
//! The table is append-only: records are inserted with an auto-incrementing
//! id and never updated or deleted. `JsonLinesStore` keeps one JSON record
//! per line in a file under the platform data directory.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use directories::ProjectDirs;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::compute::{session_ended, tick};
use crate::config::GameConfig;
use crate::entities::{GameState, HighScoreRecord};
use crate::error::StoreError;

const SCORES_FILE: &str = "high_scores.jsonl";

pub trait ScoreStore {
    /// Highest score recorded so far, 0 for an empty table.
    fn best(&self) -> u32;

    /// Insert a new row and return it with its assigned id.
    fn append(&mut self, score: u32, date: &str) -> Result<HighScoreRecord, StoreError>;

    fn records(&self) -> &[HighScoreRecord];
}

/// Platform data directory for this game, created if missing.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dirs = ProjectDirs::from("", "", "flappy_term").ok_or(StoreError::NoDataDir)?;
    let dir = dirs.data_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn default_scores_path() -> Result<PathBuf, StoreError> {
    Ok(data_dir()?.join(SCORES_FILE))
}

/// Current UTC time in the table's text format.
pub fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// Append-only JSON Lines table. The file handle is held for the lifetime
/// of the store and synced on `close` or drop.
pub struct JsonLinesStore {
    path: PathBuf,
    file: Option<File>,
    records: Vec<HighScoreRecord>,
    /// Set when the file ends mid-line; the next append starts a new one.
    needs_newline: bool,
}

impl JsonLinesStore {
    /// Open the table at `path`, creating the file and its parent directory
    /// if absent. Existing rows are read eagerly; a malformed row fails the
    /// open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let mut text = String::new();
        file.read_to_string(&mut text)?;
        // An interrupted write can leave the last row unterminated.
        let needs_newline = !text.is_empty() && !text.ends_with('\n');

        let mut records = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: HighScoreRecord =
                serde_json::from_str(line).map_err(|e| StoreError::Corrupt {
                    path: path.to_path_buf(),
                    line: i + 1,
                    reason: e.to_string(),
                })?;
            records.push(record);
        }

        info!(path = %path.display(), rows = records.len(), "score table opened");
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            records,
            needs_newline,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and release the file handle, reporting any error.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), StoreError> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
            info!(path = %self.path.display(), "score table closed");
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }
}

impl ScoreStore for JsonLinesStore {
    fn best(&self) -> u32 {
        self.records.iter().map(|r| r.score).max().unwrap_or(0)
    }

    fn append(&mut self, score: u32, date: &str) -> Result<HighScoreRecord, StoreError> {
        let record = HighScoreRecord {
            id: self.next_id(),
            score,
            date: date.to_string(),
        };
        let file = self.file.as_mut().ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "score table already closed",
            ))
        })?;
        let mut line = String::new();
        if self.needs_newline {
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(&record)?);
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.flush()?;
        self.needs_newline = false;
        debug!(id = record.id, score, "score row appended");
        self.records.push(record.clone());
        Ok(record)
    }

    fn records(&self) -> &[HighScoreRecord] {
        &self.records
    }
}

impl Drop for JsonLinesStore {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(error = %e, "failed to close score table");
        }
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Volatile table, used when no file should be touched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<HighScoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn best(&self) -> u32 {
        self.records.iter().map(|r| r.score).max().unwrap_or(0)
    }

    fn append(&mut self, score: u32, date: &str) -> Result<HighScoreRecord, StoreError> {
        let record = HighScoreRecord {
            id: self.records.len() as u64 + 1,
            score,
            date: date.to_string(),
        };
        self.records.push(record.clone());
        Ok(record)
    }

    fn records(&self) -> &[HighScoreRecord] {
        &self.records
    }
}

// ── Session settlement ────────────────────────────────────────────────────────

/// Settle a finished session: if its score strictly beats the high score,
/// raise the in-memory maximum and append one row stamped with `date`.
pub fn record_session<S: ScoreStore>(
    state: &GameState,
    store: &mut S,
    date: &str,
) -> Result<GameState, StoreError> {
    let score = state.display_score();
    info!(
        score,
        high_score = state.high_score,
        frame = state.frame,
        "session ended"
    );
    if score <= state.high_score {
        return Ok(GameState {
            new_best: false,
            ..state.clone()
        });
    }
    let record = store.append(score, date)?;
    info!(id = record.id, score, "new high score");
    Ok(GameState {
        high_score: score,
        new_best: true,
        ..state.clone()
    })
}

/// One frame of play: `tick`, then settle the session against `store` on
/// the frame it ends. Later frames of a finished session append nothing.
pub fn advance<S: ScoreStore, R: Rng>(
    state: &GameState,
    config: &GameConfig,
    now_ms: u64,
    rng: &mut R,
    store: &mut S,
    date: &str,
) -> Result<GameState, StoreError> {
    let next = tick(state, config, now_ms, rng);
    if session_ended(state, &next) {
        record_session(&next, store, date)
    } else {
        Ok(next)
    }
}
