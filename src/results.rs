//! Session results and the local leaderboard
//!
//! When a shift ends the report goes to a [`ResultRecorder`]. The game never
//! waits on it and never lets a failure reach the simulation: the result
//! screen just shows whether the save went through.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::sim::state::ScoreReport;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// Errors from a result recorder
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence collaborator for finished shifts
pub trait ResultRecorder {
    fn record(&mut self, report: &ScoreReport) -> Result<(), RecordError>;
}

/// What the result screen shows about the save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Saved,
    Failed,
}

/// Record a report, downgrading any failure to a status and a warning
pub fn record_best_effort(recorder: &mut dyn ResultRecorder, report: &ScoreReport) -> RecordStatus {
    match recorder.record(report) {
        Ok(()) => RecordStatus::Saved,
        Err(e) => {
            log::warn!("Could not record result (score {}): {}", report.score, e);
            RecordStatus::Failed
        }
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Vault total
    pub score: u64,
    pub deliveries: u32,
    /// The shift ended on a line overflow
    pub failed: bool,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Top scores, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "pizza_dash_leaderboard";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a report (if it qualifies) and return the rank achieved
    pub fn add(&mut self, report: &ScoreReport, timestamp: f64) -> Option<usize> {
        if !self.qualifies(report.score) {
            return None;
        }
        let entry = LeaderboardEntry {
            score: report.score,
            deliveries: report.deliveries,
            failed: report.failed,
            timestamp,
        };

        // Sorted descending; equal scores keep arrival order
        let rank = match self.entries.iter().position(|e| report.score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = local_storage()
            .ok()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        if let Some(json) = stored {
            match serde_json::from_str::<Leaderboard>(&json) {
                Ok(board) => {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    return board;
                }
                Err(e) => log::warn!("Discarding unreadable leaderboard: {}", e),
            }
        }
        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), RecordError> {
        let json = serde_json::to_string(self)?;
        local_storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| RecordError::Storage(format!("{e:?}")))?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native builds keep the board in memory for the life of the process
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), RecordError> {
        log::debug!("Leaderboard kept in memory ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ResultRecorder for Leaderboard {
    fn record(&mut self, report: &ScoreReport) -> Result<(), RecordError> {
        if let Some(rank) = self.add(report, now_timestamp()) {
            log::info!("New leaderboard entry #{} (${})", rank, report.score);
        }
        self.save()
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, RecordError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(RecordError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
fn now_timestamp() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
