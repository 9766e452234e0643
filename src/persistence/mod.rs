//! Save/load persistence
//!
//! The core never touches storage itself. It produces a versioned JSON
//! envelope that the host writes wherever it likes (LocalStorage, a file)
//! and hands back on the next session.

use serde::{Deserialize, Serialize};

use crate::SimError;
use crate::highscores::HighScores;
use crate::sim::RunSummary;
use crate::tuning::DifficultyPreset;

/// Bumped whenever `SaveData` changes shape incompatibly
pub const SAVE_VERSION: u32 = 1;

/// Versioned wrapper around the payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub data: SaveData,
}

/// Everything that outlives a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub high_scores: HighScores,
    pub preset: DifficultyPreset,
    pub runs_played: u32,
    pub total_distance: f64,
}

impl SaveData {
    /// Best score to seed a new session's display with
    pub fn high_score(&self) -> u64 {
        self.high_scores.top_score().unwrap_or(0)
    }

    /// Fold a finished run in. Returns the leaderboard rank, if any.
    pub fn record_run(&mut self, summary: &RunSummary, timestamp: f64) -> Option<usize> {
        self.runs_played += 1;
        self.total_distance += f64::from(summary.distance_traveled.max(0.0));
        self.high_scores.add_run(summary, timestamp)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        let envelope = SaveEnvelope {
            version: SAVE_VERSION,
            data: self.clone(),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let envelope: SaveEnvelope = serde_json::from_str(json)?;
        if envelope.version != SAVE_VERSION {
            return Err(SimError::UnsupportedVersion {
                found: envelope.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(envelope.data)
    }

    /// Decode, falling back to a fresh save on any problem
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("No save found, starting fresh");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(data) => {
                log::info!("Loaded save ({} runs)", data.runs_played);
                data
            }
            Err(e) => {
                log::warn!("Discarding unreadable save: {}", e);
                Self::default()
            }
        }
    }
}

/// Host-owned key/value storage
pub trait SaveStore {
    fn read(&self) -> Option<String>;
    fn write(&mut self, json: &str) -> Result<(), SimError>;
}

/// In-memory store for the native demo and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Option<String>,
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.contents.clone()
    }

    fn write(&mut self, json: &str) -> Result<(), SimError> {
        self.contents = Some(json.to_string());
        Ok(())
    }
}

/// Load from a store
pub fn load<S: SaveStore + ?Sized>(store: &S) -> SaveData {
    SaveData::load_or_default(store.read().as_deref())
}

/// Encode and write to a store
pub fn save<S: SaveStore + ?Sized>(store: &mut S, data: &SaveData) -> Result<(), SimError> {
    store.write(&data.to_json()?)
}
