//! Filesystem data directory operations.
//!
//! Layout under the data directory:
//! - `roster.json`: array of tracked accounts
//! - `matches/<profile_id>.jsonl`: one match record per line, newest first

mod jsonl;
mod matches;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ProfileId;

pub use jsonl::{JsonlReader, JsonlWriter};
pub use matches::MatchStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn roster_path(&self) -> PathBuf {
        self.data_dir.join("roster.json")
    }

    pub fn matches_dir(&self) -> PathBuf {
        self.data_dir.join("matches")
    }

    pub fn matches_path(&self, profile_id: ProfileId) -> PathBuf {
        self.matches_dir().join(format!("{}.jsonl", profile_id))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
