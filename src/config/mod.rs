//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::models::{Granularity, LADDER_RM_1V1};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Report defaults for the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Ladder used when a command does not name one
    #[serde(default = "default_ladder")]
    pub default_ladder: String,

    /// How far back the timeline reaches, in days
    #[serde(default = "default_timeline_days")]
    pub timeline_days: u32,

    #[serde(default = "default_granularity")]
    pub timeline_granularity: Granularity,
}

fn default_ladder() -> String {
    LADDER_RM_1V1.to_string()
}

fn default_timeline_days() -> u32 {
    90
}

fn default_granularity() -> Granularity {
    Granularity::Day
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_ladder: default_ladder(),
            timeline_days: default_timeline_days(),
            timeline_granularity: default_granularity(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub tracker: TrackerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker.default_ladder.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Default ladder must not be empty".to_string(),
            ));
        }

        if self.tracker.timeline_days == 0 {
            return Err(ConfigError::ValidationError(
                "Timeline days must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
