use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tuning knobs for the history coordination protocol.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HistoryConfig {
    /// Upper bound on a coordination round, in milliseconds.
    ///
    /// `None` removes the bound, so one unacknowledged participant can
    /// stall undo/redo forever. The default bounds every round.
    pub round_timeout_ms: Option<u64>,
    /// Capacity of each tracker's command channel.
    pub channel_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            round_timeout_ms: Some(30_000),
            channel_capacity: 32,
        }
    }
}

impl HistoryConfig {
    /// Round timeout as a `Duration`, if bounded.
    pub fn round_timeout(&self) -> Option<Duration> {
        self.round_timeout_ms.map(Duration::from_millis)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}
