//! Configuration structures for RecDB.

use crate::error::{RecDbError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound accepted for `initial_capacity`.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Configuration for a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Number of record slots and index nodes reserved up front.
    pub initial_capacity: usize,
    /// Wipe key, name, and birth date when a record is tombstoned.
    pub clear_tombstoned_payload: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            clear_tombstoned_payload: true,
        }
    }
}

impl TableConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TableConfig =
            serde_json::from_str(json).map_err(|e| RecDbError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks that all parameters are within accepted bounds.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(RecDbError::InvalidParameter {
                name: "initial_capacity".to_string(),
                value: self.initial_capacity.to_string(),
            });
        }
        Ok(())
    }
}
