//! Logger configuration
//!
//! Loaded from JSON, with every field optional:
//!
//! ```json
//! { "scratch_capacity": 512, "min_free_memory": 400, "root_dir": "/data" }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::header::MAX_TEXT_HEADER_LEN;
use crate::record::MAX_RECORD_SIZE;

/// Default scratch buffer size in bytes
pub const DEFAULT_SCRATCH_CAPACITY: usize = 512;

/// Default free-memory threshold checked before touching storage
pub const DEFAULT_MIN_FREE_MEMORY: usize = 400;

/// Default directory that receives log files
pub const DEFAULT_ROOT_DIR: &str = "/data";

/// Settings for a [`DataLogger`](crate::logger::DataLogger)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Size of the shared scratch buffer
    pub scratch_capacity: usize,
    /// Minimum free memory required before storage is initialized
    pub min_free_memory: usize,
    /// Directory that receives log files
    pub root_dir: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            min_free_memory: DEFAULT_MIN_FREE_MEMORY,
            root_dir: DEFAULT_ROOT_DIR.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Check that the settings can hold every record this crate writes
    pub fn validate(&self) -> Result<(), ConfigError> {
        // One byte of the scratch buffer is reserved for a terminator.
        let needed = MAX_RECORD_SIZE.max(MAX_TEXT_HEADER_LEN) + 1;
        if self.scratch_capacity < needed {
            return Err(ConfigError::Invalid(format!(
                "scratch_capacity must be at least {} bytes, got {}",
                needed, self.scratch_capacity
            )));
        }

        if !self.root_dir.starts_with('/') || self.root_dir.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "root_dir must be an absolute directory, got '{}'",
                self.root_dir
            )));
        }

        if self.root_dir.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "root_dir must not end with '/', got '{}'",
                self.root_dir
            )));
        }

        Ok(())
    }
}
