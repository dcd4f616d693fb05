//! Diff configuration.
//!
//! Loaded from an optional TOML file by the CLI:
//!
//! ```toml
//! context_lines = 2
//! strip_tags = true
//! ```

use crate::errors::{HistoryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text diff tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffOptions {
    /// Unchanged lines kept around each change
    pub context_lines: usize,
    /// Replace every markup tag with a space before diffing
    pub strip_tags: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: 1,
            strip_tags: false,
        }
    }
}

impl DiffOptions {
    /// Parse options from TOML text; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the text is not valid TOML or names an unknown key.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| HistoryError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, `InvalidConfig` when it cannot be parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
