// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph configuration, stored as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Settings a graph is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Format version
    pub version: u32,
    /// Graph name, used in logs
    pub name: String,
    /// Stop descending into a node already on the current propagation path.
    ///
    /// Disabling this lets a cyclic graph recurse without bound.
    pub cycle_guard: bool,
    /// Default log directive for hosts, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            name: "Untitled".to_string(),
            cycle_guard: true,
            log_filter: "tinygraph=info,tinygraph_engine=warn".to_string(),
        }
    }
}

impl GraphConfig {
    /// Parse configuration from a RON string
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: GraphConfig = ron::from_str(source)?;
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }
}

/// Error when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for this format
    #[error("Invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Configuration could not be written
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}
