//! Store configuration for trackport
//!
//! Configuration is stored in `.trackport/config.toml`. Every field has a
//! default, so a missing or partial file is valid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackportError};
use crate::export::EXPORT_VERSION;
use crate::import::ImportMode;

/// Current store format version
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store format version
    pub version: u32,

    /// Version string written into export documents
    pub export_version: String,

    /// Import mode used when the CLI is not given `--mode`
    pub default_mode: ImportMode,

    /// Record a hash checkpoint after every export
    pub checkpoint_on_export: bool,

    /// Pretty-print exported JSON
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            version: STORE_FORMAT_VERSION,
            export_version: EXPORT_VERSION.to_string(),
            default_mode: ImportMode::Merge,
            checkpoint_on_export: true,
            pretty: true,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;

        if config.version > STORE_FORMAT_VERSION {
            return Err(TrackportError::InvalidStore {
                reason: format!(
                    "store version {} is newer than supported version {} - please upgrade trackport",
                    config.version, STORE_FORMAT_VERSION
                ),
            });
        }

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TrackportError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
