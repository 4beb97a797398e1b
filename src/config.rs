//! Configuration for the fixture patcher
//!
//! The defaults reproduce the stock USDC patch: read and rewrite
//! `tests/genesis/usdc.json`, writing the default address at offset 4.
//! A JSON config file can point the patcher at other fixtures without
//! recompiling; CLI flags override whatever the file provides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::address::DEFAULT_ADDRESS;
use crate::error::PatchError;
use crate::fixture::DEFAULT_FIXTURE_PATH;
use crate::patch::DEFAULT_OFFSET;

/// Complete patch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Fixture to read
    pub input: PathBuf,
    /// Destination path; the input is rewritten in place when unset
    pub output: Option<PathBuf>,
    /// Base58 address to write into the account data
    pub address: String,
    /// Byte offset of the 32-byte address field
    pub offset: usize,
    /// Skip writing the patched fixture
    pub dry_run: bool,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_FIXTURE_PATH),
            output: None,
            address: DEFAULT_ADDRESS.to_string(),
            offset: DEFAULT_OFFSET,
            dry_run: false,
        }
    }
}

impl PatchConfig {
    /// Load configuration from a JSON file
    ///
    /// Missing fields take their defaults and unknown fields are ignored.
    /// An unreadable file or invalid JSON is an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PatchError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| PatchError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let config = serde_json::from_str(&contents).map_err(|err| PatchError::Json {
            reason: format!("config {}: {}", path.display(), err),
        })?;
        log::info!("[Config] Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Path the patched fixture is written to.
    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}
