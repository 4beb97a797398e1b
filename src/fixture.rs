//! Account fixture documents.
//!
//! A fixture is the JSON dump of a single on-chain account, in the shape
//! produced by `solana account --output json`:
//!
//! ```json
//! {
//!   "pubkey": "...",
//!   "account": {
//!     "lamports": 1461600,
//!     "data": ["<base64 account data>", "base64"],
//!     "owner": "...",
//!     "executable": false,
//!     "rentEpoch": 0,
//!     "space": 82
//!   }
//! }
//! ```
//!
//! Only `account.data[0]` is ever rewritten; every other value is carried
//! through untouched and key order is preserved on output.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::PatchError;

/// Default fixture path, relative to the working directory.
pub const DEFAULT_FIXTURE_PATH: &str = "tests/genesis/usdc.json";

/// Encoding tag expected in `account.data[1]`.
pub const BASE64_ENCODING: &str = "base64";

const DATA_POINTER: &str = "/account/data";
const DATA_FIELD: &str = "account.data";
const PAYLOAD_FIELD: &str = "account.data[0]";

/// Parsed fixture document.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountFixture {
    document: Value,
}

impl AccountFixture {
    /// Read and parse a fixture from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PatchError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| io_error(path, err))?;
        let fixture = Self::from_json(&contents)?;
        log::debug!("[Fixture] Loaded {}", path.display());
        Ok(fixture)
    }

    /// Parse fixture contents from JSON.
    pub fn from_json(data: &str) -> Result<Self, PatchError> {
        let document = serde_json::from_str(data).map_err(|err| PatchError::Json {
            reason: err.to_string(),
        })?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Encoding tag stored next to the payload, if any.
    pub fn encoding(&self) -> Option<&str> {
        self.data_entries().ok()?.get(1)?.as_str()
    }

    /// Decode `account.data[0]` into raw account bytes.
    pub fn account_data(&self) -> Result<Vec<u8>, PatchError> {
        if let Some(encoding) = self.encoding() {
            if encoding != BASE64_ENCODING {
                return Err(PatchError::UnsupportedEncoding {
                    encoding: encoding.to_string(),
                });
            }
        }

        let payload = self
            .data_entries()?
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| missing(PAYLOAD_FIELD))?;

        base64::decode(payload).map_err(|err| PatchError::Base64 {
            reason: err.to_string(),
        })
    }

    /// Replace `account.data[0]` with the base64 encoding of `bytes`.
    pub fn set_account_data(&mut self, bytes: &[u8]) -> Result<(), PatchError> {
        let slot = self
            .document
            .pointer_mut(DATA_POINTER)
            .and_then(Value::as_array_mut)
            .and_then(|entries| entries.first_mut())
            .filter(|entry| entry.is_string())
            .ok_or_else(|| missing(PAYLOAD_FIELD))?;
        *slot = Value::String(base64::encode(bytes));
        Ok(())
    }

    /// Serialize with 2-space indentation.
    pub fn to_json(&self) -> Result<String, PatchError> {
        serde_json::to_string_pretty(&self.document).map_err(|err| PatchError::Json {
            reason: err.to_string(),
        })
    }

    /// Write the document to `path`, replacing any previous content.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PatchError> {
        let path = path.as_ref();
        let json = self.to_json()?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| io_error(parent, err))?;
        }
        fs::write(path, json).map_err(|err| io_error(path, err))?;
        log::debug!("[Fixture] Wrote {}", path.display());
        Ok(())
    }

    fn data_entries(&self) -> Result<&Vec<Value>, PatchError> {
        self.document
            .pointer(DATA_POINTER)
            .and_then(Value::as_array)
            .ok_or_else(|| missing(DATA_FIELD))
    }
}

fn missing(field: &str) -> PatchError {
    PatchError::MissingField {
        field: field.to_string(),
    }
}

fn io_error(path: &Path, err: std::io::Error) -> PatchError {
    PatchError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
