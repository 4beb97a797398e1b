// Fixture patch error types and constants

use crate::error::ErrorCode;
use std::fmt;

/// Patch error code constants
///
/// Error code range: 3001-3008
pub struct PatchErrorCodes {}

impl PatchErrorCodes {
    /// Fixture file could not be read or written
    pub const IO: i32 = 3001;

    /// Fixture document is not valid JSON
    pub const JSON: i32 = 3002;

    /// `account.data[0]` is absent or not a string
    pub const MISSING_FIELD: i32 = 3003;

    /// Account data is not valid base64
    pub const BASE64: i32 = 3004;

    /// Account data is tagged with an encoding other than base64
    pub const UNSUPPORTED_ENCODING: i32 = 3005;

    /// Address string is not valid base58
    pub const BASE58: i32 = 3006;

    /// Address did not decode to exactly 32 bytes
    pub const ADDRESS_LENGTH: i32 = 3007;

    /// Account data is too short for the patch offset
    pub const OUT_OF_RANGE: i32 = 3008;
}

/// Fixture patch errors
///
/// Every variant is fatal: the patcher never retries or recovers.
///
/// Error code ranges: 3001-3008
#[derive(Debug, Clone, PartialEq)]
pub enum PatchError {
    /// Fixture file could not be read or written
    Io { path: String, reason: String },

    /// Fixture document is not valid JSON
    Json { reason: String },

    /// Required field is absent or has the wrong type
    MissingField { field: String },

    /// Account data is not valid base64
    Base64 { reason: String },

    /// Account data is tagged with a non-base64 encoding
    UnsupportedEncoding { encoding: String },

    /// Address string is not valid base58
    Base58 { reason: String },

    /// Address decoded to the wrong number of bytes
    AddressLength { len: usize },

    /// Buffer is too short to hold 32 bytes at `offset`
    OutOfRange { offset: usize, len: usize },
}

impl ErrorCode for PatchError {
    fn code(&self) -> i32 {
        match self {
            PatchError::Io { .. } => PatchErrorCodes::IO,
            PatchError::Json { .. } => PatchErrorCodes::JSON,
            PatchError::MissingField { .. } => PatchErrorCodes::MISSING_FIELD,
            PatchError::Base64 { .. } => PatchErrorCodes::BASE64,
            PatchError::UnsupportedEncoding { .. } => PatchErrorCodes::UNSUPPORTED_ENCODING,
            PatchError::Base58 { .. } => PatchErrorCodes::BASE58,
            PatchError::AddressLength { .. } => PatchErrorCodes::ADDRESS_LENGTH,
            PatchError::OutOfRange { .. } => PatchErrorCodes::OUT_OF_RANGE,
        }
    }

    fn message(&self) -> String {
        match self {
            PatchError::Io { path, reason } => format!("I/O error on {}: {}", path, reason),
            PatchError::Json { reason } => format!("Malformed JSON: {}", reason),
            PatchError::MissingField { field } => format!("Missing field: {}", field),
            PatchError::Base64 { reason } => format!("Invalid base64 account data: {}", reason),
            PatchError::UnsupportedEncoding { encoding } => {
                format!("Unsupported account data encoding: {}", encoding)
            }
            PatchError::Base58 { reason } => format!("Invalid base58 address: {}", reason),
            PatchError::AddressLength { len } => {
                format!("Address must decode to 32 bytes, got {}", len)
            }
            PatchError::OutOfRange { offset, len } => format!(
                "Cannot write 32 bytes at offset {} into buffer of {} bytes",
                offset, len
            ),
        }
    }
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatchError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for PatchError {}
