// Error types for the genesis fixture patcher
//
// This module defines the error taxonomy for loading, patching, and writing
// account fixtures, with numeric codes so the CLI can report failures in a
// structured way.

mod patch;

pub use patch::{PatchError, PatchErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
