// Genesis Patcher - account fixture rewriting for local validator genesis
// Replaces the 32-byte address field of a dumped account with a local key

// Module declarations
pub mod address;
pub mod config;
pub mod error;
pub mod fixture;
pub mod patch;

// Re-exports for convenience
pub use address::{Address, DEFAULT_ADDRESS};
pub use config::PatchConfig;
pub use error::{ErrorCode, PatchError};
pub use fixture::AccountFixture;
pub use patch::{patch_bytes, run, AccountPatch, PatchReport};

use tracing::Level;

/// Initialize stderr logging
///
/// `verbosity` counts `-v` flags: 0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE.
/// `log` records from library code are forwarded through the subscriber's
/// log bridge. Calling this more than once is a no-op.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
