//! closers-sync - patch synchronization for the CLOSERS game client
//!
//! This library keeps a local CLOSERS install in step with the live patch
//! server. It drives the native launcher until the client has written its
//! encoded file manifests, decodes them, checks every listed file by CRC32
//! and downloads whatever is missing or stale.

pub mod checksum;
pub mod config;
pub mod diff;
pub mod download;
pub mod error;
pub mod extract;
pub mod http;
pub mod install;
pub mod logging;
pub mod manifest;
mod pool;
pub mod process;
pub mod sync;
pub mod urls;
pub mod version;

pub use config::{ConfigFile, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use sync::{SyncOrchestrator, SyncOutcome, SyncReport};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
