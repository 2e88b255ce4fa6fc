//! Error types for the patch synchronization engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while synchronizing an install.
///
/// Most of these are swallowed at file level and only surface when they
/// break a whole sync cycle (version fetch, missing executables, process
/// failures).
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP transport failure or unexpected status.
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// A version descriptor or manifest could not be understood.
    #[error("malformed {source_name}: {reason}")]
    ManifestFormat { source_name: String, reason: String },

    /// Failed to read or write something in the install tree.
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// A bootstrap archive is corrupt or could not be unpacked.
    #[error("archive {} failed: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    /// A required executable is missing or a process misbehaved.
    #[error("process {program} failed: {reason}")]
    Process { program: String, reason: String },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ManifestFormat {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn network(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_display() {
        let err = SyncError::network("http://host/VER.DLL", "connection refused");
        assert_eq!(
            err.to_string(),
            "request to http://host/VER.DLL failed: connection refused"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let err = SyncError::io(
            "/install/DATA/a.pak",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/install/DATA/a.pak"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_manifest_format_display() {
        let err = SyncError::format("VER.DLL", "missing key MVer");
        assert!(err.to_string().contains("malformed VER.DLL"));
        assert!(err.to_string().contains("MVer"));
    }
}
