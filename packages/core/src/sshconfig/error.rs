//! SSH config synchronization errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, reconciling or writing the SSH config
#[derive(Error, Debug)]
pub enum SshConfigError {
    /// A stanza has no alias where one is required
    #[error("Host stanza has no alias: {0}")]
    ParseAmbiguous(String),

    /// Workspace has no managed block (never synced, or pruned)
    #[error("Workspace '{0}' is not configured in the SSH config. Run: wsctl ssh-config sync")]
    NotConfigured(String),

    /// Failed to read the SSH config file
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the SSH config file (the old file is left in place)
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The managed key path could not be made absolute
    #[error("Could not resolve private key path '{path}': {reason}")]
    KeyPathUnresolved { path: String, reason: String },

    /// No free local port left at or above the base
    #[error("No free local port at or above {base}")]
    PortsExhausted { base: u16 },
}

impl SshConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }
}
