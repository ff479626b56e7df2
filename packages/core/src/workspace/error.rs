//! Workspace errors

use thiserror::Error;

/// Errors that can occur while loading or looking up workspaces
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Failed to read a local workspace file
    #[error("Failed to load {0}")]
    LoadFailed(String),

    /// Failed to write a local workspace file
    #[error("Failed to save {0}")]
    SaveFailed(String),

    /// HTTP request to the workspace service failed
    #[error("Workspace service request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Workspace service answered with a non-success status
    #[error("Workspace service returned HTTP {0}")]
    ServiceStatus(u16),

    /// No workspace with that name or id
    #[error("Workspace not found: {0}")]
    NotFound(String),

    /// More than one workspace has that name
    #[error("Workspace name '{0}' is ambiguous, use the workspace id instead")]
    Ambiguous(String),

    /// Workspace exists but is not running
    #[error("Workspace '{name}' is {status}, it must be RUNNING")]
    NotRunning { name: String, status: String },
}
