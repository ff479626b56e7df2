//! wsctl-core - Core library for wsctl
//!
//! Shared functionality behind the `wsctl` CLI: keeping `~/.ssh/config`
//! in sync with remote workspaces, the workspace model, and tool config.

pub mod config;
pub mod keys;
pub mod sshconfig;
pub mod version;
pub mod workspace;

// Re-export version functions for Rust consumers
pub use version::{get_version, get_version_long};

// Re-export config types and functions
pub use config::{Config, load_config, load_config_from, save_config, save_config_to};

// Re-export the SSH config surface
pub use sshconfig::{
    FileSshConfigStore, HostClassifier, MemorySshConfigStore, SshConfigError, SshConfigStore,
    SshConfigurer, SyncReport,
};

// Re-export workspace types
pub use workspace::{ActiveOrganization, Workspace, WorkspaceError, WorkspaceStatus};
