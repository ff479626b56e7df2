//! SSH config synchronization
//!
//! Keeps `~/.ssh/config` in line with the user's workspaces:
//! - Text model that round-trips hand-edited configs
//! - Classification of wsctl-managed vs. hand-written entries
//! - Stable local port allocation
//! - Reconciliation and atomic persistence

mod classifier;
mod configurer;
mod document;
mod entry;
mod error;
mod ports;
mod store;

// Public exports
pub use classifier::{HostClassifier, IdentityFileClassifier, is_active_host, is_managed_host};
pub use configurer::{DEFAULT_SSH_USER, SshConfigurer, SyncReport};
pub use document::{ConfigDocument, HostBlock, hostname_from_str, split_directive};
pub use entry::{ManagedEntrySpec, build_entry, create_config_entry};
pub use error::SshConfigError;
pub use ports::{DEFAULT_PORT_BASE, allocate_port, parse_port};
pub use store::{FileSshConfigStore, MemorySshConfigStore, SshConfigStore};
