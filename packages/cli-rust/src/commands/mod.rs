//! CLI command implementations
//!
//! Workspace listing, SSH config sync, notebook port forwarding and tool
//! configuration.

mod config;
mod context;
mod ls;
mod notebook;
mod ssh_config;

pub use config::{ConfigArgs, cmd_config};
pub use ls::{LsArgs, cmd_ls};
pub use notebook::{NotebookArgs, cmd_notebook};
pub use ssh_config::{SshConfigArgs, cmd_ssh_config};
