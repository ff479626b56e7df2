//! Configuration schema for wsctl
//!
//! Defines the structure and defaults for the config.json file.

use serde::{Deserialize, Serialize};

use crate::sshconfig::{DEFAULT_PORT_BASE, DEFAULT_SSH_USER};

/// Main configuration structure for wsctl
///
/// Serialized to/from `~/.config/wsctl/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// SSH client config to manage (default: ~/.ssh/config)
    #[serde(default)]
    pub ssh_config_path: Option<String>,

    /// Private key that marks managed entries (default: ~/.config/wsctl/wsctl.pem)
    #[serde(default)]
    pub private_key_path: Option<String>,

    /// Login user written into managed entries (default: "ubuntu")
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,

    /// First local port handed out to a workspace (default: 2222)
    #[serde(default = "default_port_base")]
    pub port_base: u16,

    /// Base URL of the workspace service (default: None, use cached list)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Seconds to wait for the workspace service (default: 10)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Remove entries of deleted workspaces on sync (default: true)
    #[serde(default = "default_prune")]
    pub prune: bool,
}

fn default_ssh_user() -> String {
    DEFAULT_SSH_USER.to_string()
}

fn default_port_base() -> u16 {
    DEFAULT_PORT_BASE
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_prune() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            ssh_config_path: None,
            private_key_path: None,
            ssh_user: default_ssh_user(),
            port_base: default_port_base(),
            api_url: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            prune: default_prune(),
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether workspaces are fetched live rather than read from the cache
    pub fn has_api(&self) -> bool {
        self.api_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}
