//! Config subcommand implementations
//!
//! Provides `wsctl config` subcommands for viewing and changing the tool
//! configuration.

mod get;
mod set;
mod show;

use anyhow::Result;
use clap::{Args, Subcommand};
use wsctl_core::Config;

pub use get::cmd_config_get;
pub use set::cmd_config_set;
pub use show::cmd_config_show;

/// Keys accepted by `config get` and `config set`
const VALID_KEYS: &str = "Valid keys:\n  \
    ssh_config_path\n  \
    private_key_path / key\n  \
    ssh_user / user\n  \
    port_base\n  \
    api_url\n  \
    fetch_timeout_secs / timeout\n  \
    prune";

/// Configuration command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

/// Configuration management subcommands
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show current configuration
    Show {
        /// Output as JSON instead of table format
        #[arg(long)]
        json: bool,
    },
    /// Get a single configuration value
    Get {
        /// Configuration key (e.g., "ssh_user", "port_base")
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set ("none" clears optional paths and URLs)
        value: String,
    },
}

/// Handle config command
///
/// Defaults to Show when no subcommand is given.
pub fn cmd_config(args: ConfigArgs, config: &Config, quiet: bool) -> Result<()> {
    match args.command {
        Some(ConfigSubcommands::Show { json }) => cmd_config_show(config, json),
        Some(ConfigSubcommands::Get { key }) => cmd_config_get(config, &key),
        Some(ConfigSubcommands::Set { key, value }) => cmd_config_set(&key, &value, quiet),
        None => cmd_config_show(config, args.json),
    }
}
