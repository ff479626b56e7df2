//! ssh-config ports subcommand
//!
//! Prints the local ports claimed by managed entries, one per line, so
//! other tools can avoid them.

use anyhow::Result;
use wsctl_core::Config;

use crate::commands::context::{open_configurer, ssh_config_store};

pub fn cmd_ssh_config_ports(config: &Config, aliases: &[String]) -> Result<()> {
    let store = ssh_config_store(config)?;
    // Reading ports needs no workspace list
    let configurer = open_configurer(config, Vec::new(), &store)?;

    let ports = if aliases.is_empty() {
        configurer.get_managed_ports(configurer.managed_aliases().as_slice())
    } else {
        configurer.get_managed_ports(aliases)
    };

    for port in ports {
        println!("{port}");
    }
    Ok(())
}
