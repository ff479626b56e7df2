//! ssh-config port subcommand
//!
//! Prints the local port of one workspace's managed entry.

use anyhow::{Result, bail};
use console::style;
use wsctl_core::Config;
use wsctl_core::sshconfig::SshConfigError;
use wsctl_core::workspace::find_workspace;

use crate::commands::context::{load_workspaces, open_configurer, ssh_config_store};

pub async fn cmd_ssh_config_port(config: &Config, workspace: &str, quiet: bool) -> Result<()> {
    let loaded = load_workspaces(config, quiet).await?;
    let target = find_workspace(&loaded.workspaces, workspace)?.clone();

    let store = ssh_config_store(config)?;
    let configurer = open_configurer(config, loaded.workspaces, &store)?;

    match configurer.get_configured_workspace_port(&target) {
        Ok(port) => {
            println!("{port}");
            Ok(())
        }
        Err(SshConfigError::NotConfigured(alias)) => bail!(
            "No SSH entry for '{}' in {}\n\nCreate it with: {}",
            alias,
            store.path().display(),
            style("wsctl ssh-config sync").cyan()
        ),
        Err(e) => Err(e.into()),
    }
}
