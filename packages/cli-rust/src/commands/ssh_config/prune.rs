//! ssh-config prune subcommand
//!
//! Removes managed entries of workspaces that no longer exist.

use anyhow::{Result, bail};
use console::style;
use dialoguer::Confirm;
use wsctl_core::Config;
use wsctl_core::sshconfig::{MemorySshConfigStore, SshConfigStore};

use super::print_report;
use crate::commands::context::{load_workspaces, open_configurer, ssh_config_store};

pub async fn cmd_ssh_config_prune(
    config: &Config,
    dry_run: bool,
    yes: bool,
    quiet: bool,
) -> Result<()> {
    let loaded = load_workspaces(config, quiet).await?;
    if !loaded.can_prune() {
        bail!(
            "No workspace list has been fetched yet, refusing to prune\n\nSet the workspace service with: {}",
            style("wsctl config set api_url <url>").cyan()
        );
    }
    let store = ssh_config_store(config)?;

    // Work out what would go before touching the real file
    let preview = MemorySshConfigStore::new(store.read_ssh_config()?);
    let planned = open_configurer(config, loaded.workspaces.clone(), &preview)?
        .prune_inactive_workspaces()?;

    if planned.pruned.is_empty() {
        if !quiet {
            println!("No stale entries in {}.", store.path().display());
        }
        return Ok(());
    }

    print_report(&planned);

    if dry_run {
        println!(
            "{} would remove {} entries",
            style("Dry run:").cyan(),
            planned.pruned.len()
        );
        return Ok(());
    }

    if !yes {
        let confirm = Confirm::new()
            .with_prompt(format!(
                "Remove {} entries from {}?",
                planned.pruned.len(),
                store.path().display()
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirm {
            if !quiet {
                println!("Cancelled.");
            }
            return Ok(());
        }
    }

    let report = open_configurer(config, loaded.workspaces, &store)?.prune_inactive_workspaces()?;

    if !quiet {
        println!(
            "{} Removed {} entries from {}",
            style("Success:").green().bold(),
            report.pruned.len(),
            store.path().display()
        );
    }

    Ok(())
}
