//! ssh-config sync subcommand
//!
//! Reconciles the SSH config with the workspace list.

use anyhow::Result;
use console::style;
use wsctl_core::sshconfig::{MemorySshConfigStore, SshConfigStore};
use wsctl_core::{Config, SshConfigurer, SyncReport};

use super::{print_report, summary};
use crate::commands::context::{
    LoadedWorkspaces, load_workspaces, open_configurer, ssh_config_store,
};

/// Prune only when asked to and the workspace list was ever fetched
fn should_prune(requested: bool, loaded: &LoadedWorkspaces) -> bool {
    if requested && !loaded.can_prune() {
        tracing::warn!("Workspace list was never fetched, not pruning SSH entries");
        return false;
    }
    requested
}

/// Sync entries, pruning unless disabled by flag or config
fn reconcile<S: SshConfigStore>(
    configurer: &mut SshConfigurer<S>,
    prune: bool,
) -> Result<SyncReport> {
    let report = if prune {
        configurer.config()?
    } else {
        configurer.create_ssh_config_entries()?
    };
    Ok(report)
}

pub async fn cmd_ssh_config_sync(
    config: &Config,
    dry_run: bool,
    no_prune: bool,
    quiet: bool,
) -> Result<()> {
    let loaded = load_workspaces(config, quiet).await?;
    let store = ssh_config_store(config)?;
    let requested = config.prune && !no_prune;
    let prune = should_prune(requested, &loaded);
    if requested && !prune && !quiet {
        eprintln!(
            "{} No workspace list has been fetched yet, keeping existing entries",
            style("Warning:").yellow()
        );
    }

    if dry_run {
        let preview = MemorySshConfigStore::new(store.read_ssh_config()?);
        let mut configurer = open_configurer(config, loaded.workspaces, &preview)?;
        let report = reconcile(&mut configurer, prune)?;

        print_report(&report);
        println!("{} {}", style("Dry run:").cyan(), summary(&report));
        if report.written {
            println!();
            print!("{}", preview.contents());
        } else {
            println!("{} is already up to date.", store.path().display());
        }
        return Ok(());
    }

    let mut configurer = open_configurer(config, loaded.workspaces, &store)?;
    let report = reconcile(&mut configurer, prune)?;

    if !quiet {
        print_report(&report);
        if report.written {
            println!(
                "{} Updated {} ({})",
                style("Success:").green().bold(),
                store.path().display(),
                summary(&report)
            );
        } else {
            println!(
                "{} is already up to date ({} entries).",
                store.path().display(),
                report.unchanged.len()
            );
        }
    }

    Ok(())
}
