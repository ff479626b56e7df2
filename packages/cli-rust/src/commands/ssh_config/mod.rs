//! SSH config subcommands
//!
//! Provides `wsctl ssh-config` subcommands for keeping `~/.ssh/config` in
//! sync with the workspace list and reading back assigned ports.

mod port;
mod ports;
mod prune;
mod sync;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use wsctl_core::{Config, SyncReport};

pub use port::cmd_ssh_config_port;
pub use ports::cmd_ssh_config_ports;
pub use prune::cmd_ssh_config_prune;
pub use sync::cmd_ssh_config_sync;

/// SSH config command arguments
#[derive(Args)]
pub struct SshConfigArgs {
    #[command(subcommand)]
    command: SshConfigSubcommands,
}

/// SSH config management subcommands
#[derive(Subcommand)]
pub enum SshConfigSubcommands {
    /// Add, update and prune entries for your workspaces
    Sync {
        /// Show the resulting config without writing it
        #[arg(long)]
        dry_run: bool,

        /// Keep entries of workspaces that no longer exist
        #[arg(long)]
        no_prune: bool,
    },
    /// Remove entries of workspaces that no longer exist
    Prune {
        /// Show what would be removed without writing
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// List local ports claimed by managed entries
    Ports {
        /// Only these aliases (default: every managed entry)
        aliases: Vec<String>,
    },
    /// Print the local port of a workspace's entry
    Port {
        /// Workspace name or id
        workspace: String,
    },
}

/// Handle ssh-config command
pub async fn cmd_ssh_config(args: SshConfigArgs, config: &Config, quiet: bool) -> Result<()> {
    match args.command {
        SshConfigSubcommands::Sync { dry_run, no_prune } => {
            cmd_ssh_config_sync(config, dry_run, no_prune, quiet).await
        }
        SshConfigSubcommands::Prune { dry_run, yes } => {
            cmd_ssh_config_prune(config, dry_run, yes, quiet).await
        }
        SshConfigSubcommands::Ports { aliases } => cmd_ssh_config_ports(config, &aliases),
        SshConfigSubcommands::Port { workspace } => {
            cmd_ssh_config_port(config, &workspace, quiet).await
        }
    }
}

/// Print what a reconciliation pass did
fn print_report(report: &SyncReport) {
    for alias in &report.added {
        println!("  {} {}", style("+").green().bold(), alias);
    }
    for alias in &report.updated {
        println!("  {} {}", style("~").yellow().bold(), alias);
    }
    for alias in &report.pruned {
        println!("  {} {}", style("-").red().bold(), alias);
    }
    for alias in &report.skipped {
        println!(
            "  {} {} {}",
            style("!").yellow(),
            alias,
            style("(hand-written entry with this name, left alone)").dim()
        );
    }
}

/// One-line summary of a reconciliation pass
fn summary(report: &SyncReport) -> String {
    format!(
        "{} added, {} updated, {} removed, {} unchanged",
        report.added.len(),
        report.updated.len(),
        report.pruned.len(),
        report.unchanged.len()
    )
}
