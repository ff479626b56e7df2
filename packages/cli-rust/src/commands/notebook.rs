//! Notebook command implementation
//!
//! Forwards a workspace's notebook server to localhost over the managed
//! SSH entry and keeps the tunnel open until interrupted.

use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result, bail};
use clap::Args;
use console::style;
use wsctl_core::Config;
use wsctl_core::workspace::{ensure_running, find_workspace};

use super::context::{load_workspaces, open_configurer, ssh_config_store};
use crate::output::state_style;

/// Port the notebook server listens on inside the workspace
pub const DEFAULT_NOTEBOOK_PORT: u16 = 8888;

/// Arguments for the notebook command
#[derive(Args)]
pub struct NotebookArgs {
    /// Workspace name or id
    pub workspace: String,

    /// Local and remote notebook port
    #[arg(short, long, default_value_t = DEFAULT_NOTEBOOK_PORT)]
    pub port: u16,

    /// Open the notebook in the default browser
    #[arg(long)]
    pub open: bool,
}

/// `ssh -N -L port:localhost:port alias`
fn forward_command(alias: &str, port: u16) -> Command {
    let mut cmd = Command::new("ssh");

    // Local forward only, no remote command
    cmd.arg("-N")
        .arg("-L")
        .arg(format!("{port}:localhost:{port}"));

    // Fail instead of silently running without the forward
    cmd.arg("-o").arg("ExitOnForwardFailure=yes");

    cmd.arg(alias);
    cmd.stdin(Stdio::null());
    cmd
}

fn notebook_url(port: u16) -> String {
    format!("http://localhost:{port}")
}

/// Forward the notebook port of a running workspace
///
/// This command:
/// 1. Checks the workspace is RUNNING
/// 2. Checks it has a managed SSH entry
/// 3. Refuses a local port already claimed by a managed entry
/// 4. Runs the SSH port forward in the foreground
pub async fn cmd_notebook(args: &NotebookArgs, config: &Config, quiet: bool) -> Result<()> {
    let loaded = load_workspaces(config, quiet).await?;
    let workspace = find_workspace(&loaded.workspaces, &args.workspace)?.clone();

    if let Err(e) = ensure_running(&workspace) {
        bail!(
            "{}\n\nCurrent status: {}",
            e,
            state_style(&workspace.status)
        );
    }

    let store = ssh_config_store(config)?;
    let configurer = open_configurer(config, loaded.workspaces, &store)?;
    let alias = configurer.alias_for(&workspace);

    configurer
        .get_configured_workspace_port(&workspace)
        .with_context(|| {
            format!(
                "No SSH entry for '{}', create it with: wsctl ssh-config sync",
                workspace.name
            )
        })?;

    let claimed = configurer.get_managed_ports(configurer.managed_aliases().as_slice());
    if claimed.contains(&args.port.to_string()) {
        bail!(
            "Local port {} is used by a managed SSH entry\n\nPick another one with: {}",
            args.port,
            style("wsctl notebook <workspace> --port <port>").cyan()
        );
    }

    let url = notebook_url(args.port);
    if !quiet {
        println!(
            "Forwarding notebook of {} to {}",
            style(&workspace.name).cyan(),
            style(&url).cyan()
        );
        println!("{}", style("Press Ctrl-C to stop.").dim());
    }

    tracing::debug!(
        "Spawning port forward: ssh -N -L {}:localhost:{} {}",
        args.port,
        args.port,
        alias
    );

    let mut child = forward_command(&alias, args.port).spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!("SSH not found. Install OpenSSH client.")
        } else {
            anyhow::anyhow!("Failed to start ssh: {}", e)
        }
    })?;

    if args.open {
        if let Err(e) = webbrowser::open(&url) {
            if !quiet {
                eprintln!(
                    "{} Failed to open browser: {}",
                    style("Warning:").yellow(),
                    e
                );
                eprintln!("Open manually: {}", style(&url).cyan());
            }
        }
    }

    let status: ExitStatus = tokio::task::spawn_blocking(move || child.wait())
        .await
        .context("Port forward task failed")?
        .context("Failed to wait for ssh")?;

    if !status.success() {
        bail!("Port forward exited with {}", status);
    }

    Ok(())
}
