//! wsctl ls - List workspaces of the active organization

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use console::style;
use wsctl_core::{Config, Workspace, WorkspaceStatus};

use super::context::{WorkspaceOrigin, load_workspaces, open_configurer, ssh_config_store};
use crate::output::state_color;

/// Arguments for the ls command
#[derive(Args)]
pub struct LsArgs {
    /// Include stopped workspaces
    #[arg(short, long)]
    pub all: bool,

    /// Show only workspace names (for scripting)
    #[arg(long)]
    pub names_only: bool,
}

/// Stopped workspaces are hidden unless `all` is set
fn visible(workspace: &Workspace, all: bool) -> bool {
    all || workspace.status != WorkspaceStatus::Stopped
}

pub async fn cmd_ls(args: &LsArgs, config: &Config, quiet: bool) -> Result<()> {
    let loaded = load_workspaces(config, quiet).await?;

    let shown: Vec<&Workspace> = loaded
        .workspaces
        .iter()
        .filter(|ws| visible(ws, args.all))
        .collect();

    if args.names_only || quiet {
        for ws in &shown {
            println!("{}", ws.name);
        }
        return Ok(());
    }

    if shown.is_empty() {
        println!("No workspaces found.");
        if loaded.origin == WorkspaceOrigin::Cache && !config.has_api() {
            println!();
            println!(
                "  {} {}",
                style("Point wsctl at your workspace service:").dim(),
                style("wsctl config set api_url <url>").yellow()
            );
        }
        return Ok(());
    }

    let store = ssh_config_store(config)?;
    let configurer = open_configurer(config, loaded.workspaces.clone(), &store)?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "ID", "Status", "SSH alias", "Port"]);

    for ws in &shown {
        let port = configurer
            .get_configured_workspace_port(ws)
            .map(|p| p.to_string())
            .unwrap_or_else(|_| "-".to_string());

        table.add_row(vec![
            Cell::new(&ws.name),
            Cell::new(&ws.id),
            Cell::new(ws.status.as_str()).fg(state_color(&ws.status)),
            Cell::new(configurer.alias_for(ws)),
            Cell::new(port),
        ]);
    }

    println!("{table}");

    if let Some(org) = &loaded.organization {
        println!();
        println!("  {} {}", style("Organization:").dim(), style(&org.name).cyan());
    }

    if loaded.origin == WorkspaceOrigin::Cache {
        let age = loaded
            .fetched_at
            .and_then(|at| (chrono::Utc::now() - at).to_std().ok())
            .map(|d| {
                let rounded = std::time::Duration::from_secs(d.as_secs());
                format!("{} ago", humantime::format_duration(rounded))
            })
            .unwrap_or_else(|| "unknown".to_string());
        println!("  {} {}", style("Cached list, fetched:").dim(), style(age).dim());
    }

    let hidden = loaded.workspaces.len() - shown.len();
    if hidden > 0 {
        println!(
            "  {} {} stopped, use {} to show",
            style("Hidden:").dim(),
            hidden,
            style("--all").green()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_hidden_by_default() {
        let stopped = Workspace::new("w1", "alpha", "alpha.dev", WorkspaceStatus::Stopped);
        let running = Workspace::new("w2", "beta", "beta.dev", WorkspaceStatus::Running);

        assert!(!visible(&stopped, false));
        assert!(visible(&stopped, true));
        assert!(visible(&running, false));
    }

    #[test]
    fn deploying_is_visible() {
        let ws = Workspace::new("w3", "gamma", "", WorkspaceStatus::Deploying);
        assert!(visible(&ws, false));
    }
}
