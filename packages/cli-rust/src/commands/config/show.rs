//! Config show subcommand
//!
//! Displays current configuration in table or JSON format.

use anyhow::Result;
use comfy_table::{Cell, Color, Table};
use wsctl_core::config::{
    self, Config, resolve_private_key_path, resolve_ssh_config_path,
};

/// Show current configuration
///
/// Unset paths are shown with the value they resolve to.
pub fn cmd_config_show(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let ssh_config = resolve_ssh_config_path(config)
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let private_key = resolve_private_key_path(config).unwrap_or_default();

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);

    table.add_row(vec![
        Cell::new("version"),
        Cell::new(config.version.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("ssh_config_path"),
        format_path(&ssh_config, config.ssh_config_path.is_none()),
    ]);
    table.add_row(vec![
        Cell::new("private_key_path"),
        format_path(&private_key, config.private_key_path.is_none()),
    ]);
    table.add_row(vec![Cell::new("ssh_user"), Cell::new(&config.ssh_user)]);
    table.add_row(vec![
        Cell::new("port_base"),
        Cell::new(config.port_base.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("api_url"),
        match &config.api_url {
            Some(url) => Cell::new(url),
            None => Cell::new("(not set, cached list only)").fg(Color::DarkGrey),
        },
    ]);
    table.add_row(vec![
        Cell::new("fetch_timeout_secs"),
        Cell::new(config.fetch_timeout_secs.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("prune"),
        Cell::new(config.prune.to_string()).fg(if config.prune {
            Color::Reset
        } else {
            Color::Yellow
        }),
    ]);

    println!("{table}");

    if let Some(path) = config::get_config_path() {
        println!();
        println!("Config file: {}", path.display());
    }

    Ok(())
}

/// Default-derived paths are marked as such
fn format_path(path: &str, is_default: bool) -> Cell {
    if is_default {
        Cell::new(format!("{path} (default)")).fg(Color::DarkGrey)
    } else {
        Cell::new(path)
    }
}
