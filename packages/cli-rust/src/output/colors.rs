//! Color utilities for CLI output
//!
//! Keeps workspace states styled the same way in plain messages and tables.

use comfy_table::Color;
use console::{Style, StyledObject};
use wsctl_core::WorkspaceStatus;

/// Style a workspace state for inline messages
///
/// - RUNNING -> green bold
/// - STOPPED -> red
/// - DEPLOYING, STOPPING -> yellow
/// - other -> dim
pub fn state_style(status: &WorkspaceStatus) -> StyledObject<String> {
    let style = match status {
        WorkspaceStatus::Running => Style::new().green().bold(),
        WorkspaceStatus::Stopped => Style::new().red(),
        WorkspaceStatus::Deploying | WorkspaceStatus::Stopping => Style::new().yellow(),
        WorkspaceStatus::Other(_) => Style::new().dim(),
    };
    style.apply_to(status.to_string())
}

/// Table cell color for a workspace state
pub fn state_color(status: &WorkspaceStatus) -> Color {
    match status {
        WorkspaceStatus::Running => Color::Green,
        WorkspaceStatus::Stopped => Color::Red,
        WorkspaceStatus::Deploying | WorkspaceStatus::Stopping => Color::Yellow,
        WorkspaceStatus::Other(_) => Color::DarkGrey,
    }
}
