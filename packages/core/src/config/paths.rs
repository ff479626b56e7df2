//! XDG-style path resolution for wsctl
//!
//! - Linux/macOS: ~/.config/wsctl/
//! - Windows: %APPDATA%\wsctl\

use std::path::PathBuf;

use super::schema::Config;

/// Get the configuration directory path
///
/// Holds config.json, the workspace cache, the active organization and
/// the managed private key.
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".config").join("wsctl"))
    }
    #[cfg(target_os = "windows")]
    {
        directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("wsctl"))
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

/// Returns: `{config_dir}/config.json`
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.json"))
}

/// Returns: `{config_dir}/workspaces.json`
pub fn get_workspaces_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("workspaces.json"))
}

/// Returns: `{config_dir}/active_org.json`
pub fn get_active_org_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("active_org.json"))
}

/// Default managed private key: `{config_dir}/wsctl.pem`
pub fn get_default_private_key_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("wsctl.pem"))
}

/// The user's SSH client config: `~/.ssh/config`
pub fn get_default_ssh_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("config"))
}

/// SSH config to manage, honouring the `ssh_config_path` override
pub fn resolve_ssh_config_path(config: &Config) -> Option<PathBuf> {
    match &config.ssh_config_path {
        Some(path) => Some(expand_home(path)),
        None => get_default_ssh_config_path(),
    }
}

/// Managed key path as configured (not yet made absolute)
pub fn resolve_private_key_path(config: &Config) -> Option<String> {
    match &config.private_key_path {
        Some(path) => Some(path.clone()),
        None => get_default_private_key_path().map(|p| p.to_string_lossy().into_owned()),
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
