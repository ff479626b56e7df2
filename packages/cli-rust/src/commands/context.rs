//! Shared setup for workspace commands
//!
//! Resolves the active organization, the workspace list and the SSH config
//! from the tool configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use console::style;
use wsctl_core::config::{
    Config, get_active_org_path, get_workspaces_path, resolve_private_key_path,
    resolve_ssh_config_path,
};
use wsctl_core::sshconfig::{FileSshConfigStore, SshConfigStore, SshConfigurer};
use wsctl_core::workspace::{
    ActiveOrganization, CachedWorkspaceSource, Workspace, WorkspaceCache, WorkspaceSource,
    fetch_workspaces, load_active_org, load_workspace_cache, save_workspace_cache,
};

use crate::output::CommandSpinner;

/// Bearer token for the workspace service
pub const API_TOKEN_ENV: &str = "WSCTL_API_TOKEN";

/// Where a workspace list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceOrigin {
    Live,
    Cache,
}

/// Workspaces of the active organization
pub struct LoadedWorkspaces {
    pub organization: Option<ActiveOrganization>,
    pub workspaces: Vec<Workspace>,
    pub origin: WorkspaceOrigin,
    /// When the list was fetched, `None` if it never was
    pub fetched_at: Option<DateTime<Utc>>,
}

impl LoadedWorkspaces {
    /// Whether the list reflects the service at some point in time
    ///
    /// An empty list read from a cache that was never written says nothing
    /// about which workspaces exist, so nothing may be pruned from it.
    pub fn can_prune(&self) -> bool {
        self.origin == WorkspaceOrigin::Live || self.fetched_at.is_some()
    }
}

fn cache_path() -> Result<PathBuf> {
    get_workspaces_path().ok_or_else(|| anyhow!("Could not determine workspace cache path"))
}

/// Load the workspace list
///
/// With an `api_url` and an active organization the list is fetched live
/// (bounded by `fetch_timeout_secs`) and cached. Otherwise, or when the
/// fetch fails, the cached list is used.
pub async fn load_workspaces(config: &Config, quiet: bool) -> Result<LoadedWorkspaces> {
    let org_path =
        get_active_org_path().ok_or_else(|| anyhow!("Could not determine active org path"))?;
    let cache_path = cache_path()?;
    let organization = load_active_org(&org_path)?;

    let live = match (config.api_url.as_deref(), organization.as_ref()) {
        (Some(api_url), Some(org)) if config.has_api() => {
            match fetch_live(config, api_url, org, quiet).await {
                Ok(list) => {
                    let cache = WorkspaceCache::fresh(Some(org.id.clone()), list.clone());
                    if let Err(e) = save_workspace_cache(&cache_path, &cache) {
                        tracing::warn!("Could not update workspace cache: {}", e);
                    }
                    Some(list)
                }
                Err(e) => {
                    tracing::warn!("Falling back to cached workspaces: {:#}", e);
                    if !quiet {
                        eprintln!(
                            "{} {:#}, using cached workspace list",
                            style("Warning:").yellow(),
                            e
                        );
                    }
                    None
                }
            }
        }
        (Some(_), None) if config.has_api() => {
            tracing::warn!("No active organization set, using cached workspace list");
            None
        }
        _ => None,
    };

    let (source, origin, fetched_at): (
        Box<dyn WorkspaceSource>,
        WorkspaceOrigin,
        Option<DateTime<Utc>>,
    ) = match live {
        Some(list) => (Box::new(list), WorkspaceOrigin::Live, Some(Utc::now())),
        None => (
            Box::new(CachedWorkspaceSource::new(
                &cache_path,
                organization.clone(),
            )),
            WorkspaceOrigin::Cache,
            load_workspace_cache(&cache_path)?.fetched_at,
        ),
    };

    let workspaces = source.list_workspaces()?;
    tracing::debug!("{} workspaces ({:?})", workspaces.len(), origin);

    Ok(LoadedWorkspaces {
        organization,
        workspaces,
        origin,
        fetched_at,
    })
}

async fn fetch_live(
    config: &Config,
    api_url: &str,
    org: &ActiveOrganization,
    quiet: bool,
) -> Result<Vec<Workspace>> {
    let timeout = Duration::from_secs(config.fetch_timeout_secs);
    let token = std::env::var(API_TOKEN_ENV).ok();

    let spinner = CommandSpinner::new_maybe(
        &format!("Fetching workspaces for {}...", org.name),
        quiet,
    );

    let result = tokio::time::timeout(
        timeout,
        fetch_workspaces(api_url, &org.id, token.as_deref(), timeout),
    )
    .await;

    match result {
        Ok(Ok(list)) => {
            spinner.success(&format!("Fetched {} workspaces", list.len()));
            Ok(list)
        }
        Ok(Err(e)) => {
            spinner.fail("Could not fetch workspaces");
            Err(e.into())
        }
        Err(_) => {
            spinner.fail("Workspace service timed out");
            bail!(
                "No answer from the workspace service within {}s",
                config.fetch_timeout_secs
            )
        }
    }
}

/// The SSH config file wsctl manages
pub fn ssh_config_store(config: &Config) -> Result<FileSshConfigStore> {
    let path = resolve_ssh_config_path(config)
        .ok_or_else(|| anyhow!("Could not determine SSH config path"))?;
    Ok(FileSshConfigStore::new(path))
}

/// Load the SSH config into a configurer set up from `config`
pub fn open_configurer<S: SshConfigStore>(
    config: &Config,
    workspaces: Vec<Workspace>,
    store: S,
) -> Result<SshConfigurer<S>> {
    let key_path = resolve_private_key_path(config)
        .ok_or_else(|| anyhow!("Could not determine managed key path"))?;

    let configurer = SshConfigurer::new(workspaces, store, &key_path)
        .context("Failed to load SSH config")?
        .with_user(config.ssh_user.as_str())
        .with_port_base(config.port_base);

    Ok(configurer)
}
