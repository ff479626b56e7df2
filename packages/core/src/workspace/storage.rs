//! Local workspace state
//!
//! Load and save the cached workspace list (workspaces.json) and the active
//! organization (active_org.json).

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::WorkspaceError;
use super::schema::{ActiveOrganization, Workspace};

/// Contents of workspaces.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceCache {
    /// When the list was fetched from the service
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,

    /// Organization the list was fetched for
    #[serde(default)]
    pub organization_id: Option<String>,

    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}

impl WorkspaceCache {
    /// Wrap a freshly fetched list, stamped with the current time
    pub fn fresh(organization_id: Option<String>, workspaces: Vec<Workspace>) -> Self {
        Self {
            fetched_at: Some(Utc::now()),
            organization_id,
            workspaces,
        }
    }
}

/// Load the cached workspace list
///
/// Returns an empty cache if the file doesn't exist.
pub fn load_workspace_cache(path: &Path) -> Result<WorkspaceCache, WorkspaceError> {
    if !path.exists() {
        tracing::debug!("Workspace cache not found: {}", path.display());
        return Ok(WorkspaceCache::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| WorkspaceError::LoadFailed(format!("{}: {}", path.display(), e)))?;

    let cache: WorkspaceCache = serde_json::from_str(&contents).map_err(|e| {
        WorkspaceError::LoadFailed(format!("{}: invalid JSON: {}", path.display(), e))
    })?;

    tracing::debug!(
        "Loaded {} cached workspaces from {}",
        cache.workspaces.len(),
        path.display()
    );
    Ok(cache)
}

/// Save the workspace list cache
pub fn save_workspace_cache(path: &Path, cache: &WorkspaceCache) -> Result<(), WorkspaceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| WorkspaceError::SaveFailed(format!("{}: {}", parent.display(), e)))?;
    }

    let json = serde_json::to_string_pretty(cache)
        .map_err(|e| WorkspaceError::SaveFailed(format!("{}: {}", path.display(), e)))?;

    fs::write(path, json)
        .map_err(|e| WorkspaceError::SaveFailed(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(
        "Saved {} workspaces to {}",
        cache.workspaces.len(),
        path.display()
    );
    Ok(())
}

/// Load the active organization, if one was selected
pub fn load_active_org(path: &Path) -> Result<Option<ActiveOrganization>, WorkspaceError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| WorkspaceError::LoadFailed(format!("{}: {}", path.display(), e)))?;

    let org = serde_json::from_str(&contents).map_err(|e| {
        WorkspaceError::LoadFailed(format!("{}: invalid JSON: {}", path.display(), e))
    })?;
    Ok(Some(org))
}

/// Persist the active organization
pub fn save_active_org(path: &Path, org: &ActiveOrganization) -> Result<(), WorkspaceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| WorkspaceError::SaveFailed(format!("{}: {}", parent.display(), e)))?;
    }

    let json = serde_json::to_string(org)
        .map_err(|e| WorkspaceError::SaveFailed(format!("{}: {}", path.display(), e)))?;
    fs::write(path, json)
        .map_err(|e| WorkspaceError::SaveFailed(format!("{}: {}", path.display(), e)))?;
    Ok(())
}
