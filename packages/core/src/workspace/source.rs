//! Workspace sources
//!
//! The workspace list comes either from the workspace service over HTTP or
//! from the cache written after the last successful fetch.

use std::path::PathBuf;
use std::time::Duration;

use super::error::WorkspaceError;
use super::schema::{ActiveOrganization, Workspace};
use super::storage::load_workspace_cache;

/// Something that can list the workspaces of the active organization
pub trait WorkspaceSource {
    fn list_workspaces(&self) -> Result<Vec<Workspace>, WorkspaceError>;
}

impl WorkspaceSource for Vec<Workspace> {
    fn list_workspaces(&self) -> Result<Vec<Workspace>, WorkspaceError> {
        Ok(self.clone())
    }
}

/// Workspaces from workspaces.json, filtered to the active organization
#[derive(Debug, Clone)]
pub struct CachedWorkspaceSource {
    path: PathBuf,
    organization: Option<ActiveOrganization>,
}

impl CachedWorkspaceSource {
    pub fn new(path: impl Into<PathBuf>, organization: Option<ActiveOrganization>) -> Self {
        Self {
            path: path.into(),
            organization,
        }
    }
}

impl WorkspaceSource for CachedWorkspaceSource {
    fn list_workspaces(&self) -> Result<Vec<Workspace>, WorkspaceError> {
        let cache = load_workspace_cache(&self.path)?;
        Ok(filter_by_org(cache.workspaces, self.organization.as_ref()))
    }
}

/// Keep only the workspaces of `org` (all of them when no org is active)
pub fn filter_by_org(
    workspaces: Vec<Workspace>,
    org: Option<&ActiveOrganization>,
) -> Vec<Workspace> {
    match org {
        Some(org) => workspaces
            .into_iter()
            .filter(|ws| ws.organization_id.is_empty() || ws.organization_id == org.id)
            .collect(),
        None => workspaces,
    }
}

/// Look up a workspace by id or name
///
/// An exact id match wins. A name shared by several workspaces is rejected.
pub fn find_workspace<'a>(
    workspaces: &'a [Workspace],
    name_or_id: &str,
) -> Result<&'a Workspace, WorkspaceError> {
    if let Some(ws) = workspaces.iter().find(|ws| ws.id == name_or_id) {
        return Ok(ws);
    }

    let mut by_name = workspaces.iter().filter(|ws| ws.name == name_or_id);
    match (by_name.next(), by_name.next()) {
        (Some(ws), None) => Ok(ws),
        (Some(_), Some(_)) => Err(WorkspaceError::Ambiguous(name_or_id.to_string())),
        (None, _) => Err(WorkspaceError::NotFound(name_or_id.to_string())),
    }
}

/// Fail with `NotRunning` unless the workspace is running
pub fn ensure_running(workspace: &Workspace) -> Result<(), WorkspaceError> {
    if workspace.status.is_running() {
        Ok(())
    } else {
        Err(WorkspaceError::NotRunning {
            name: workspace.name.clone(),
            status: workspace.status.to_string(),
        })
    }
}

/// Fetch the workspace list of an organization from the workspace service
///
/// Calls `GET {api_url}/organizations/{org_id}/workspaces`. The request
/// itself is bounded by `timeout`; callers may add their own deadline.
pub async fn fetch_workspaces(
    api_url: &str,
    org_id: &str,
    token: Option<&str>,
    timeout: Duration,
) -> Result<Vec<Workspace>, WorkspaceError> {
    let url = format!(
        "{}/organizations/{}/workspaces",
        api_url.trim_end_matches('/'),
        org_id
    );

    let client = reqwest::Client::builder().timeout(timeout).build()?;

    let mut request = client.get(&url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    tracing::debug!("Fetching workspaces from {}", url);
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(WorkspaceError::ServiceStatus(status.as_u16()));
    }

    let workspaces = response.json::<Vec<Workspace>>().await?;
    tracing::info!("Fetched {} workspaces for org {}", workspaces.len(), org_id);
    Ok(workspaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceStatus;
    use crate::workspace::storage::{WorkspaceCache, save_workspace_cache};
    use tempfile::TempDir;

    fn org(id: &str) -> ActiveOrganization {
        ActiveOrganization {
            id: id.to_string(),
            name: "wsctl.dev".to_string(),
        }
    }

    fn sample() -> Vec<Workspace> {
        vec![
            Workspace::new("w1", "alpha", "alpha.dev", WorkspaceStatus::Running)
                .with_organization("org-1"),
            Workspace::new("w2", "beta", "beta.dev", WorkspaceStatus::Stopped)
                .with_organization("org-2"),
            Workspace::new("w3", "alpha", "alpha2.dev", WorkspaceStatus::Deploying)
                .with_organization("org-1"),
        ]
    }

    #[test]
    fn filter_keeps_active_org_only() {
        let filtered = filter_by_org(sample(), Some(&org("org-1")));
        let ids: Vec<_> = filtered.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w3"]);

        assert_eq!(filter_by_org(sample(), None).len(), 3);
    }

    #[test]
    fn find_by_id_then_unique_name() {
        let all = sample();
        assert_eq!(find_workspace(&all, "w2").unwrap().name, "beta");
        assert_eq!(find_workspace(&all, "beta").unwrap().id, "w2");
    }

    #[test]
    fn find_rejects_ambiguous_and_missing_names() {
        let all = sample();
        assert!(matches!(
            find_workspace(&all, "alpha"),
            Err(WorkspaceError::Ambiguous(_))
        ));
        assert!(matches!(
            find_workspace(&all, "gamma"),
            Err(WorkspaceError::NotFound(_))
        ));
    }

    #[test]
    fn ensure_running_reports_status() {
        let all = sample();
        assert!(ensure_running(&all[0]).is_ok());

        let err = ensure_running(&all[1]).unwrap_err();
        assert_eq!(err.to_string(), "Workspace 'beta' is STOPPED, it must be RUNNING");
    }

    #[test]
    fn cached_source_filters_by_org() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workspaces.json");
        save_workspace_cache(&path, &WorkspaceCache::fresh(None, sample())).unwrap();

        let source = CachedWorkspaceSource::new(&path, Some(org("org-2")));
        let listed = source.list_workspaces().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "beta");
    }

    #[tokio::test]
    async fn fetch_reports_unreachable_service() {
        // Port 9 (discard) on localhost is closed on CI machines
        let result = fetch_workspaces(
            "http://127.0.0.1:9",
            "org-1",
            None,
            Duration::from_millis(500),
        )
        .await;
        assert!(matches!(result, Err(WorkspaceError::RequestFailed(_))));
    }
}
