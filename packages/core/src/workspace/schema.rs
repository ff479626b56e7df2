//! Workspace schema
//!
//! Records returned by the workspace service. wsctl only reads them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state reported by the workspace service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkspaceStatus {
    Running,
    Deploying,
    Stopping,
    Stopped,
    /// Anything the service adds later
    Other(String),
}

impl WorkspaceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "RUNNING",
            Self::Deploying => "DEPLOYING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Other(s) => s,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl From<String> for WorkspaceStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "RUNNING" => Self::Running,
            "DEPLOYING" => Self::Deploying,
            "STOPPING" => Self::Stopping,
            "STOPPED" => Self::Stopped,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for WorkspaceStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<WorkspaceStatus> for String {
    fn from(value: WorkspaceStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,

    pub name: String,

    /// Address on the managed network (DNS-resolvable)
    #[serde(default)]
    pub dns: String,

    pub status: WorkspaceStatus,

    #[serde(default)]
    pub organization_id: String,

    #[serde(default)]
    pub workspace_group_id: String,
}

impl Workspace {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        dns: impl Into<String>,
        status: impl Into<WorkspaceStatus>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dns: dns.into(),
            status: status.into(),
            organization_id: String::new(),
            workspace_group_id: String::new(),
        }
    }

    /// Builder pattern: set organization
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = organization_id.into();
        self
    }

    /// Builder pattern: set workspace group
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.workspace_group_id = group_id.into();
        self
    }
}

/// The organization whose workspaces are synced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveOrganization {
    pub id: String,
    pub name: String,
}
