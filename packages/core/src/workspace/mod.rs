//! Workspace model
//!
//! Provides the read-only view of remote workspaces that SSH config sync
//! works from:
//! - Workspace schema as returned by the workspace service
//! - Alias derivation for `Host` entries
//! - Cached and HTTP workspace sources

mod alias;
mod error;
mod schema;
mod source;
mod storage;

pub use alias::{AliasFn, default_alias, name_alias};
pub use error::WorkspaceError;
pub use schema::{ActiveOrganization, Workspace, WorkspaceStatus};
pub use source::{
    CachedWorkspaceSource, WorkspaceSource, ensure_running, fetch_workspaces, filter_by_org,
    find_workspace,
};
pub use storage::{
    WorkspaceCache, load_active_org, load_workspace_cache, save_active_org, save_workspace_cache,
};
