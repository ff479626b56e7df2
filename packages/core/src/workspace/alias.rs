//! SSH alias derivation
//!
//! The alias rule is swappable: anything mapping a workspace to a
//! deterministic, per-workspace unique string works.

use super::schema::Workspace;

/// Maps a workspace to the alias used after `Host`
pub type AliasFn = fn(&Workspace) -> String;

/// Default rule: the workspace DNS name, or its name when DNS is unset
///
/// Whitespace would split the `Host` line into several patterns, so it is
/// replaced with `-`.
pub fn default_alias(workspace: &Workspace) -> String {
    let source = if workspace.dns.trim().is_empty() {
        &workspace.name
    } else {
        &workspace.dns
    };
    sanitize(source)
}

/// Alternative rule: always the workspace name
pub fn name_alias(workspace: &Workspace) -> String {
    sanitize(&workspace.name)
}

fn sanitize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("-")
}
