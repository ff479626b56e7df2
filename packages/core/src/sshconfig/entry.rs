//! Managed host block construction

use super::document::HostBlock;

/// Everything needed to write one managed block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedEntrySpec {
    pub alias: String,
    pub address: String,
    pub identity_file: String,
    pub user: String,
    pub port: u16,
}

/// Build the canonical block for a workspace
///
/// Directives are always `Hostname`, `IdentityFile`, `User`, `Port` in that
/// order. An identity path containing whitespace is quoted.
pub fn build_entry(spec: &ManagedEntrySpec) -> HostBlock {
    let identity_file = if spec.identity_file.chars().any(char::is_whitespace) {
        format!("\"{}\"", spec.identity_file)
    } else {
        spec.identity_file.clone()
    };

    HostBlock::from_directives(
        &spec.alias,
        [
            ("Hostname", spec.address.clone()),
            ("IdentityFile", identity_file),
            ("User", spec.user.clone()),
            ("Port", spec.port.to_string()),
        ],
    )
}

/// Whether `block` already says what `spec` would write
pub fn entry_matches(block: &HostBlock, spec: &ManagedEntrySpec) -> bool {
    let port = spec.port.to_string();
    block.directive("Hostname") == Some(spec.address.as_str())
        && block.directive("User") == Some(spec.user.as_str())
        && block.directive("Port") == Some(port.as_str())
}

/// Return `alias` only when it is both wanted and valid, else an empty string
pub fn create_config_entry(alias: &str, include: bool, is_valid: bool) -> String {
    if include && is_valid {
        alias.to_string()
    } else {
        String::new()
    }
}
