//! Managed private key location
//!
//! wsctl does not create or rotate key material. It only needs the absolute
//! path of the key, since that exact string marks the SSH config entries it
//! owns.

use std::path::{Path, PathBuf};

use crate::sshconfig::SshConfigError;

/// Resolve a key path to an absolute, UTF-8 path string
///
/// Expands a leading `~` and makes relative paths absolute against the
/// current directory. The file does not have to exist yet.
pub fn resolve_key_path(raw: &str) -> Result<String, SshConfigError> {
    let unresolved = |reason: &str| SshConfigError::KeyPathUnresolved {
        path: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(unresolved("path is empty"));
    }

    let expanded: PathBuf = if trimmed == "~" {
        dirs::home_dir().ok_or_else(|| unresolved("home directory unknown"))?
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        dirs::home_dir()
            .ok_or_else(|| unresolved("home directory unknown"))?
            .join(rest)
    } else {
        PathBuf::from(trimmed)
    };

    let absolute = std::path::absolute(&expanded).map_err(|e| unresolved(&e.to_string()))?;

    path_to_string(&absolute).ok_or_else(|| unresolved("path is not valid UTF-8"))
}

fn path_to_string(path: &Path) -> Option<String> {
    path.to_str().map(str::to_string)
}
