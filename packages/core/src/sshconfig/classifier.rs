//! Managed/active host classification
//!
//! wsctl keeps no manifest of what it wrote. A block belongs to wsctl when
//! its `IdentityFile` is the managed private key.

use super::document::{HostBlock, hostname_from_str};

/// Decides whether a block is owned by wsctl
pub trait HostClassifier {
    fn is_managed(&self, block: &HostBlock) -> bool;
}

/// Ownership by exact `IdentityFile` path equality
#[derive(Debug, Clone)]
pub struct IdentityFileClassifier {
    private_key_path: String,
}

impl IdentityFileClassifier {
    pub fn new(private_key_path: impl Into<String>) -> Self {
        Self {
            private_key_path: private_key_path.into(),
        }
    }

    pub fn private_key_path(&self) -> &str {
        &self.private_key_path
    }
}

impl HostClassifier for IdentityFileClassifier {
    fn is_managed(&self, block: &HostBlock) -> bool {
        is_managed_host(block, &self.private_key_path)
    }
}

/// True if any `IdentityFile` of the block equals `private_key_path`
///
/// `Match` sections are never managed.
pub fn is_managed_host(block: &HostBlock, private_key_path: &str) -> bool {
    !block.is_match()
        && block
            .directives()
            .any(|(key, value)| {
                key.eq_ignore_ascii_case("IdentityFile") && value == private_key_path
            })
}

/// True if the stanza's alias is one of `active`
///
/// A stanza with no `Host` line has no alias and is never active.
pub fn is_active_host<S: AsRef<str>>(stanza: &str, active: &[S]) -> bool {
    let alias = hostname_from_str(stanza);
    if alias.is_empty() {
        tracing::debug!("Stanza has no Host line, treating as inactive");
        return false;
    }
    active.iter().any(|a| a.as_ref() == alias)
}
