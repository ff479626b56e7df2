//! SSH config reconciliation
//!
//! `SshConfigurer` loads the SSH config once, brings the managed entries in
//! line with the workspace list, and writes the whole file back in one go.
//! Entries the user wrote by hand are never edited, moved or removed.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::classifier::{HostClassifier, IdentityFileClassifier};
use super::document::{ConfigDocument, HostBlock};
use super::entry::{ManagedEntrySpec, build_entry, create_config_entry, entry_matches};
use super::error::SshConfigError;
use super::ports::{DEFAULT_PORT_BASE, allocate_port, parse_port};
use super::store::SshConfigStore;
use crate::keys::resolve_key_path;
use crate::workspace::{AliasFn, Workspace, default_alias};

/// Login user written into managed entries unless overridden
pub const DEFAULT_SSH_USER: &str = "ubuntu";

/// What a reconciliation pass did, by alias
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub pruned: Vec<String>,
    /// Aliases already taken by a hand-written entry
    pub skipped: Vec<String>,
    /// Whether the config file was rewritten
    pub written: bool,
}

impl SyncReport {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty() || !self.pruned.is_empty()
    }
}

/// Keeps the managed part of an SSH config in sync with a workspace list
pub struct SshConfigurer<S: SshConfigStore> {
    store: S,
    workspaces: Vec<Workspace>,
    private_key_path: String,
    classifier: Box<dyn HostClassifier>,
    user: String,
    port_base: u16,
    alias_fn: AliasFn,
    document: ConfigDocument,
    persisted: String,
}

impl<S: SshConfigStore> SshConfigurer<S> {
    /// Load the current config from `store`
    ///
    /// `private_key_path` is resolved to an absolute path first, since
    /// ownership of entries is decided by exact path equality.
    pub fn new(
        workspaces: Vec<Workspace>,
        store: S,
        private_key_path: &str,
    ) -> Result<Self, SshConfigError> {
        let private_key_path = resolve_key_path(private_key_path)?;
        let persisted = store.read_ssh_config()?;
        let document = ConfigDocument::parse(&persisted);

        for block in document.blocks().iter().filter(|b| !b.is_match()) {
            if let Err(e) = block.require_alias() {
                tracing::warn!("{}, it will be left untouched", e);
            }
        }

        tracing::debug!(
            "Loaded SSH config with {} host entries, {} workspaces",
            document.blocks().len(),
            workspaces.len()
        );

        Ok(Self {
            store,
            workspaces,
            classifier: Box::new(IdentityFileClassifier::new(private_key_path.clone())),
            private_key_path,
            user: DEFAULT_SSH_USER.to_string(),
            port_base: DEFAULT_PORT_BASE,
            alias_fn: default_alias,
            document,
            persisted,
        })
    }

    /// Builder pattern: set the login user of managed entries
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Builder pattern: set the first local port handed out
    pub fn with_port_base(mut self, base: u16) -> Self {
        self.port_base = base;
        self
    }

    /// Builder pattern: set the workspace-to-alias rule
    pub fn with_alias_fn(mut self, alias_fn: AliasFn) -> Self {
        self.alias_fn = alias_fn;
        self
    }

    /// Builder pattern: decide ownership of entries some other way
    pub fn with_classifier(mut self, classifier: impl HostClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn private_key_path(&self) -> &str {
        &self.private_key_path
    }

    /// Alias a workspace is (or would be) configured under
    pub fn alias_for(&self, workspace: &Workspace) -> String {
        (self.alias_fn)(workspace)
    }

    /// Whether wsctl owns `block`
    pub fn is_managed(&self, block: &HostBlock) -> bool {
        owns(self.classifier.as_ref(), block)
    }

    /// Aliases of all managed entries, in file order
    pub fn managed_aliases(&self) -> Vec<String> {
        self.document
            .blocks()
            .iter()
            .filter(|b| self.is_managed(b))
            .map(|b| b.alias().to_string())
            .collect()
    }

    /// Add, update and prune managed entries, then write the config
    pub fn config(&mut self) -> Result<SyncReport, SshConfigError> {
        let mut report = SyncReport::default();
        self.prune(&mut report);
        self.upsert(&mut report)?;
        self.persist(&mut report)?;
        Ok(report)
    }

    /// Add and update managed entries without removing any
    pub fn create_ssh_config_entries(&mut self) -> Result<SyncReport, SshConfigError> {
        let mut report = SyncReport::default();
        self.upsert(&mut report)?;
        self.persist(&mut report)?;
        Ok(report)
    }

    /// Only remove managed entries of workspaces that no longer exist
    pub fn prune_inactive_workspaces(&mut self) -> Result<SyncReport, SshConfigError> {
        let mut report = SyncReport::default();
        self.prune(&mut report);
        self.persist(&mut report)?;
        Ok(report)
    }

    /// `Port` values of the managed entries among `aliases`
    ///
    /// Hand-written entries are ignored even when their alias is listed.
    pub fn get_managed_ports<A: AsRef<str>>(&self, aliases: &[A]) -> BTreeSet<String> {
        let included: Vec<String> = self
            .document
            .blocks()
            .iter()
            .map(|block| {
                let requested = aliases.iter().any(|a| a.as_ref() == block.alias());
                create_config_entry(block.alias(), requested, self.is_managed(block))
            })
            .filter(|alias| !alias.is_empty())
            .collect();

        self.document.used_ports(included.as_slice())
    }

    /// Local port recorded for a workspace's managed entry
    pub fn get_configured_workspace_port(
        &self,
        workspace: &Workspace,
    ) -> Result<u16, SshConfigError> {
        let alias = self.alias_for(workspace);
        self.document
            .blocks()
            .iter()
            .find(|b| b.alias() == alias && self.is_managed(b))
            .and_then(|b| b.directive("Port"))
            .and_then(parse_port)
            .ok_or(SshConfigError::NotConfigured(alias))
    }

    /// One alias per workspace, in workspace order, without repeats
    fn desired_entries(&self) -> Vec<(String, &Workspace)> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.workspaces.len());

        for workspace in &self.workspaces {
            let alias = self.alias_for(workspace);
            if alias.is_empty() {
                tracing::warn!("Workspace {} has no usable alias, skipping", workspace.id);
                continue;
            }
            if !seen.insert(alias.clone()) {
                tracing::warn!("Alias '{}' derived for more than one workspace", alias);
                continue;
            }
            entries.push((alias, workspace));
        }

        entries
    }

    fn desired_aliases(&self) -> HashSet<String> {
        self.desired_entries()
            .into_iter()
            .map(|(alias, _)| alias)
            .collect()
    }

    fn prune(&mut self, report: &mut SyncReport) {
        let desired = self.desired_aliases();
        let classifier = self.classifier.as_ref();

        let removed = self
            .document
            .remove_where(|_, block| owns(classifier, block) && !desired.contains(block.alias()));

        for block in removed {
            tracing::info!("Pruning SSH entry for inactive workspace '{}'", block.alias());
            report.pruned.push(block.alias().to_string());
        }
    }

    /// Drop managed entries whose alias already appeared earlier in the file
    ///
    /// ssh only honours the first match, so the later copy is dead weight
    /// and would break port uniqueness.
    fn remove_shadowed(&mut self) {
        let classifier = self.classifier.as_ref();
        let mut seen = HashSet::new();

        let removed = self.document.remove_where(|_, block| {
            let first = seen.insert(block.alias().to_string());
            !first && owns(classifier, block)
        });

        for block in removed {
            tracing::warn!("Removing duplicate SSH entry for '{}'", block.alias());
        }
    }

    fn upsert(&mut self, report: &mut SyncReport) -> Result<(), SshConfigError> {
        self.remove_shadowed();

        let entries: Vec<(String, String)> = self
            .desired_entries()
            .into_iter()
            .map(|(alias, ws)| {
                let address = if ws.dns.trim().is_empty() {
                    alias.clone()
                } else {
                    ws.dns.clone()
                };
                (alias, address)
            })
            .collect();
        let desired: HashSet<&str> = entries.iter().map(|(a, _)| a.as_str()).collect();

        // Ports of managed entries that stay as they are must not be reused
        let mut used: BTreeSet<u16> = self
            .document
            .blocks()
            .iter()
            .filter(|b| self.is_managed(b) && !desired.contains(b.alias()))
            .filter_map(|b| b.directive("Port").and_then(parse_port))
            .collect();

        // Ports recorded on disk belong to the first entry that holds them
        let mut recorded: HashMap<String, u16> = HashMap::new();
        for block in self.document.blocks() {
            if !self.is_managed(block) || !desired.contains(block.alias()) {
                continue;
            }
            if let Some(port) = block.directive("Port").and_then(parse_port) {
                if used.insert(port) {
                    recorded.insert(block.alias().to_string(), port);
                }
            }
        }

        for (alias, address) in &entries {
            let existing = self.document.position(|b| b.alias() == alias);

            if let Some(idx) = existing {
                if !self.is_managed(&self.document.blocks()[idx]) {
                    tracing::warn!(
                        "Alias '{}' is used by a hand-written SSH entry, not managing it",
                        alias
                    );
                    report.skipped.push(alias.clone());
                    continue;
                }
            }

            let preferred = recorded.get(alias).copied();
            if let Some(own) = preferred {
                used.remove(&own);
            }
            let port = allocate_port(&mut used, preferred, self.port_base)?;

            let spec = ManagedEntrySpec {
                alias: alias.clone(),
                address: address.clone(),
                identity_file: self.private_key_path.clone(),
                user: self.user.clone(),
                port,
            };

            match existing {
                Some(idx) => {
                    let current = &self.document.blocks()[idx];
                    if entry_matches(current, &spec) {
                        report.unchanged.push(alias.clone());
                    } else {
                        let trivia = current.trailing_trivia().to_vec();
                        self.document
                            .replace(idx, build_entry(&spec).with_trailing(&trivia));
                        tracing::info!("Updated SSH entry '{}' (port {})", alias, port);
                        report.updated.push(alias.clone());
                    }
                }
                None => {
                    let index = self.insertion_point();
                    self.document.insert(index, build_entry(&spec));
                    tracing::info!("Added SSH entry '{}' (port {})", alias, port);
                    report.added.push(alias.clone());
                }
            }
        }

        Ok(())
    }

    /// Where new entries go: before the first hand-written catch-all
    ///
    /// ssh takes the first value it finds for an option, so a `Host *` or
    /// `Match` section above a managed entry would override its settings.
    fn insertion_point(&self) -> usize {
        self.document
            .position(|b| b.is_catch_all() && !self.is_managed(b))
            .unwrap_or(self.document.blocks().len())
    }

    fn persist(&mut self, report: &mut SyncReport) -> Result<(), SshConfigError> {
        let text = self.document.to_string();
        if text == self.persisted {
            tracing::debug!("SSH config already up to date");
            return Ok(());
        }

        self.store.write_ssh_config(&text)?;
        self.persisted = text;
        report.written = true;
        Ok(())
    }
}

/// Managed and addressable: an entry without an alias is left alone
fn owns(classifier: &dyn HostClassifier, block: &HostBlock) -> bool {
    if !classifier.is_managed(block) {
        return false;
    }
    match block.require_alias() {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!("{}, treating it as hand-written", e);
            false
        }
    }
}
