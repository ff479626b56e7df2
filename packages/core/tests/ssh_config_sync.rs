//! End-to-end reconciliation scenarios against in-memory and on-disk configs

use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;
use wsctl_core::sshconfig::{
    ConfigDocument, FileSshConfigStore, MemorySshConfigStore, SshConfigStore, create_config_entry,
    hostname_from_str, is_active_host, is_managed_host,
};
use wsctl_core::{SshConfigError, SshConfigurer, Workspace, WorkspaceStatus};

const KEY: &str = "/home/dev/.config/wsctl/wsctl.pem";

const HAND_WRITTEN: &str = "# personal hosts\n\
Host github.com\n\
  User git\n\
  IdentityFile ~/.ssh/id_ed25519\n\
\n\
Host *\n\
  ServerAliveInterval 30\n";

fn running(id: &str, dns: &str) -> Workspace {
    Workspace::new(id, id, dns, WorkspaceStatus::Running)
}

fn managed(alias: &str, port: u16) -> String {
    format!("Host {alias}\n  Hostname {alias}\n  IdentityFile {KEY}\n  User ubuntu\n  Port {port}\n")
}

fn managed_ports(doc: &ConfigDocument) -> Vec<u16> {
    doc.blocks()
        .iter()
        .filter(|b| is_managed_host(b, KEY))
        .filter_map(|b| b.directive("Port").and_then(|p| p.parse().ok()))
        .collect()
}

fn hand_written_blocks(doc: &ConfigDocument) -> Vec<String> {
    doc.blocks()
        .iter()
        .filter(|b| !is_managed_host(b, KEY))
        .map(|b| b.to_string())
        .collect()
}

#[test]
fn produced_documents_round_trip() {
    let store = MemorySshConfigStore::new(HAND_WRITTEN);
    let mut configurer = SshConfigurer::new(
        vec![running("a", "alpha.wsctl.dev"), running("b", "beta.wsctl.dev")],
        &store,
        KEY,
    )
    .unwrap();
    configurer.config().unwrap();

    let text = store.contents();
    assert_eq!(ConfigDocument::parse(&text).to_string(), text);
}

#[test]
fn reconcile_twice_is_byte_identical() {
    let store = MemorySshConfigStore::new(HAND_WRITTEN);
    let workspaces = vec![running("a", "alpha.wsctl.dev"), running("b", "beta.wsctl.dev")];

    SshConfigurer::new(workspaces.clone(), &store, KEY)
        .unwrap()
        .config()
        .unwrap();
    let first = store.contents();

    let report = SshConfigurer::new(workspaces, &store, KEY)
        .unwrap()
        .config()
        .unwrap();

    assert_eq!(store.contents(), first);
    assert!(!report.written);
    assert!(!report.has_changes());
    assert_eq!(store.write_count(), 1);
}

#[test]
fn hand_written_blocks_survive_in_order() {
    let initial = format!(
        "{HAND_WRITTEN}{}Host jump\n  HostName 10.0.0.1\n{}",
        managed("stale", 2222),
        managed("alpha.wsctl.dev", 2223)
    );
    let store = MemorySshConfigStore::new(initial.as_str());
    let before = hand_written_blocks(&ConfigDocument::parse(&initial));

    let mut configurer =
        SshConfigurer::new(vec![running("a", "alpha.wsctl.dev")], &store, KEY).unwrap();
    let report = configurer.config().unwrap();

    let after = ConfigDocument::parse(&store.contents());
    assert_eq!(hand_written_blocks(&after), before);
    assert!(store.contents().starts_with("# personal hosts\n"));
    assert_eq!(report.pruned, vec!["stale"]);
    assert_eq!(report.unchanged, vec!["alpha.wsctl.dev"]);
}

#[test]
fn managed_ports_are_unique_after_reconcile() {
    // Two managed entries already collide on 2222
    let initial = format!("{}{}", managed("a", 2222), managed("b", 2222));
    let store = MemorySshConfigStore::new(initial);
    let workspaces = vec![running("a", "a"), running("b", "b"), running("c", "c")];

    SshConfigurer::new(workspaces, &store, KEY)
        .unwrap()
        .config()
        .unwrap();

    let ports = managed_ports(&ConfigDocument::parse(&store.contents()));
    let unique: BTreeSet<u16> = ports.iter().copied().collect();
    assert_eq!(ports.len(), 3);
    assert_eq!(unique.len(), 3);
    assert_eq!(ports[0], 2222);
}

#[test]
fn ports_are_stable_across_runs() {
    let store = MemorySshConfigStore::new("");
    let workspaces = vec![running("a", "a"), running("b", "b"), running("c", "c")];

    SshConfigurer::new(workspaces.clone(), &store, KEY)
        .unwrap()
        .config()
        .unwrap();

    // "b" goes away; "a" and "c" must keep their ports, the next new one reuses the gap
    let next = vec![running("a", "a"), running("c", "c"), running("d", "d")];
    let mut configurer = SshConfigurer::new(next, &store, KEY).unwrap();
    configurer.config().unwrap();

    let port = |id: &str| {
        configurer
            .get_configured_workspace_port(&running(id, id))
            .unwrap()
    };
    assert_eq!(port("a"), 2222);
    assert_eq!(port("c"), 2224);
    assert_eq!(port("d"), 2223);
}

#[test]
fn prune_keeps_only_listed_workspace() {
    let initial = format!(
        "{HAND_WRITTEN}{}{}{}",
        managed("A", 2222),
        managed("B", 2223),
        managed("C", 2224)
    );
    let store = MemorySshConfigStore::new(initial);

    let mut configurer = SshConfigurer::new(vec![running("a", "A")], &store, KEY).unwrap();
    let report = configurer.prune_inactive_workspaces().unwrap();

    assert_eq!(report.pruned, vec!["B", "C"]);
    assert!(report.added.is_empty());
    assert_eq!(store.contents(), format!("{HAND_WRITTEN}{}", managed("A", 2222)));
}

#[test]
fn empty_workspace_list_removes_every_managed_block() {
    let initial = format!("{HAND_WRITTEN}{}{}", managed("A", 2222), managed("B", 2223));
    let store = MemorySshConfigStore::new(initial);

    SshConfigurer::new(Vec::new(), &store, KEY)
        .unwrap()
        .config()
        .unwrap();

    assert_eq!(store.contents(), HAND_WRITTEN);
}

#[test]
fn pruning_keeps_following_match_section_and_comment() {
    let tail = "\n# --- work servers ---\nMatch host *.corp\n  User alice\nHost mine\n  User me\n";
    let store = MemorySshConfigStore::new(format!("{}{tail}", managed("gone", 2222)));

    let report = SshConfigurer::new(Vec::new(), &store, KEY)
        .unwrap()
        .config()
        .unwrap();

    assert_eq!(report.pruned, vec!["gone"]);
    assert_eq!(store.contents(), tail);
}

#[test]
fn updating_entry_keeps_following_match_section() {
    let stale = format!("Host a\n  Hostname old.example\n  IdentityFile {KEY}\n  User ubuntu\n  Port 2222\n");
    let match_section = "Match host *.corp\n  User alice\n";
    let store = MemorySshConfigStore::new(format!("{stale}{match_section}"));

    let report = SshConfigurer::new(vec![running("a", "a")], &store, KEY)
        .unwrap()
        .config()
        .unwrap();

    assert_eq!(report.updated, vec!["a"]);
    assert_eq!(store.contents(), format!("{}{match_section}", managed("a", 2222)));
}

#[test]
fn pruning_keeps_section_comment_of_next_host() {
    let tail = "\n# --- personal ---\nHost mine\n  User me\n";
    let store = MemorySshConfigStore::new(format!("{}{tail}", managed("gone", 2222)));

    SshConfigurer::new(Vec::new(), &store, KEY)
        .unwrap()
        .config()
        .unwrap();

    assert_eq!(store.contents(), tail);
}

#[test]
fn new_entries_go_above_wildcard_defaults() {
    let initial = "Host mine\n  User me\n\n# defaults\nHost *\n  User root\n  Port 22\n";
    let store = MemorySshConfigStore::new(initial);

    SshConfigurer::new(vec![running("a", "a"), running("b", "b")], &store, KEY)
        .unwrap()
        .config()
        .unwrap();

    assert_eq!(
        store.contents(),
        format!(
            "Host mine\n  User me\n{}{}\n# defaults\nHost *\n  User root\n  Port 22\n",
            managed("a", 2222),
            managed("b", 2223)
        )
    );

    // Hand-written blocks keep their order and a second run changes nothing
    let report = SshConfigurer::new(vec![running("a", "a"), running("b", "b")], &store, KEY)
        .unwrap()
        .config()
        .unwrap();
    assert!(!report.written);
}

#[test]
fn classifier_scenarios() {
    let images = "Host workspace-images\n  Hostname workspace-images\n";
    let brev = "Host brev\n  Hostname brev\n";

    assert!(!is_active_host(images, &["brev"]));
    assert!(is_active_host(brev, &["brev"]));
    assert!(!is_active_host("", &["brev"]));
}

#[test]
fn guard_combinator() {
    assert_eq!(create_config_entry("foo", true, true), "foo");
    assert_eq!(create_config_entry("foo", true, false), "");
    assert_eq!(create_config_entry("foo", false, true), "");
    assert_eq!(create_config_entry("foo", false, false), "");
}

#[test]
fn alias_extraction() {
    assert_eq!(hostname_from_str(""), "");
    assert_eq!(hostname_from_str("\n"), "");
    assert_eq!(hostname_from_str("\n\n"), "");
    assert_eq!(
        hostname_from_str("Host workspace-images\n  Hostname workspace-images\n"),
        "workspace-images"
    );
}

#[test]
fn managed_ports_for_a_subset_of_aliases() {
    let initial = format!(
        "Host mine\n  Port 9000\n{}{}",
        managed("a", 2222),
        managed("b", 2223)
    );
    let store = MemorySshConfigStore::new(initial);
    let configurer =
        SshConfigurer::new(vec![running("a", "a"), running("b", "b")], &store, KEY).unwrap();

    let ports = configurer.get_managed_ports(&["a", "mine", "unknown"]);
    assert_eq!(ports, BTreeSet::from(["2222".to_string()]));
}

#[test]
fn unreconciled_workspace_is_not_configured() {
    let store = MemorySshConfigStore::new(managed("a", 2222));
    let configurer = SshConfigurer::new(vec![running("a", "a")], &store, KEY).unwrap();

    let err = configurer
        .get_configured_workspace_port(&running("z", "zulu"))
        .unwrap_err();
    assert!(matches!(err, SshConfigError::NotConfigured(alias) if alias == "zulu"));
}

#[test]
fn file_store_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".ssh").join("config");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, HAND_WRITTEN).unwrap();

    let store = FileSshConfigStore::new(&path);
    let mut configurer =
        SshConfigurer::new(vec![running("a", "alpha.wsctl.dev")], &store, KEY).unwrap();
    let report = configurer.config().unwrap();
    assert!(report.written);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# personal hosts\nHost github.com\n"));
    assert!(written.contains(&format!(
        "Host alpha.wsctl.dev\n  Hostname alpha.wsctl.dev\n  IdentityFile {KEY}\n  User ubuntu\n  Port 2222\n\nHost *\n"
    )));
    assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), HAND_WRITTEN);
    assert_eq!(store.read_ssh_config().unwrap(), written);
}

#[test]
fn failed_write_leaves_original_untouched() {
    let dir = TempDir::new().unwrap();
    // The config path is a directory, so the final rename cannot succeed
    let path = dir.path().join("config");
    fs::create_dir(&path).unwrap();

    let store = FileSshConfigStore::new(&path).with_backup(false);
    let result = store.write_ssh_config("Host a\n");
    assert!(matches!(result, Err(SshConfigError::WriteFailed { .. })));
    assert!(path.is_dir());
}
