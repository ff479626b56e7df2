//! SSH config text model
//!
//! Splits an SSH client config into a verbatim preamble and an ordered list
//! of stanzas opened by `Host` or `Match` lines. Every line is stored exactly as read, line terminator
//! included, so a document nobody touched serializes back byte-for-byte.
//! Blocks written by wsctl use a two-space indent.

use std::collections::BTreeSet;
use std::fmt;

use super::error::SshConfigError;

/// Indentation used for directive lines wsctl writes
pub const INDENT: &str = "  ";

/// A single `Host` or `Match` stanza
///
/// Holds the raw header line and every following line up to the next
/// header. Unknown directives, comments and blank lines are all kept.
/// `Match` sections have no alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBlock {
    alias: String,
    header: String,
    lines: Vec<String>,
    match_section: bool,
}

impl HostBlock {
    /// Build a block in canonical form from ordered key/value pairs
    pub fn from_directives<'a, I>(alias: &str, directives: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let lines = directives
            .into_iter()
            .map(|(key, value)| format!("{INDENT}{key} {value}\n"))
            .collect();

        Self {
            alias: alias.to_string(),
            header: format!("Host {alias}\n"),
            lines,
            match_section: false,
        }
    }

    /// Whether the stanza was opened by a `Match` line
    pub fn is_match(&self) -> bool {
        self.match_section
    }

    /// Host patterns of the header line, empty for `Match` sections
    pub fn patterns(&self) -> Vec<&str> {
        if self.match_section {
            return Vec::new();
        }
        split_directive(&self.header)
            .map(|(_, value)| {
                value
                    .split_whitespace()
                    .take_while(|p| !p.starts_with('#'))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the stanza applies to hosts in general rather than one alias
    ///
    /// True for `Match` sections and for `Host` lines whose positive patterns
    /// all contain a wildcard, such as `Host *` or `Host *.corp !bastion`.
    pub fn is_catch_all(&self) -> bool {
        if self.match_section {
            return true;
        }
        let mut positive = self
            .patterns()
            .into_iter()
            .filter(|p| !p.starts_with('!'))
            .peekable();
        positive.peek().is_some() && positive.all(|p| p.contains(['*', '?']))
    }

    /// The first pattern after the `Host` keyword (empty if there was none)
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The alias, or `ParseAmbiguous` if the `Host` line declared none
    pub fn require_alias(&self) -> Result<&str, SshConfigError> {
        if self.alias.is_empty() {
            Err(SshConfigError::ParseAmbiguous(self.header.trim().to_string()))
        } else {
            Ok(&self.alias)
        }
    }

    /// Raw lines following the header, as they appear in the file
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Key/value pairs of every directive line, comments and blanks skipped
    pub fn directives(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| split_directive(line))
    }

    /// Value of the first directive named `key` (case-insensitive)
    ///
    /// ssh uses the first value it sees for most options, so later duplicates
    /// are ignored here too.
    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Whether the stanza has no directives at all
    pub fn has_no_directives(&self) -> bool {
        self.directives().next().is_none()
    }

    /// Blank and comment lines at the end of the stanza
    pub fn trailing_trivia(&self) -> &[String] {
        let keep = self
            .lines
            .iter()
            .rposition(|line| split_directive(line).is_some())
            .map_or(0, |idx| idx + 1);
        &self.lines[keep..]
    }

    /// Detach the blank and comment lines at the end of the stanza
    pub fn take_trailing_trivia(&mut self) -> Vec<String> {
        let keep = self.lines.len() - self.trailing_trivia().len();
        self.lines.split_off(keep)
    }

    /// Append raw lines after the existing ones
    pub fn with_trailing(mut self, extra: &[String]) -> Self {
        self.extend_lines(extra);
        self
    }

    fn extend_lines(&mut self, extra: &[String]) {
        if !extra.is_empty() && !self.ends_with_newline() {
            if let Some(last) = self.lines.last_mut() {
                last.push('\n');
            } else {
                self.header.push('\n');
            }
        }
        self.lines.extend(extra.iter().cloned());
    }

    fn ends_with_newline(&self) -> bool {
        self.lines.last().unwrap_or(&self.header).ends_with('\n')
    }
}

impl fmt::Display for HostBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// A parsed SSH client config file
///
/// Mutated only by inserting, replacing or removing whole blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    preamble: String,
    blocks: Vec<HostBlock>,
}

impl ConfigDocument {
    /// Parse raw config text
    ///
    /// Text before the first `Host` or `Match` line becomes the preamble.
    /// Each such line opens a new block that runs until the next one.
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::default();

        for line in text.split_inclusive('\n') {
            if let Some(alias) = host_alias(line) {
                doc.blocks.push(HostBlock {
                    alias: alias.to_string(),
                    header: line.to_string(),
                    lines: Vec::new(),
                    match_section: false,
                });
                continue;
            }
            if is_match_line(line) {
                doc.blocks.push(HostBlock {
                    alias: String::new(),
                    header: line.to_string(),
                    lines: Vec::new(),
                    match_section: true,
                });
                continue;
            }

            match doc.blocks.last_mut() {
                Some(block) => block.lines.push(line.to_string()),
                None => doc.preamble.push_str(line),
            }
        }

        doc
    }

    /// Free text that precedes the first stanza
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// All blocks in document order
    pub fn blocks(&self) -> &[HostBlock] {
        &self.blocks
    }

    /// First block with the given alias
    pub fn find(&self, alias: &str) -> Option<&HostBlock> {
        self.blocks.iter().find(|b| b.alias == alias)
    }

    /// Index of the first block matching `pred`
    pub fn position<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&HostBlock) -> bool,
    {
        self.blocks.iter().position(pred)
    }

    /// Append a block at the end of the document
    pub fn push(&mut self, block: HostBlock) {
        self.blocks.push(block);
    }

    /// Insert a block before the one at `index`
    ///
    /// Blank and comment lines that end the previous block move below the
    /// new one, so a comment heading the block at `index` stays with it.
    pub fn insert(&mut self, index: usize, block: HostBlock) {
        if index >= self.blocks.len() {
            self.blocks.push(block);
            return;
        }
        let block = match index.checked_sub(1) {
            Some(prev) => {
                let trivia = self.blocks[prev].take_trailing_trivia();
                block.with_trailing(&trivia)
            }
            None => block,
        };
        self.blocks.insert(index, block);
    }

    /// Swap the block at `index` for a new one, returning the old block
    pub fn replace(&mut self, index: usize, block: HostBlock) -> HostBlock {
        std::mem::replace(&mut self.blocks[index], block)
    }

    /// Remove every block for which `pred` returns true
    ///
    /// Surviving blocks keep their relative order. Blank and comment lines
    /// ending a removed block stay in place, attached to whatever precedes
    /// it. Returns the removed blocks without those lines.
    pub fn remove_where<P>(&mut self, mut pred: P) -> Vec<HostBlock>
    where
        P: FnMut(usize, &HostBlock) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept: Vec<HostBlock> = Vec::with_capacity(self.blocks.len());
        for (idx, mut block) in std::mem::take(&mut self.blocks).into_iter().enumerate() {
            if !pred(idx, &block) {
                kept.push(block);
                continue;
            }

            let trivia = block.take_trailing_trivia();
            match kept.last_mut() {
                Some(prev) => prev.extend_lines(&trivia),
                None => {
                    if !self.preamble.is_empty() && !self.preamble.ends_with('\n') {
                        self.preamble.push('\n');
                    }
                    self.preamble.extend(trivia);
                }
            }
            removed.push(block);
        }
        self.blocks = kept;
        removed
    }

    /// Values of the `Port` directive for every block whose alias is listed
    ///
    /// Blocks without a `Port` directive contribute nothing.
    pub fn used_ports<S: AsRef<str>>(&self, aliases: &[S]) -> BTreeSet<String> {
        self.blocks
            .iter()
            .filter(|block| aliases.iter().any(|a| a.as_ref() == block.alias))
            .filter_map(|block| block.directive("Port"))
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preamble)?;
        let mut open_line = !self.preamble.is_empty() && !self.preamble.ends_with('\n');

        for block in &self.blocks {
            // A file without a trailing newline may get blocks appended to it
            if open_line {
                f.write_str("\n")?;
            }
            write!(f, "{block}")?;
            open_line = !block.ends_with_newline();
        }

        Ok(())
    }
}

/// Split one raw line into a directive key and value
///
/// Accepts `Key value` and `Key=value`. Surrounding double quotes are
/// stripped from the value. Returns `None` for blank lines and comments.
pub fn split_directive(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (key, rest) = match trimmed.find(|c: char| c.is_whitespace() || c == '=') {
        Some(idx) => trimmed.split_at(idx),
        None => (trimmed, ""),
    };
    let rest = rest.trim_start();
    let value = rest.strip_prefix('=').unwrap_or(rest).trim();

    Some((key, unquote(value)))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Alias declared by a `Host` line, or `None` if the line is not one
fn host_alias(line: &str) -> Option<&str> {
    let (key, value) = split_directive(line)?;
    if !key.eq_ignore_ascii_case("host") {
        return None;
    }
    Some(value.split_whitespace().next().unwrap_or(""))
}

/// Whether the line opens a `Match` section
fn is_match_line(line: &str) -> bool {
    split_directive(line).is_some_and(|(key, _)| key.eq_ignore_ascii_case("match"))
}

/// Extract the alias from the raw text of a stanza
///
/// Returns an empty string when no `Host` line is present.
pub fn hostname_from_str(text: &str) -> String {
    text.lines()
        .find_map(host_alias)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAND_WRITTEN: &str = "# personal hosts\n\nHost user-host\nHostname 172.0.0.0\n\n\
Host *.corp   # wildcard\n\tUser alice\n\tForwardAgent yes\n  # trailing note\nHost=tagged\n  Port=2200";

    #[test]
    fn parse_splits_preamble_and_blocks() {
        let doc = ConfigDocument::parse(HAND_WRITTEN);

        assert_eq!(doc.preamble(), "# personal hosts\n\n");
        let aliases: Vec<_> = doc.blocks().iter().map(|b| b.alias()).collect();
        assert_eq!(aliases, vec!["user-host", "*.corp", "tagged"]);
    }

    #[test]
    fn untouched_document_is_byte_identical() {
        let doc = ConfigDocument::parse(HAND_WRITTEN);
        assert_eq!(doc.to_string(), HAND_WRITTEN);
    }

    #[test]
    fn parse_of_empty_text_is_empty_document() {
        let doc = ConfigDocument::parse("");
        assert!(doc.blocks().is_empty());
        assert_eq!(doc.to_string(), "");
    }

    #[test]
    fn directives_are_case_insensitive_and_accept_equals() {
        let doc = ConfigDocument::parse(HAND_WRITTEN);
        let corp = doc.find("*.corp").unwrap();
        assert_eq!(corp.directive("user"), Some("alice"));
        assert_eq!(corp.directive("FORWARDAGENT"), Some("yes"));

        let tagged = doc.find("tagged").unwrap();
        assert_eq!(tagged.directive("Port"), Some("2200"));
    }

    #[test]
    fn split_directive_skips_comments_and_unquotes() {
        assert_eq!(split_directive("   # note"), None);
        assert_eq!(split_directive("\n"), None);
        assert_eq!(
            split_directive("  IdentityFile \"/tmp/my key.pem\"\n"),
            Some(("IdentityFile", "/tmp/my key.pem"))
        );
        assert_eq!(split_directive("Compression"), Some(("Compression", "")));
    }

    #[test]
    fn hostname_directive_is_not_a_host_line() {
        let doc = ConfigDocument::parse("Host a\n  HostName a.example.com\n");
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].directive("hostname"), Some("a.example.com"));
    }

    #[test]
    fn host_line_without_alias_has_empty_alias() {
        let doc = ConfigDocument::parse("Host\n  User nobody\n");
        assert_eq!(doc.blocks()[0].alias(), "");
        assert!(matches!(
            doc.blocks()[0].require_alias(),
            Err(SshConfigError::ParseAmbiguous(_))
        ));
    }

    #[test]
    fn trailing_trivia_covers_blank_and_comment_tail() {
        let doc = ConfigDocument::parse(HAND_WRITTEN);
        assert_eq!(doc.find("user-host").unwrap().trailing_trivia(), ["\n"]);
        assert_eq!(
            doc.find("*.corp").unwrap().trailing_trivia(),
            ["  # trailing note\n"]
        );
        assert!(doc.find("tagged").unwrap().trailing_trivia().is_empty());
    }

    #[test]
    fn appended_block_after_unterminated_line_starts_on_new_line() {
        let mut doc = ConfigDocument::parse("Host a\n  Port 2222");
        doc.push(HostBlock::from_directives("b", [("Port", "2223".to_string())]));
        assert_eq!(doc.to_string(), "Host a\n  Port 2222\nHost b\n  Port 2223\n");

        let mut doc = ConfigDocument::parse("# only a comment");
        doc.push(HostBlock::from_directives("b", [("Port", "2223".to_string())]));
        assert_eq!(doc.to_string(), "# only a comment\nHost b\n  Port 2223\n");
    }

    #[test]
    fn canonical_block_round_trips() {
        let block = HostBlock::from_directives(
            "ws",
            [
                ("Hostname", "ws.example.dev".to_string()),
                ("Port", "2222".to_string()),
            ],
        );
        let mut doc = ConfigDocument::default();
        doc.push(block.clone());

        let text = doc.to_string();
        assert_eq!(text, "Host ws\n  Hostname ws.example.dev\n  Port 2222\n");
        assert_eq!(ConfigDocument::parse(&text), doc);
        assert_eq!(ConfigDocument::parse(&text).to_string(), text);
    }

    #[test]
    fn used_ports_reads_only_listed_aliases() {
        let doc = ConfigDocument::parse(
            "Host a\n  Port 2222\nHost b\n  Port 2223\nHost c\n  User x\n",
        );
        let ports = doc.used_ports(&["a", "c", "missing"]);
        assert_eq!(ports.into_iter().collect::<Vec<_>>(), vec!["2222"]);
    }

    #[test]
    fn remove_where_keeps_relative_order() {
        let mut doc = ConfigDocument::parse("Host a\nHost b\nHost c\nHost d\n");
        let removed = doc.remove_where(|_, b| b.alias() == "b" || b.alias() == "d");

        assert_eq!(removed.len(), 2);
        assert_eq!(doc.to_string(), "Host a\nHost c\n");
    }

    #[test]
    fn with_trailing_keeps_lines_separate() {
        let block = HostBlock::from_directives("a", [("Port", "1".to_string())])
            .with_trailing(&["\n".to_string(), "# keep\n".to_string()]);
        assert_eq!(block.to_string(), "Host a\n  Port 1\n\n# keep\n");
    }

    #[test]
    fn match_line_opens_its_own_block() {
        let text = "Host a\n  Port 2222\n\n# corp\nMatch host *.corp\n  User alice\nHost b\n";
        let doc = ConfigDocument::parse(text);

        assert_eq!(doc.blocks().len(), 3);
        assert_eq!(doc.blocks()[0].trailing_trivia(), ["\n", "# corp\n"]);
        assert!(doc.blocks()[1].is_match());
        assert_eq!(doc.blocks()[1].alias(), "");
        assert_eq!(doc.blocks()[1].directive("User"), Some("alice"));
        assert_eq!(doc.to_string(), text);
    }

    #[test]
    fn catch_all_blocks() {
        let doc = ConfigDocument::parse(
            "Host *\nHost *.corp !bastion\nHost web-?? # pool\nHost a *.b\nHost a\nMatch all\n",
        );
        let flags: Vec<_> = doc.blocks().iter().map(|b| b.is_catch_all()).collect();
        assert_eq!(flags, vec![true, true, true, false, false, true]);
    }

    #[test]
    fn removed_block_leaves_trailing_comments_in_place() {
        let mut doc = ConfigDocument::parse(
            "# top\nHost gone\n  Port 1\n\n# --- personal ---\nHost mine\n  User me\n",
        );
        doc.remove_where(|_, b| b.alias() == "gone");
        assert_eq!(doc.to_string(), "# top\n\n# --- personal ---\nHost mine\n  User me\n");

        let mut doc = ConfigDocument::parse("Host keep\nHost gone\n  Port 1\n# note\nHost b\n");
        doc.remove_where(|_, b| b.alias() == "gone");
        assert_eq!(doc.to_string(), "Host keep\n# note\nHost b\n");
    }

    #[test]
    fn insert_keeps_heading_comment_with_following_block() {
        let mut doc = ConfigDocument::parse("Host mine\n  User me\n\n# defaults\nHost *\n  User x\n");
        doc.insert(1, HostBlock::from_directives("new", [("Port", "2222".to_string())]));
        assert_eq!(
            doc.to_string(),
            "Host mine\n  User me\nHost new\n  Port 2222\n\n# defaults\nHost *\n  User x\n"
        );

        doc.insert(9, HostBlock::from_directives("last", Vec::<(&str, String)>::new()));
        assert!(doc.to_string().ends_with("  User x\nHost last\n"));
    }

    #[test]
    fn hostname_from_str_handles_blank_input() {
        assert_eq!(hostname_from_str(""), "");
        assert_eq!(hostname_from_str("\n"), "");
        assert_eq!(hostname_from_str("\n\n"), "");
    }

    #[test]
    fn hostname_from_str_reads_declared_alias() {
        let stanza = "Host testtime-1bxl-brevdev.brev.sh\n  Hostname 0.0.0.0\n  \
IdentityFile /home/dev/.config/wsctl/wsctl.pem\n  User ubuntu\n  Port 2222\n\n";
        assert_eq!(hostname_from_str(stanza), "testtime-1bxl-brevdev.brev.sh");
    }
}
