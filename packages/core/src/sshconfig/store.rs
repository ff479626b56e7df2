//! SSH config file access
//!
//! Reads ~/.ssh/config and replaces it atomically: the new text goes to a
//! temporary file in the same directory which is then renamed over the
//! original, so a failed write never leaves a truncated config behind.

use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error::SshConfigError;

/// Where the SSH config text comes from and goes to
pub trait SshConfigStore {
    /// Current config text; a missing file reads as empty
    fn read_ssh_config(&self) -> Result<String, SshConfigError>;

    /// Replace the whole config with `contents`
    fn write_ssh_config(&self, contents: &str) -> Result<(), SshConfigError>;
}

/// The user's SSH config on disk
#[derive(Debug, Clone)]
pub struct FileSshConfigStore {
    path: PathBuf,
    backup: bool,
}

impl FileSshConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup: true,
        }
    }

    /// Builder pattern: toggle the `.bak` copy written before each replace
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup copy (`config.bak` next to `config`)
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".bak");
        self.path.with_file_name(name)
    }

    /// Follow a symlinked config (dotfile managers) so the link survives
    fn write_target(&self) -> PathBuf {
        match fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
            }
            _ => self.path.clone(),
        }
    }
}

impl SshConfigStore for FileSshConfigStore {
    fn read_ssh_config(&self) -> Result<String, SshConfigError> {
        if !self.path.exists() {
            tracing::debug!(
                "SSH config not found, starting empty: {}",
                self.path.display()
            );
            return Ok(String::new());
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| SshConfigError::read(&self.path, e))?;
        tracing::debug!(
            "Read {} bytes from {}",
            contents.len(),
            self.path.display()
        );
        Ok(contents)
    }

    fn write_ssh_config(&self, contents: &str) -> Result<(), SshConfigError> {
        let target = self.write_target();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        // Ensure .ssh directory exists with proper permissions
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| SshConfigError::write(&dir, e))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))
                    .map_err(|e| SshConfigError::write(&dir, e))?;
            }
        }

        if self.backup && target.exists() {
            let backup_path = self.backup_path();
            fs::copy(&target, &backup_path).map_err(|e| SshConfigError::write(&backup_path, e))?;
            tracing::debug!("Created SSH config backup: {}", backup_path.display());
        }

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| SshConfigError::write(&dir, e))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| SshConfigError::write(tmp.path(), e))?;

        // Keep the permissions of the file being replaced, 600 for a new one
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::metadata(&target)
                .map(|m| m.permissions())
                .unwrap_or_else(|_| fs::Permissions::from_mode(0o600));
            fs::set_permissions(tmp.path(), perms)
                .map_err(|e| SshConfigError::write(tmp.path(), e))?;
        }

        tmp.persist(&target)
            .map_err(|e| SshConfigError::write(&target, e.error))?;

        tracing::info!("Wrote SSH config to {}", target.display());
        Ok(())
    }
}

/// An SSH config held in memory
///
/// Used for dry runs: the result of a reconciliation can be inspected
/// without touching the real file.
#[derive(Debug, Default)]
pub struct MemorySshConfigStore {
    contents: RefCell<String>,
    writes: RefCell<usize>,
}

impl MemorySshConfigStore {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: RefCell::new(contents.into()),
            writes: RefCell::new(0),
        }
    }

    /// Text as of the last write
    pub fn contents(&self) -> String {
        self.contents.borrow().clone()
    }

    /// How many times the config was written
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl SshConfigStore for MemorySshConfigStore {
    fn read_ssh_config(&self) -> Result<String, SshConfigError> {
        Ok(self.contents())
    }

    fn write_ssh_config(&self, contents: &str) -> Result<(), SshConfigError> {
        *self.contents.borrow_mut() = contents.to_string();
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

impl<T: SshConfigStore + ?Sized> SshConfigStore for &T {
    fn read_ssh_config(&self) -> Result<String, SshConfigError> {
        (**self).read_ssh_config()
    }

    fn write_ssh_config(&self, contents: &str) -> Result<(), SshConfigError> {
        (**self).write_ssh_config(contents)
    }
}
