//! All-or-nothing commit of a file's outputs.
//!
//! Contents are staged into temporary files created beside their targets;
//! targets are only replaced once every staged write has succeeded. Staged
//! files that are never persisted are removed when dropped.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// A set of staged writes awaiting [`Commit::persist`].
#[derive(Debug, Default)]
pub struct Commit {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl Commit {
    /// Creates an empty commit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `contents` to a temporary file next to `target`.
    ///
    /// If `target` already exists its permissions are carried over.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the temporary
    /// file cannot be written and synced.
    pub fn stage(&mut self, target: &Path, contents: &[u8]) -> io::Result<()> {
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        if let Ok(meta) = fs::metadata(target) {
            fs::set_permissions(tmp.path(), meta.permissions())?;
        }

        self.staged.push((tmp, target.to_path_buf()));
        Ok(())
    }

    /// Number of staged writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Returns true if nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Renames every staged file over its target, in staging order.
    ///
    /// Each rename is atomic but the sequence is not: if a later rename
    /// fails, targets renamed before it keep their new contents. Callers
    /// stage the file that is safe to land alone first.
    ///
    /// # Errors
    ///
    /// Returns the first rename failure. Files staged after the failing one
    /// are discarded.
    pub fn persist(self) -> io::Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (tmp, target) in self.staged {
            tmp.persist(&target).map_err(|e| e.error)?;
            written.push(target);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn nothing_is_visible_before_persist() {
        let dir = TempDir::new().expect("tempdir");
        let target = dir.path().join("a.ttl.headers");
        let mut commit = Commit::new();
        commit.stage(&target, b"{}").expect("stage");
        assert!(!target.exists());
        drop(commit);
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
    }

    #[test]
    fn persist_replaces_existing_targets() {
        let dir = TempDir::new().expect("tempdir");
        let first = dir.path().join("a.ttl");
        let second = dir.path().join("nested/a.ttl.headers");
        fs::write(&first, "old").expect("seed");

        let mut commit = Commit::new();
        commit.stage(&first, b"new").expect("stage first");
        commit.stage(&second, b"{}").expect("stage second");
        assert_eq!(commit.len(), 2);
        let written = commit.persist().expect("persist");

        assert_eq!(written, vec![first.clone(), second.clone()]);
        assert_eq!(fs::read_to_string(&first).expect("read"), "new");
        assert_eq!(fs::read_to_string(&second).expect("read"), "{}");
    }

    #[test]
    fn failed_rename_keeps_earlier_targets_and_drops_later_ones() {
        let dir = TempDir::new().expect("tempdir");
        let sidecar = dir.path().join("a.ttl.headers");
        let blocked = dir.path().join("a.ttl");

        let mut commit = Commit::new();
        commit.stage(&sidecar, b"{}").expect("stage sidecar");
        commit.stage(&blocked, b"rewritten").expect("stage description");
        // A non-empty directory cannot be replaced by a file rename.
        fs::create_dir(&blocked).expect("mkdir");
        fs::write(blocked.join("keep"), "x").expect("seed");

        assert!(commit.persist().is_err());
        assert_eq!(fs::read_to_string(&sidecar).expect("read"), "{}");
        assert!(blocked.is_dir());
        let leftovers = fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(leftovers, 2);
    }
}
