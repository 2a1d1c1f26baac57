//! In-memory test doubles.
//!
//! [`MockFileStore`] implements [`FileStore`] over a map of paths so the
//! aggregator, mutation engine and project service can be exercised without
//! touching disk, including read and write failures on chosen paths.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::{build_globset, default_ignore_dirs, FileStore};

#[derive(Debug, Default)]
struct MockState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
    unwritable: BTreeSet<PathBuf>,
    writes: Vec<PathBuf>,
}

impl MockState {
    fn has_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.keys().any(|f| f != path && f.starts_with(path))
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
    }
}

/// In-memory [`FileStore`].
///
/// # Example
///
/// ```
/// use pilot::store::FileStore;
/// use pilot::testing::MockFileStore;
/// use std::path::Path;
///
/// let store = MockFileStore::new().with_file("/p/tasks.md", "- [ ] A\n");
/// assert_eq!(store.read_to_string(Path::new("/p/tasks.md")).unwrap(), "- [ ] A\n");
/// assert!(store.exists(Path::new("/p")));
/// ```
#[derive(Debug, Default)]
pub struct MockFileStore {
    state: RwLock<MockState>,
}

impl MockFileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a single file.
    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        {
            let mut state = self.write_state();
            let path = path.as_ref().to_path_buf();
            state.add_parents(&path);
            state.files.insert(path, content.to_string());
        }
        self
    }

    /// Add an empty directory.
    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        {
            let mut state = self.write_state();
            let path = path.as_ref().to_path_buf();
            state.add_parents(&path);
            state.dirs.insert(path);
        }
        self
    }

    /// Make reads of `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn with_unreadable(self, path: impl AsRef<Path>) -> Self {
        self.write_state()
            .unreadable
            .insert(path.as_ref().to_path_buf());
        self
    }

    /// Make writes to `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn with_unwritable(self, path: impl AsRef<Path>) -> Self {
        self.write_state()
            .unwritable
            .insert(path.as_ref().to_path_buf());
        self
    }

    /// Current content of a file, if present.
    #[must_use]
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read_state().files.get(path.as_ref()).cloned()
    }

    /// Paths written so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<PathBuf> {
        self.read_state().writes.clone()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.read_state().writes.len()
    }

    /// Remove a file, simulating an external delete.
    pub fn remove(&self, path: impl AsRef<Path>) {
        self.write_state().files.remove(path.as_ref());
    }

    /// Overwrite a file without recording a write, simulating an external edit.
    pub fn replace(&self, path: impl AsRef<Path>, content: &str) {
        self.write_state()
            .files
            .insert(path.as_ref().to_path_buf(), content.to_string());
    }
}

fn permission_denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {}", path.display()),
    )
}

impl FileStore for MockFileStore {
    fn exists(&self, path: &Path) -> bool {
        let state = self.read_state();
        state.files.contains_key(path) || state.has_dir(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.read_state();
        if state.unreadable.contains(path) {
            return Err(permission_denied(path));
        }
        state.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut state = self.write_state();
        if state.unwritable.contains(path) {
            return Err(permission_denied(path));
        }
        state.add_parents(path);
        state.files.insert(path.to_path_buf(), content.to_string());
        state.writes.push(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.write_state();
        if state.unwritable.contains(path) {
            return Err(permission_denied(path));
        }
        state.add_parents(path);
        state.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn list_files(&self, dir: &Path, globs: &[&str]) -> io::Result<Vec<PathBuf>> {
        let set = build_globset(globs)?;
        let ignored = default_ignore_dirs();
        let state = self.read_state();

        if !state.has_dir(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", dir.display()),
            ));
        }

        Ok(state
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(dir).ok().map(|rel| (path, rel)))
            .filter(|(_, rel)| {
                // Directory components only; the file name itself is never skipped
                let mut parents = rel.components().collect::<Vec<_>>();
                parents.pop();
                !parents
                    .iter()
                    .any(|c| c.as_os_str().to_str().is_some_and(|n| ignored.contains(n)))
            })
            .filter(|(_, rel)| set.is_match(rel))
            .map(|(path, _)| path.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Read / Write Tests
    // =========================================================================

    #[test]
    fn test_read_write() {
        let store = MockFileStore::new();
        store.write(Path::new("/p/a.md"), "hello").unwrap();
        assert_eq!(store.read_to_string(Path::new("/p/a.md")).unwrap(), "hello");
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.writes(), vec![PathBuf::from("/p/a.md")]);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let store = MockFileStore::new();
        let err = store.read_to_string(Path::new("/nope.md")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_failure_injection() {
        let store = MockFileStore::new()
            .with_file("/p/a.md", "x")
            .with_unreadable("/p/a.md")
            .with_unwritable("/p/b.md");

        let read = store.read_to_string(Path::new("/p/a.md")).unwrap_err();
        assert_eq!(read.kind(), io::ErrorKind::PermissionDenied);

        let write = store.write(Path::new("/p/b.md"), "y").unwrap_err();
        assert_eq!(write.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_external_edits_are_not_counted() {
        let store = MockFileStore::new().with_file("/p/a.md", "one");
        store.replace("/p/a.md", "two");
        assert_eq!(store.content("/p/a.md").as_deref(), Some("two"));
        store.remove("/p/a.md");
        assert!(!store.exists(Path::new("/p/a.md")));
        assert_eq!(store.write_count(), 0);
    }

    // =========================================================================
    // Directory Tests
    // =========================================================================

    #[test]
    fn test_exists_for_implicit_and_explicit_dirs() {
        let store = MockFileStore::new()
            .with_file("/p/5-logs/2024-01-10.md", "")
            .with_dir("/p/2-assets");
        assert!(store.exists(Path::new("/p")));
        assert!(store.exists(Path::new("/p/5-logs")));
        assert!(store.exists(Path::new("/p/2-assets")));
        assert!(!store.exists(Path::new("/p/1-research")));
    }

    #[test]
    fn test_list_files_matches_globs_and_skips_ignored() {
        let store = MockFileStore::new()
            .with_file("/p/tasks.md", "")
            .with_file("/p/0-planning/plan.md", "")
            .with_file("/p/node_modules/x/README.md", "")
            .with_file("/p/2-assets/logo.png", "")
            .with_file("/other/tasks.md", "");

        let files = store.list_files(Path::new("/p"), &["**/*.md"]).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/p/0-planning/plan.md"),
                PathBuf::from("/p/tasks.md"),
            ]
        );
    }

    #[test]
    fn test_list_files_missing_dir() {
        let store = MockFileStore::new();
        let err = store.list_files(Path::new("/p"), &["*.md"]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
