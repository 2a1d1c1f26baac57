//! File access for the markdown store.
//!
//! Everything that touches disk goes through [`FileStore`] so that the
//! aggregator and mutation engine can be driven by an in-memory store in
//! tests (see [`crate::testing::MockFileStore`]).

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".pilot-tmp";

/// Directories never descended into when listing markdown files.
pub fn default_ignore_dirs() -> HashSet<&'static str> {
    [
        ".git",
        ".hg",
        ".svn",
        ".vscode",
        ".idea",
        "node_modules",
        "target",
        "dist",
        "build",
        ".archive",
    ]
    .into_iter()
    .collect()
}

/// Abstraction over the file system holding the project.
///
/// Implementations must be safe to share between threads: reads of
/// different files are independent, and writes to different files may run
/// concurrently. No locking is promised for two writers on the same file.
pub trait FileStore: Send + Sync {
    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read file contents as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or can't be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write content to a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents can't be written.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Create a directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// List files under `dir` (recursively) whose path relative to `dir`
    /// matches any of `globs`. Results are sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if a glob is invalid or `dir` can't be read.
    fn list_files(&self, dir: &Path, globs: &[&str]) -> io::Result<Vec<PathBuf>>;
}

/// Compile a list of glob patterns into a single matcher.
///
/// # Errors
///
/// Returns an `InvalidInput` error naming the first bad pattern.
pub fn build_globset(globs: &[&str]) -> io::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in globs {
        let glob = Glob::new(pattern).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid glob '{pattern}': {e}"),
            )
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
}

/// [`FileStore`] backed by the local file system.
#[derive(Debug, Clone, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    /// Create a new local store.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn tmp_path_for(path: &Path) -> PathBuf {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(TMP_SUFFIX);
        PathBuf::from(tmp)
    }

    fn should_skip_dir(path: &Path, ignored: &HashSet<&str>) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| ignored.contains(name))
    }
}

impl FileStore for LocalFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // Temp file next to the target, then rename over it.
        let tmp_path = Self::tmp_path_for(path);
        if let Err(e) = fs::write(&tmp_path, content) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn list_files(&self, dir: &Path, globs: &[&str]) -> io::Result<Vec<PathBuf>> {
        let set = build_globset(globs)?;
        let ignored = default_ignore_dirs();

        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", dir.display()),
            ));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !(e.file_type().is_dir() && Self::should_skip_dir(e.path(), &ignored))
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                let rel = e.path().strip_prefix(dir).unwrap_or(e.path());
                set.is_match(rel)
            })
            .map(|e| e.into_path())
            .collect();

        files.sort();
        Ok(files)
    }
}
