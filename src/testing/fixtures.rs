//! Test fixtures for creating reproducible project trees on disk.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory, removed when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::sample_project();
/// assert!(fixture.exists("tasks.md"));
/// // Directory is cleaned up when fixture goes out of scope
/// ```
pub struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create an empty directory.
    ///
    /// # Panics
    ///
    /// Panics if temporary directory creation fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a small initialized project: config, two task files and three
    /// daily logs with a two-day streak.
    ///
    /// # Panics
    ///
    /// Panics if file creation fails.
    #[must_use]
    pub fn sample_project() -> Self {
        let fixture = Self::empty();
        fixture.write(".vscode/project-pilot.json", Self::config_content());
        fixture.write("tasks.md", Self::tasks_content());
        fixture.write("STATUS.md", Self::status_content());
        fixture.write("5-logs/README.md", "# 5-logs\n\n");
        fixture.write("5-logs/2024-01-10.md", &Self::log_content("Jan 10, 2024"));
        fixture.write("5-logs/2024-01-09.md", &Self::log_content("Jan 9, 2024"));
        fixture.write("5-logs/2024-01-05.md", &Self::log_content("Jan 5, 2024"));
        fixture
    }

    /// Get the root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file relative to the root, creating parents.
    ///
    /// # Panics
    ///
    /// Panics if the write fails.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Read a file relative to the root.
    ///
    /// # Panics
    ///
    /// Panics if the read fails.
    #[must_use]
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path().join(relative)).expect("Failed to read fixture file")
    }

    #[must_use]
    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }

    fn config_content() -> &'static str {
        r#"{
  "version": "1.0.0",
  "projectName": "Sample",
  "customFolders": {},
  "preferences": {
    "autoCreateLogs": true,
    "taskAggregation": ["tasks.md", "STATUS.md"]
  }
}"#
    }

    fn tasks_content() -> &'static str {
        "# Tasks\n\n## Backlog\n- [ ] Draft outline\n- [ ] Collect sources\n\n## In Progress\n- [ ] Write chapter one\n\n## Done\n- [x] Project structure initialized\n"
    }

    fn status_content() -> &'static str {
        "# Sample Status\n\n## Tasks\n- [x] Kickoff meeting\n\n## Blockers\n- None\n"
    }

    fn log_content(human_date: &str) -> String {
        format!(
            "# Daily Log - {human_date}\n\n## Goals\n- [x] Morning review\n\n## Progress\n- Worked\n\n## Notes\n- \n\n## Tomorrow\n- [ ] Plan\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_project_layout() {
        let fixture = TestFixture::sample_project();
        assert!(fixture.exists(".vscode/project-pilot.json"));
        assert!(fixture.exists("tasks.md"));
        assert!(fixture.exists("5-logs/2024-01-05.md"));
        assert!(fixture.read("STATUS.md").starts_with("# Sample Status"));
    }

    #[test]
    fn test_empty_is_empty() {
        let fixture = TestFixture::empty();
        assert!(fixture.path().exists());
        assert!(!fixture.exists("tasks.md"));
    }
}
