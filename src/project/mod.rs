//! The in-memory project model.
//!
//! A [`Project`] owns the tasks and logs from the last aggregation and caches
//! the metrics derived from them. Assigning tasks or logs drops the cache; it
//! is rebuilt in full on the next [`Project::metrics`] call.

pub mod layout;
pub mod metrics;
pub mod service;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

pub use layout::ProjectFolder;
pub use metrics::{compute_metrics, ProjectMetrics};
pub use service::{DailyLogOutcome, ProjectEvent, ProjectService};

use crate::config::ProjectConfig;
use crate::daily_log::LogEntry;
use crate::task::Task;

/// Category label for tasks outside any `## ` section.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A project rooted at a directory of markdown files.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
    tasks: Vec<Task>,
    logs: Vec<LogEntry>,
    metrics: Option<ProjectMetrics>,
}

impl Project {
    /// Create an empty project; tasks and logs arrive with the first refresh.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Self {
            root: root.into(),
            config,
            tasks: Vec::new(),
            logs: Vec::new(),
            metrics: None,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.project_name
    }

    #[must_use]
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Logs, newest first.
    #[must_use]
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Replace all tasks and drop cached metrics.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.invalidate();
    }

    /// Replace all logs and drop cached metrics.
    pub fn set_logs(&mut self, logs: Vec<LogEntry>) {
        self.logs = logs;
        self.invalidate();
    }

    /// Drop cached metrics.
    pub fn invalidate(&mut self) {
        self.metrics = None;
    }

    /// Whether metrics are currently cached.
    #[must_use]
    pub fn has_cached_metrics(&self) -> bool {
        self.metrics.is_some()
    }

    /// Metrics for the current tasks and logs, computed on first access.
    pub fn metrics(&mut self) -> &ProjectMetrics {
        let (tasks, logs) = (&self.tasks, &self.logs);
        self.metrics
            .get_or_insert_with(|| compute_metrics(tasks, logs, Utc::now()))
    }

    /// Directory for one of the project folders, honouring `customFolders`.
    #[must_use]
    pub fn folder_path(&self, folder: ProjectFolder) -> PathBuf {
        self.root.join(self.config.folder_name(folder))
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        ProjectConfig::config_path(&self.root)
    }

    /// Tasks not yet completed, in aggregation order.
    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }

    /// Tasks grouped by file, each group in line order.
    #[must_use]
    pub fn tasks_by_file(&self) -> BTreeMap<&Path, Vec<&Task>> {
        let mut groups: BTreeMap<&Path, Vec<&Task>> = BTreeMap::new();
        for task in &self.tasks {
            groups.entry(task.file.as_path()).or_default().push(task);
        }
        groups
    }

    /// Tasks grouped by category; tasks without one fall under [`UNCATEGORIZED`].
    #[must_use]
    pub fn tasks_by_category(&self) -> BTreeMap<&str, Vec<&Task>> {
        let mut groups: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
        for task in &self.tasks {
            let key = task.category.as_deref().unwrap_or(UNCATEGORIZED);
            groups.entry(key).or_default().push(task);
        }
        groups
    }

    /// Find the task recorded at an addressing key.
    #[must_use]
    pub fn find_task(&self, file: &Path, line: usize) -> Option<&Task> {
        self.tasks.iter().find(|t| t.line == line && t.is_in(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn project() -> Project {
        Project::new("/p", ProjectConfig::default_for("Atlas"))
    }

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("A", false, "/p/tasks.md", 4).with_category("Backlog"),
            Task::new("B", true, "/p/tasks.md", 10).with_category("Done"),
            Task::new("C", false, "/p/STATUS.md", 9),
        ]
    }

    // =========================================================================
    // Metrics Cache Tests
    // =========================================================================

    #[test]
    fn test_metrics_are_cached_until_invalidated() {
        let mut project = project();
        project.set_tasks(tasks());
        assert!(!project.has_cached_metrics());

        assert_eq!(project.metrics().total_tasks, 3);
        assert!(project.has_cached_metrics());

        project.invalidate();
        assert!(!project.has_cached_metrics());
    }

    #[test]
    fn test_set_tasks_invalidates() {
        let mut project = project();
        project.set_tasks(tasks());
        assert_eq!(project.metrics().completed_tasks, 1);

        project.set_tasks(vec![Task::new("D", true, "/p/tasks.md", 1)]);
        assert!(!project.has_cached_metrics());
        assert_eq!(project.metrics().total_tasks, 1);
        assert_eq!(project.metrics().completed_tasks, 1);
    }

    #[test]
    fn test_set_logs_invalidates() {
        let mut project = project();
        assert_eq!(project.metrics().total_logs, 0);

        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        project.set_logs(vec![LogEntry::new(date, "/p/5-logs/2024-01-10.md")]);

        assert!(!project.has_cached_metrics());
        assert_eq!(project.metrics().total_logs, 1);
        assert_eq!(project.metrics().last_log_date, Some(date));
    }

    // =========================================================================
    // Query Tests
    // =========================================================================

    #[test]
    fn test_tasks_by_file_and_category() {
        let mut project = project();
        project.set_tasks(tasks());

        let by_file = project.tasks_by_file();
        assert_eq!(by_file[Path::new("/p/tasks.md")].len(), 2);
        assert_eq!(by_file[Path::new("/p/STATUS.md")].len(), 1);

        let by_category = project.tasks_by_category();
        assert_eq!(by_category["Backlog"][0].text, "A");
        assert_eq!(by_category[UNCATEGORIZED][0].text, "C");
    }

    #[test]
    fn test_pending_and_find() {
        let mut project = project();
        project.set_tasks(tasks());
        let pending: Vec<_> = project.pending_tasks().map(|t| t.text.as_str()).collect();
        assert_eq!(pending, vec!["A", "C"]);

        assert_eq!(
            project.find_task(Path::new("/p/tasks.md"), 10).map(|t| t.text.as_str()),
            Some("B")
        );
        assert!(project.find_task(Path::new("/p/tasks.md"), 11).is_none());
    }

    #[test]
    fn test_paths() {
        let mut config = ProjectConfig::default_for("Atlas");
        config
            .custom_folders
            .insert("research".to_string(), "notes".to_string());
        let project = Project::new("/p", config);

        assert_eq!(project.name(), "Atlas");
        assert_eq!(project.folder_path(ProjectFolder::Research), PathBuf::from("/p/notes"));
        assert_eq!(project.folder_path(ProjectFolder::Logs), PathBuf::from("/p/5-logs"));
        assert_eq!(
            project.config_path(),
            PathBuf::from("/p/.vscode/project-pilot.json")
        );
    }
}
