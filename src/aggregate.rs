//! Project-wide task and log aggregation.
//!
//! Aggregation only reads. A file that cannot be read is logged and
//! contributes nothing; the rest of the batch carries on.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::daily_log::{date_from_file_name, date_from_title, parse_log, LogEntry};
use crate::markdown::{parse_line, section_name};
use crate::project::layout::{ProjectFolder, README_FILE};
use crate::project::Project;
use crate::store::FileStore;
use crate::task::Task;

/// Glob for markdown files beneath the project root.
pub const MARKDOWN_GLOB: &str = "**/*.md";

/// Everything one aggregation pass produced.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub tasks: Vec<Task>,
    pub logs: Vec<LogEntry>,
    /// Task files attempted, in scan order
    pub files_scanned: usize,
    /// Files that could not be read
    pub files_failed: Vec<PathBuf>,
}

impl Aggregation {
    /// Counts for reporting.
    #[must_use]
    pub fn summary(&self) -> AggregationSummary {
        AggregationSummary {
            tasks: self.tasks.len(),
            logs: self.logs.len(),
            files_scanned: self.files_scanned,
            files_failed: self.files_failed.len(),
        }
    }
}

/// Counts from one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationSummary {
    pub tasks: usize,
    pub logs: usize,
    pub files_scanned: usize,
    pub files_failed: usize,
}

// ============================================================================
// Task Files
// ============================================================================

/// Collect the files scanned for tasks.
///
/// The explicit list (relative to `root`) comes first, then every markdown
/// file under `root` in sorted order. Duplicates are dropped, keeping the
/// first position. Explicit entries that do not exist are skipped.
#[must_use]
pub fn collect_task_files(store: &dyn FileStore, root: &Path, explicit: &[String]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for name in explicit {
        let path = root.join(name);
        if !store.exists(&path) {
            debug!("Skipping missing task file {}", path.display());
            continue;
        }
        if seen.insert(path.clone()) {
            files.push(path);
        }
    }

    match store.list_files(root, &[MARKDOWN_GLOB]) {
        Ok(found) => {
            for path in found {
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }
        Err(e) => warn!("Could not list markdown files under {}: {}", root.display(), e),
    }

    files
}

/// Extract every task from one file's content.
///
/// Each task's category is the enclosing `## ` section, if any.
///
/// # Example
///
/// ```
/// use pilot::aggregate::parse_tasks;
/// use std::path::Path;
///
/// let tasks = parse_tasks("# Tasks\n## Backlog\n- [ ] A\n", Path::new("tasks.md"));
/// assert_eq!(tasks[0].line, 3);
/// assert_eq!(tasks[0].category.as_deref(), Some("Backlog"));
/// ```
#[must_use]
pub fn parse_tasks(content: &str, file: &Path) -> Vec<Task> {
    let mut section: Option<&str> = None;
    let mut tasks = Vec::new();

    for (index, line) in content.split('\n').enumerate() {
        if let Some(name) = section_name(line) {
            section = Some(name);
            continue;
        }
        if let Some(task) = parse_line(line, file, index + 1) {
            tasks.push(match section {
                Some(name) => task.with_category(name),
                None => task,
            });
        }
    }

    tasks
}

/// Read and parse one file, returning `None` if it could not be read.
fn read_tasks(store: &dyn FileStore, file: &Path) -> Option<Vec<Task>> {
    match store.read_to_string(file) {
        Ok(content) => {
            let tasks = parse_tasks(&content, file);
            debug!("Parsed {} tasks from {}", tasks.len(), file.display());
            Some(tasks)
        }
        Err(e) => {
            warn!("Skipping {}: {}", file.display(), e);
            None
        }
    }
}

/// Parse tasks from each file in order and concatenate them.
#[must_use]
pub fn aggregate_tasks(store: &dyn FileStore, files: &[PathBuf]) -> Vec<Task> {
    files
        .iter()
        .filter_map(|file| read_tasks(store, file))
        .flatten()
        .collect()
}

// ============================================================================
// Logs
// ============================================================================

/// Parse every daily log directly inside `logs_dir`, newest first.
///
/// `README.md` is never a log. The date comes from the file name, or failing
/// that from the title; files with neither, and unreadable files, are skipped.
#[must_use]
pub fn collect_logs(store: &dyn FileStore, logs_dir: &Path) -> Vec<LogEntry> {
    if !store.exists(logs_dir) {
        debug!("No logs folder at {}", logs_dir.display());
        return Vec::new();
    }

    let files = match store.list_files(logs_dir, &["*.md"]) {
        Ok(files) => files,
        Err(e) => {
            warn!("Could not list logs in {}: {}", logs_dir.display(), e);
            return Vec::new();
        }
    };

    let mut logs: Vec<LogEntry> = files
        .iter()
        .filter(|f| f.parent() == Some(logs_dir))
        .filter(|f| f.file_name().and_then(|n| n.to_str()) != Some(README_FILE))
        .filter_map(|file| {
            let content = match store.read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping log {}: {}", file.display(), e);
                    return None;
                }
            };
            let Some(date) = date_from_file_name(file).or_else(|| date_from_title(&content)) else {
                warn!("Skipping {}: no date in file name or title", file.display());
                return None;
            };
            Some(parse_log(&content, file, date))
        })
        .collect();

    logs.sort_by(|a, b| b.date.cmp(&a.date));
    logs
}

// ============================================================================
// Whole Project
// ============================================================================

/// Aggregate tasks and logs for a project.
pub fn aggregate(store: &dyn FileStore, project: &Project) -> Aggregation {
    let root = project.root();
    let files = collect_task_files(store, root, &project.config().preferences.task_aggregation);

    let mut aggregation = Aggregation {
        files_scanned: files.len(),
        ..Aggregation::default()
    };

    for file in &files {
        match read_tasks(store, file) {
            Some(tasks) => aggregation.tasks.extend(tasks),
            None => aggregation.files_failed.push(file.clone()),
        }
    }

    aggregation.logs = collect_logs(store, &project.folder_path(ProjectFolder::Logs));

    debug!(
        "Aggregated {} tasks from {} files and {} logs",
        aggregation.tasks.len(),
        aggregation.files_scanned,
        aggregation.logs.len()
    );
    aggregation
}
