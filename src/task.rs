//! Task value objects.
//!
//! A [`Task`] is a checkbox line lifted out of a markdown file. Its
//! `(file, line)` pair is the addressing key used to mutate the source and
//! is only valid until that file is written again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// Task Identifier
// ============================================================================

/// Opaque identifier generated when a task is parsed or inserted.
///
/// Ids embed a millisecond timestamp and a random suffix; they are unique
/// for the life of one aggregation pass but carry no meaning across passes.
///
/// # Example
///
/// ```
/// use pilot::TaskId;
///
/// let id = TaskId::generate();
/// assert!(id.as_str().starts_with("task-"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Create a new random task ID.
    #[must_use]
    pub fn generate() -> Self {
        Self::with_prefix("task")
    }

    /// Create a new random ID with a custom prefix (e.g. `log-task`).
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        let millis = Utc::now().timestamp_millis();
        let random = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{prefix}-{millis}-{}", &random[..9]))
    }

    /// Create a task ID from an existing string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Task
// ============================================================================

/// A checkbox task parsed from a markdown file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identity, regenerated on every parse
    pub id: TaskId,
    /// Text after the checkbox, trimmed
    pub text: String,
    /// Whether the checkbox is ticked
    pub completed: bool,
    /// File the task was read from
    pub file: PathBuf,
    /// 1-indexed line within `file`
    pub line: usize,
    /// Name of the enclosing `## ` section, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Task {
    /// Create a task with a freshly generated id.
    #[must_use]
    pub fn new(text: impl Into<String>, completed: bool, file: impl Into<PathBuf>, line: usize) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::generate(),
            text: text.into(),
            completed,
            file: file.into(),
            line,
            category: None,
            created: now,
            updated: now,
        }
    }

    /// Attach a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace the generated id.
    #[must_use]
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }

    /// Flip completion in memory. Does not touch the file.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.updated = Utc::now();
    }

    /// Replace the text in memory. Does not touch the file.
    pub fn update_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.updated = Utc::now();
    }

    /// Move the task to another line in memory.
    pub fn update_line(&mut self, line: usize) {
        self.line = line;
        self.updated = Utc::now();
    }

    /// Markdown checkbox prefix for the current state.
    #[must_use]
    pub fn checkbox(&self) -> &'static str {
        if self.completed {
            "- [x]"
        } else {
            "- [ ]"
        }
    }

    /// Check if the task lives in `path`.
    #[must_use]
    pub fn is_in(&self, path: &Path) -> bool {
        self.file == path
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.checkbox(), self.text)
    }
}
