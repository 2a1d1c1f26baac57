//! Line-addressed edits to task files.
//!
//! Every operation re-reads the file, changes exactly one line (or splices in
//! one new line) and writes the whole file back. Nothing is cached between
//! calls, and a task's `(file, line)` is trusted only as far as the current
//! content agrees with it: an out-of-range line is an addressing error, a
//! line that is no longer a checkbox is a format error, and in both cases
//! the file is not written.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::aggregate::parse_tasks;
use crate::error::{IoResultExt, PilotError, Result};
use crate::markdown::sections::split_lines;
use crate::markdown::{
    end_of_file, find_insertion_point, find_sections, parse_line, replace_text, toggle_mark,
};
use crate::store::FileStore;
use crate::task::Task;

/// Check text destined for a single checkbox line, returning it trimmed.
///
/// # Errors
///
/// [`PilotError::InvalidText`] if the text is blank or spans several lines.
pub fn validate_task_text(text: &str) -> Result<&str> {
    if text.contains(['\n', '\r']) {
        return Err(PilotError::invalid_text("task text must be a single line"));
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PilotError::invalid_text("task text is empty"));
    }
    Ok(trimmed)
}

/// Performs toggles, text edits and inserts through a [`FileStore`].
#[derive(Debug)]
pub struct MutationEngine<S: FileStore> {
    store: Arc<S>,
}

impl<S: FileStore> Clone for MutationEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FileStore> MutationEngine<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.store.read_to_string(path).with_path(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.store.write(path, content).with_path(path)
    }

    /// Map a 1-indexed line onto `content`, or fail with an addressing error.
    ///
    /// The empty segment after a terminating newline is not a line.
    fn line_index(path: &Path, content: &str, line: usize) -> Result<usize> {
        let line_count = end_of_file(content);
        if line == 0 || line > line_count {
            return Err(PilotError::addressing(path, line, line_count));
        }
        Ok(line - 1)
    }

    /// Copy `task` with state taken from the line now on disk.
    fn refreshed(task: &Task, parsed: &Task) -> Task {
        let mut updated = task.clone();
        updated.completed = parsed.completed;
        updated.text.clone_from(&parsed.text);
        updated.updated = Utc::now();
        updated
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Flip the checkbox on the task's line.
    ///
    /// Only the bracket character changes, so two toggles restore the line
    /// byte for byte. The returned task reflects the new state.
    ///
    /// # Errors
    ///
    /// - [`PilotError::Io`] if the file can't be read or written
    /// - [`PilotError::Addressing`] if the line is past the end of the file
    /// - [`PilotError::Format`] if the line is no longer a checkbox
    pub fn toggle_completion(&self, task: &Task) -> Result<Task> {
        let path = task.file.as_path();
        let content = self.read(path)?;
        let index = Self::line_index(path, &content, task.line)?;
        let mut lines = split_lines(&content);

        let toggled = toggle_mark(lines[index])
            .ok_or_else(|| PilotError::format(path, task.line, lines[index]))?;
        let parsed = parse_line(&toggled, path, task.line)
            .ok_or_else(|| PilotError::format(path, task.line, lines[index]))?;

        lines[index] = &toggled;
        self.write(path, &lines.join("\n"))?;

        debug!(
            "Toggled {}:{} to {}",
            path.display(),
            task.line,
            if parsed.completed { "done" } else { "open" }
        );
        Ok(Self::refreshed(task, &parsed))
    }

    /// Replace the text of the task's line, keeping its checkbox prefix.
    ///
    /// Equal text is accepted without writing.
    ///
    /// # Errors
    ///
    /// As [`toggle_completion`](Self::toggle_completion), plus
    /// [`PilotError::InvalidText`] for blank or multi-line text.
    pub fn edit_text(&self, task: &Task, new_text: &str) -> Result<Task> {
        let new_text = validate_task_text(new_text)?;
        let path = task.file.as_path();
        let content = self.read(path)?;
        let index = Self::line_index(path, &content, task.line)?;
        let mut lines = split_lines(&content);

        let current = parse_line(lines[index], path, task.line)
            .ok_or_else(|| PilotError::format(path, task.line, lines[index]))?;
        if current.text == new_text {
            debug!("Text unchanged at {}:{}", path.display(), task.line);
            return Ok(Self::refreshed(task, &current));
        }

        let edited = replace_text(lines[index], new_text)
            .ok_or_else(|| PilotError::format(path, task.line, lines[index]))?;
        let parsed = parse_line(&edited, path, task.line)
            .ok_or_else(|| PilotError::format(path, task.line, lines[index]))?;

        lines[index] = &edited;
        self.write(path, &lines.join("\n"))?;

        debug!("Edited {}:{}", path.display(), task.line);
        Ok(Self::refreshed(task, &parsed))
    }

    /// Insert `- [ ] <text>` at the end of `section`, or at end of file.
    ///
    /// Section lookup is case-insensitive. The returned task carries the
    /// 1-indexed inserted line and, when the section was found, its name as
    /// the category.
    ///
    /// # Errors
    ///
    /// [`PilotError::InvalidText`] for blank or multi-line text, or
    /// [`PilotError::Io`] if the file can't be read or written.
    pub fn insert_task(&self, path: &Path, text: &str, section: Option<&str>) -> Result<Task> {
        let text = validate_task_text(text)?;
        let content = self.read(path)?;

        let category = section.and_then(|name| {
            find_sections(&content)
                .remove(&name.trim().to_lowercase())
                .map(|s| s.name)
        });
        let index = find_insertion_point(&content, section);

        let task = Task::new(text, false, path, index + 1);
        let mut new_line = task.to_string();

        // CRLF files get a CRLF-terminated line. Appending after an
        // unterminated last line terminates that line instead.
        let mut lines = split_lines(&content);
        let terminated;
        if content.contains("\r\n") {
            if index < lines.len() {
                new_line.push('\r');
            } else if let Some(last) = lines.last_mut() {
                terminated = format!("{last}\r");
                *last = &terminated;
            }
        }
        lines.insert(index, &new_line);
        self.write(path, &lines.join("\n"))?;

        debug!("Inserted task at {}:{}", path.display(), index + 1);
        Ok(match category {
            Some(name) => task.with_category(name),
            None => task,
        })
    }

    /// Resolve an addressing key into a task from the file as it is now.
    ///
    /// # Errors
    ///
    /// [`PilotError::Io`], [`PilotError::Addressing`] or
    /// [`PilotError::Format`] as for the mutating operations.
    pub fn task_at(&self, path: &Path, line: usize) -> Result<Task> {
        let content = self.read(path)?;
        let index = Self::line_index(path, &content, line)?;
        let lines = split_lines(&content);

        parse_tasks(&content, path)
            .into_iter()
            .find(|t| t.line == line)
            .ok_or_else(|| PilotError::format(path, line, lines[index]))
    }
}
