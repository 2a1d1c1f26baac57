//! Checkbox line codec.
//!
//! Recognises lines of the form `<indent>- [ ] text` / `<indent>- [x] text`
//! and offers in-place edits that touch only the bracket character or only
//! the text, leaving everything else on the line byte-identical.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::task::Task;

static CHECKBOX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)-\s+\[(?P<mark>[ xX])\]\s+(?P<text>.+)$")
        .expect("checkbox regex is valid")
});

// ============================================================================
// Checkbox Matching
// ============================================================================

/// Match a checkbox line, returning captures only when the text is not blank.
fn captures(line: &str) -> Option<Captures<'_>> {
    CHECKBOX_RE
        .captures(line)
        .filter(|caps| !caps["text"].trim().is_empty())
}

/// Parse checkbox mark into a completion flag.
///
/// `x` and `X` are complete, anything else is not.
#[must_use]
pub fn is_checked_mark(mark: &str) -> bool {
    mark.eq_ignore_ascii_case("x")
}

/// Check whether a line is a checkbox task line.
///
/// # Example
///
/// ```
/// use pilot::markdown::task_line::is_task_line;
///
/// assert!(is_task_line("  - [X] Review PR"));
/// assert!(!is_task_line("- [y] Not a checkbox"));
/// assert!(!is_task_line("- [ ] "));
/// ```
#[must_use]
pub fn is_task_line(line: &str) -> bool {
    captures(line).is_some()
}

// ============================================================================
// Parse / Serialize
// ============================================================================

/// Parse a single line into a task.
///
/// Returns `None` for anything that is not a checkbox line. The task text is
/// trimmed; its interior is kept verbatim.
///
/// # Example
///
/// ```
/// use pilot::markdown::task_line::parse_line;
/// use std::path::Path;
///
/// let task = parse_line("  - [x]  Ship v1.0 ", Path::new("tasks.md"), 4).unwrap();
/// assert!(task.completed);
/// assert_eq!(task.text, "Ship v1.0");
/// assert_eq!(task.line, 4);
/// ```
#[must_use]
pub fn parse_line(line: &str, file: &Path, line_number: usize) -> Option<Task> {
    let caps = captures(line)?;
    let completed = is_checked_mark(&caps["mark"]);
    Some(Task::new(caps["text"].trim(), completed, file, line_number))
}

/// Serialize a task as a canonical checkbox line without indentation.
#[must_use]
pub fn serialize_line(task: &Task) -> String {
    format!("{} {}", task.checkbox(), task.text)
}

// ============================================================================
// In-place Edits
// ============================================================================

/// Flip the bracket character of a checkbox line.
///
/// A space becomes `x`; `x` or `X` becomes a space. Indentation, spacing and
/// text are untouched. Returns `None` if the line is not a checkbox.
#[must_use]
pub fn toggle_mark(line: &str) -> Option<String> {
    let caps = captures(line)?;
    let mark = caps.name("mark")?;
    let flipped = if is_checked_mark(mark.as_str()) { " " } else { "x" };

    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..mark.start()]);
    out.push_str(flipped);
    out.push_str(&line[mark.end()..]);
    Some(out)
}

/// Replace the text portion of a checkbox line.
///
/// Everything up to and including the whitespace after `]` is kept, as is a
/// trailing carriage return. Returns `None` if the line is not a checkbox.
#[must_use]
pub fn replace_text(line: &str, new_text: &str) -> Option<String> {
    let caps = captures(line)?;
    let text = caps.name("text")?;

    let mut out = String::with_capacity(text.start() + new_text.len() + 1);
    out.push_str(&line[..text.start()]);
    out.push_str(new_text);
    if line.ends_with('\r') {
        out.push('\r');
    }
    Some(out)
}
