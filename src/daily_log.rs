//! Daily log files.
//!
//! One file per day, named `YYYY-MM-DD.md`, structured by four `## `
//! sections. The file name is the date key used for sorting and streaks;
//! the title inside the file is cosmetic.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::markdown::{parse_line, section_name};
use crate::task::{Task, TaskId};

/// File name date format.
const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Human date format used in titles, e.g. `Jan 5, 2024`.
const TITLE_DATE_FORMAT: &str = "%b %-d, %Y";

/// Title prefix written by the template.
const TITLE_PREFIX: &str = "Daily Log - ";

// ============================================================================
// Log Sections
// ============================================================================

/// The sections of a daily log that carry structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSection {
    Goals,
    Progress,
    Notes,
    Tomorrow,
}

impl LogSection {
    /// Resolve a header name, case-insensitively.
    ///
    /// Unknown names return `None`; such sections are free-form prose.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "goals" => Some(Self::Goals),
            "progress" => Some(Self::Progress),
            "notes" => Some(Self::Notes),
            "tomorrow" => Some(Self::Tomorrow),
            _ => None,
        }
    }

    /// Header text used by the template.
    #[must_use]
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Goals => "Goals",
            Self::Progress => "Progress",
            Self::Notes => "Notes",
            Self::Tomorrow => "Tomorrow",
        }
    }

    /// Whether the section holds checkbox tasks rather than plain bullets.
    #[must_use]
    pub fn holds_tasks(&self) -> bool {
        matches!(self, Self::Goals | Self::Tomorrow)
    }
}

impl fmt::Display for LogSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

// ============================================================================
// Log Entry
// ============================================================================

/// A parsed daily log file.
///
/// Absent sections are empty vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub file: PathBuf,
    pub title: String,
    pub goals: Vec<Task>,
    pub progress: Vec<String>,
    pub notes: Vec<String>,
    pub tomorrow: Vec<Task>,
}

impl LogEntry {
    /// Create an empty entry for `date`.
    #[must_use]
    pub fn new(date: NaiveDate, file: impl Into<PathBuf>) -> Self {
        Self {
            date,
            file: file.into(),
            title: format_title(date),
            goals: Vec::new(),
            progress: Vec::new(),
            notes: Vec::new(),
            tomorrow: Vec::new(),
        }
    }

    /// Canonical file name for this entry's date.
    #[must_use]
    pub fn file_name(&self) -> String {
        format_file_name(self.date)
    }

    /// Number of goals ticked off.
    #[must_use]
    pub fn completed_goals(&self) -> usize {
        self.goals.iter().filter(|g| g.completed).count()
    }

    /// One-line summary, e.g. `2/3 goals, 4 progress items`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}/{} goals, {} progress items",
            self.completed_goals(),
            self.goals.len(),
            self.progress.len()
        )
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a daily log.
///
/// Goals and tomorrow items are checkbox tasks addressed into `file` by
/// their 1-indexed line. Progress and notes collect the text of `- ` bullets.
/// Blank lines, other headers and unknown sections are skipped.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use pilot::daily_log::parse_log;
/// use std::path::Path;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let content = "# Daily Log\n\n## Goals\n- [x] Ship parser\n\n## Progress\n- Wrote tests\n";
/// let log = parse_log(content, Path::new("5-logs/2024-01-10.md"), date);
///
/// assert_eq!(log.goals.len(), 1);
/// assert_eq!(log.goals[0].line, 4);
/// assert_eq!(log.progress, vec!["Wrote tests".to_string()]);
/// ```
#[must_use]
pub fn parse_log(content: &str, file: &Path, date: NaiveDate) -> LogEntry {
    let mut entry = LogEntry::new(date, file);
    let mut current: Option<(LogSection, &str)> = None;

    for (index, line) in content.split('\n').enumerate() {
        if let Some(name) = section_name(line) {
            current = LogSection::from_name(name).map(|s| (s, name));
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((section, heading)) = current else {
            continue;
        };

        if section.holds_tasks() {
            if !trimmed.starts_with("- [") {
                continue;
            }
            let Some(task) = parse_line(trimmed, file, index + 1) else {
                continue;
            };
            let task = task
                .with_id(TaskId::with_prefix("log-task"))
                .with_category(heading);
            match section {
                LogSection::Goals => entry.goals.push(task),
                _ => entry.tomorrow.push(task),
            }
        } else if let Some(item) = trimmed.strip_prefix("- ") {
            match section {
                LogSection::Progress => entry.progress.push(item.to_string()),
                _ => entry.notes.push(item.to_string()),
            }
        }
    }

    entry
}

// ============================================================================
// Dates and File Names
// ============================================================================

/// `YYYY-MM-DD.md`, zero-padded.
#[must_use]
pub fn format_file_name(date: NaiveDate) -> String {
    format!("{}.md", date.format(FILE_DATE_FORMAT))
}

/// Human rendering used in titles, e.g. `Jan 5, 2024`.
#[must_use]
pub fn format_human_date(date: NaiveDate) -> String {
    date.format(TITLE_DATE_FORMAT).to_string()
}

/// Title of a log entry, e.g. `Daily Log - Jan 5, 2024`.
#[must_use]
pub fn format_title(date: NaiveDate) -> String {
    format!("{TITLE_PREFIX}{}", format_human_date(date))
}

/// Derive the log date from a `YYYY-MM-DD.md` file name.
#[must_use]
pub fn date_from_file_name(path: &Path) -> Option<NaiveDate> {
    if path.extension().and_then(|e| e.to_str()) != Some("md") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, FILE_DATE_FORMAT).ok()
}

/// Derive the log date from a `# Daily Log - Jan 5, 2024` title.
///
/// Only the first H1 is considered.
#[must_use]
pub fn date_from_title(content: &str) -> Option<NaiveDate> {
    let title = content
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))?
        .trim();
    let human = title.strip_prefix(TITLE_PREFIX).unwrap_or(title).trim();
    NaiveDate::parse_from_str(human, "%b %d, %Y").ok()
}

// ============================================================================
// Templates
// ============================================================================

/// Canonical empty daily log.
#[must_use]
pub fn format_template(date: NaiveDate) -> String {
    format!(
        "# {}\n\n## Goals\n- [ ] \n\n## Progress\n- \n\n## Notes\n- \n\n## Tomorrow\n- [ ] \n",
        format_title(date)
    )
}

/// Render a daily log from a user template, or the built-in one.
///
/// `{{date}}` becomes the human date and `{{isoDate}}` becomes `YYYY-MM-DD`.
#[must_use]
pub fn render_template(custom: Option<&str>, date: NaiveDate) -> String {
    match custom {
        Some(template) => template
            .replace("{{date}}", &format_human_date(date))
            .replace("{{isoDate}}", &date.format(FILE_DATE_FORMAT).to_string()),
        None => format_template(date),
    }
}
