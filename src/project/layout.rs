//! On-disk layout of a project.
//!
//! A project root holds six numbered folders and three default markdown
//! files, all seeded from fixed templates by [`ProjectService::initialize`].
//!
//! [`ProjectService::initialize`]: crate::project::service::ProjectService::initialize

use std::fmt;

use chrono::NaiveDate;

/// Status file name.
pub const STATUS_FILE: &str = "STATUS.md";

/// Tasks file name.
pub const TASKS_FILE: &str = "tasks.md";

/// Timeline file name.
pub const TIMELINE_FILE: &str = "timeline.md";

/// Per-folder readme name; never treated as a daily log.
pub const README_FILE: &str = "README.md";

/// Default files created on initialization, in creation order.
pub const DEFAULT_FILES: [&str; 3] = [STATUS_FILE, TASKS_FILE, TIMELINE_FILE];

/// The fixed project folders, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectFolder {
    Planning,
    Research,
    Assets,
    Development,
    Deliverables,
    Logs,
}

impl ProjectFolder {
    /// All folders in display order.
    #[must_use]
    pub fn all() -> &'static [ProjectFolder] {
        &[
            ProjectFolder::Planning,
            ProjectFolder::Research,
            ProjectFolder::Assets,
            ProjectFolder::Development,
            ProjectFolder::Deliverables,
            ProjectFolder::Logs,
        ]
    }

    /// Key used in `customFolders`.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Research => "research",
            Self::Assets => "assets",
            Self::Development => "development",
            Self::Deliverables => "deliverables",
            Self::Logs => "logs",
        }
    }

    /// Numbered directory name used when no override is configured.
    #[must_use]
    pub fn default_dir_name(&self) -> &'static str {
        match self {
            Self::Planning => "0-planning",
            Self::Research => "1-research",
            Self::Assets => "2-assets",
            Self::Development => "3-development",
            Self::Deliverables => "4-deliverables",
            Self::Logs => "5-logs",
        }
    }

    /// Resolve a `customFolders` key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.key() == key)
    }
}

impl fmt::Display for ProjectFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Templates
// ============================================================================

/// Readme placed in each folder: its directory name as a title.
#[must_use]
pub fn folder_readme(dir_name: &str) -> String {
    let mut chars = dir_name.chars();
    let title: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("# {title}\n\n")
}

/// `STATUS.md` for a new project.
#[must_use]
pub fn status_template(project_name: &str) -> String {
    format!(
        "# {project_name} Status\n\n\
         ## Current Sprint\n**Goal:** \n\n**Progress:** \n\n\
         ## Tasks\n- [ ] \n\n\
         ## Blockers\n- \n\n\
         ## Next Steps\n- \n"
    )
}

/// `tasks.md` for a new project.
#[must_use]
pub fn tasks_template() -> &'static str {
    "# Tasks\n\n## Backlog\n- [ ] \n\n## In Progress\n- [ ] \n\n## Done\n- [x] Project structure initialized\n"
}

/// `timeline.md` for a new project created on `today`.
#[must_use]
pub fn timeline_template(today: NaiveDate) -> String {
    format!(
        "# Timeline\n\n\
         ## Milestones\n- [ ] Project setup complete\n- [ ] First deliverable ready\n\n\
         ## Timeline\n- {}: Project initialized\n",
        today.format("%Y-%m-%d")
    )
}

/// Content for one of the [`DEFAULT_FILES`].
///
/// Returns `None` for any other file name.
#[must_use]
pub fn default_file_content(file: &str, project_name: &str, today: NaiveDate) -> Option<String> {
    match file {
        STATUS_FILE => Some(status_template(project_name)),
        TASKS_FILE => Some(tasks_template().to_string()),
        TIMELINE_FILE => Some(timeline_template(today)),
        _ => None,
    }
}
