//! Pilot - markdown-backed project management
//!
//! A project is a directory of plain markdown files. Checkbox lines are
//! tasks, `5-logs/YYYY-MM-DD.md` files are daily logs, and this crate reads
//! them into a model, derives metrics, and edits task lines in place without
//! disturbing anything else in the file.
//!
//! # Architecture
//!
//! - [`markdown`] - Checkbox line codec and `## ` section index
//! - [`daily_log`] - Daily log parsing, file names and templates
//! - [`aggregate`] - Project-wide task and log collection
//! - [`project`] - Project model, metrics, layout and lifecycle service
//! - [`mutation`] - Line-addressed toggle, edit and insert
//! - [`store`] - File access ([`FileStore`], [`LocalFileStore`])
//! - [`config`] - Persisted `project-pilot.json`
//! - [`error`] - Error types
//! - [`testing`] - Test doubles and fixtures
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use pilot::{LocalFileStore, MutationEngine, ProjectService};
//!
//! let store = Arc::new(LocalFileStore::new());
//! let service = ProjectService::new(Arc::clone(&store));
//! let mut project = service.open(Path::new("."))?;
//!
//! println!("{} tasks", project.metrics().total_tasks);
//!
//! let engine = MutationEngine::new(store);
//! if let Some(task) = project.pending_tasks().next() {
//!     engine.toggle_completion(task)?;
//! }
//! # Ok::<(), pilot::PilotError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod daily_log;
pub mod error;
pub mod markdown;
pub mod mutation;
pub mod project;
pub mod store;
pub mod task;
pub mod testing;

// Re-export commonly used types
pub use error::{IoResultExt, PilotError, Result};

pub use aggregate::{aggregate, Aggregation, AggregationSummary};
pub use config::{Preferences, ProjectConfig};
pub use daily_log::{LogEntry, LogSection};
pub use mutation::MutationEngine;
pub use project::{
    compute_metrics, DailyLogOutcome, Project, ProjectEvent, ProjectFolder, ProjectMetrics,
    ProjectService,
};
pub use store::{FileStore, LocalFileStore};
pub use task::{Task, TaskId};

// Re-export testing types for convenience
pub use testing::MockFileStore;

// TestFixture is only available in test builds
#[cfg(test)]
pub use testing::TestFixture;
