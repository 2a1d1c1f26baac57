//! Project lifecycle: load, refresh, scaffold and daily logs.
//!
//! The service holds no "current project". Every call takes or returns an
//! explicit [`Project`]. Callers that want push notification can
//! [`subscribe`](ProjectService::subscribe) to a channel of [`ProjectEvent`]s;
//! nothing is sent when nobody listens.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::layout::{default_file_content, folder_readme, ProjectFolder, DEFAULT_FILES, README_FILE};
use super::Project;
use crate::aggregate::{aggregate, AggregationSummary};
use crate::config::{ProjectConfig, CONFIG_DIR};
use crate::daily_log::{format_file_name, render_template};
use crate::error::{IoResultExt, PilotError, Result};
use crate::store::FileStore;

/// Name used when the root has no usable final component.
const FALLBACK_NAME: &str = "project";

/// Something that happened to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEvent {
    Loaded { root: PathBuf },
    Initialized { root: PathBuf },
    Refreshed { root: PathBuf, summary: AggregationSummary },
    DailyLogCreated { path: PathBuf },
}

/// Result of [`ProjectService::ensure_daily_log`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyLogOutcome {
    /// The log was written from the template
    Created(PathBuf),
    /// A log for that date was already there and was left alone
    Existing(PathBuf),
}

impl DailyLogOutcome {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(path) | Self::Existing(path) => path,
        }
    }

    #[must_use]
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Default project name for a root directory.
#[must_use]
pub fn default_project_name(root: &Path) -> String {
    root.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}

/// Loads, scaffolds and refreshes projects over a [`FileStore`].
pub struct ProjectService<S: FileStore> {
    store: Arc<S>,
    subscribers: Mutex<Vec<UnboundedSender<ProjectEvent>>>,
}

impl<S: FileStore> ProjectService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// The store this service reads and writes through.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Register for events. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> UnboundedReceiver<ProjectEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn emit(&self, event: ProjectEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // =========================================================================
    // Load / Refresh
    // =========================================================================

    /// Load the project at `root` without aggregating.
    ///
    /// A missing config is created with defaults. A malformed config is
    /// reported and replaced by defaults in memory only; the file is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be read or a new one cannot be
    /// written.
    pub fn load(&self, root: &Path) -> Result<Project> {
        let store = self.store.as_ref();
        let name = default_project_name(root);

        let config = match ProjectConfig::load(store, root) {
            Ok(Some(config)) => config,
            Ok(None) => {
                let config = ProjectConfig::default_for(name);
                config.save(store, root)?;
                info!("Created default config at {}", ProjectConfig::config_path(root).display());
                config
            }
            Err(e @ PilotError::ConfigParse { .. }) => {
                warn!("{e}. Using default configuration.");
                ProjectConfig::default_for(name)
            }
            Err(e) => return Err(e),
        };

        for warning in config.validate() {
            warn!("Config: {warning}");
        }

        self.emit(ProjectEvent::Loaded {
            root: root.to_path_buf(),
        });
        Ok(Project::new(root, config))
    }

    /// Re-aggregate the project and replace its tasks and logs.
    pub fn refresh(&self, project: &mut Project) -> AggregationSummary {
        let aggregation = aggregate(self.store.as_ref(), project);
        let summary = aggregation.summary();

        project.set_tasks(aggregation.tasks);
        project.set_logs(aggregation.logs);

        debug!(
            "Refreshed {}: {} tasks, {} logs",
            project.root().display(),
            summary.tasks,
            summary.logs
        );
        self.emit(ProjectEvent::Refreshed {
            root: project.root().to_path_buf(),
            summary,
        });
        summary
    }

    /// Load and refresh in one step.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn open(&self, root: &Path) -> Result<Project> {
        let mut project = self.load(root)?;
        self.refresh(&mut project);
        Ok(project)
    }

    // =========================================================================
    // Scaffolding
    // =========================================================================

    /// Create the project structure at `root`.
    ///
    /// Writes every folder with its readme, the config and the default files,
    /// then today's log when `autoCreateLogs` is on. Existing default files
    /// and readmes are kept; the config is always rewritten with `name`.
    ///
    /// # Errors
    ///
    /// Returns an error on the first failed directory or file write.
    pub fn initialize(&self, root: &Path, name: &str, today: NaiveDate) -> Result<Project> {
        let store = self.store.as_ref();
        let name = name.trim();
        let name = if name.is_empty() {
            default_project_name(root)
        } else {
            name.to_string()
        };

        let config = ProjectConfig::default_for(&name);

        for folder in ProjectFolder::all() {
            let dir_name = config.folder_name(*folder);
            let dir = root.join(&dir_name);
            store.create_dir_all(&dir).with_path(&dir)?;
            self.write_if_absent(&dir.join(README_FILE), &folder_readme(&dir_name))?;
        }

        let config_dir = root.join(CONFIG_DIR);
        store.create_dir_all(&config_dir).with_path(&config_dir)?;
        config.save(store, root)?;

        for file in DEFAULT_FILES {
            if let Some(content) = default_file_content(file, &name, today) {
                self.write_if_absent(&root.join(file), &content)?;
            }
        }

        let mut project = Project::new(root, config);
        if project.config().preferences.auto_create_logs {
            self.ensure_daily_log(&project, today)?;
        }

        info!("Initialized project '{}' at {}", name, root.display());
        self.emit(ProjectEvent::Initialized {
            root: root.to_path_buf(),
        });
        self.refresh(&mut project);
        Ok(project)
    }

    fn write_if_absent(&self, path: &Path, content: &str) -> Result<bool> {
        if self.store.exists(path) {
            debug!("Keeping existing {}", path.display());
            return Ok(false);
        }
        self.store.write(path, content).with_path(path)?;
        Ok(true)
    }

    // =========================================================================
    // Daily Logs
    // =========================================================================

    /// Make sure the log for `date` exists, creating it from the template.
    ///
    /// Uses `preferences.logTemplate` when set. An existing log is never
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    pub fn ensure_daily_log(&self, project: &Project, date: NaiveDate) -> Result<DailyLogOutcome> {
        let path = project
            .folder_path(ProjectFolder::Logs)
            .join(format_file_name(date));

        if self.store.exists(&path) {
            return Ok(DailyLogOutcome::Existing(path));
        }

        let template = project.config().preferences.log_template.as_deref();
        self.store
            .write(&path, &render_template(template, date))
            .with_path(&path)?;

        info!("Created daily log {}", path.display());
        self.emit(ProjectEvent::DailyLogCreated { path: path.clone() });
        Ok(DailyLogOutcome::Created(path))
    }
}
