//! Persisted project configuration.
//!
//! One JSON file per project root, at `.vscode/project-pilot.json`. Field
//! names are camelCase on disk so existing project files stay readable.
//!
//! # Example project-pilot.json
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "projectName": "Atlas",
//!   "customFolders": { "logs": "journal" },
//!   "preferences": {
//!     "autoCreateLogs": true,
//!     "taskAggregation": ["tasks.md", "STATUS.md"],
//!     "logTemplate": "# {{date}}\n\n## Goals\n- [ ] \n"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{IoResultExt, PilotError, Result};
use crate::project::layout::ProjectFolder;
use crate::store::FileStore;

/// Directory holding the config file, relative to the project root.
pub const CONFIG_DIR: &str = ".vscode";

/// Config file name.
pub const CONFIG_FILE: &str = "project-pilot.json";

/// Config format version written by this crate.
pub const CONFIG_VERSION: &str = "1.0.0";

/// Files scanned for tasks first, before the markdown glob.
pub fn default_task_aggregation() -> Vec<String> {
    vec!["tasks.md".to_string(), "STATUS.md".to_string()]
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

/// User preferences stored alongside the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Create today's log when the project is initialized. Loading or
    /// opening an existing project never creates logs.
    #[serde(default = "default_true")]
    pub auto_create_logs: bool,

    /// Ordered file names (relative to the project root) scanned for tasks.
    #[serde(default = "default_task_aggregation")]
    pub task_aggregation: Vec<String>,

    /// Custom daily log template; `{{date}}` and `{{isoDate}}` are substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_template: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            auto_create_logs: true,
            task_aggregation: default_task_aggregation(),
            log_template: None,
        }
    }
}

/// Project configuration persisted as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub project_name: String,

    /// Overrides for the numbered folder names, keyed by folder key
    /// (`planning`, `research`, `assets`, `development`, `deliverables`, `logs`).
    #[serde(default)]
    pub custom_folders: BTreeMap<String, String>,

    #[serde(default)]
    pub preferences: Preferences,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::default_for("")
    }
}

impl ProjectConfig {
    /// Default configuration for a project named `name`.
    #[must_use]
    pub fn default_for(name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            project_name: name.into(),
            custom_folders: BTreeMap::new(),
            preferences: Preferences::default(),
        }
    }

    /// Get the config file path for a project
    #[must_use]
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load the config for `root`.
    ///
    /// Returns `Ok(None)` if there is no config file yet.
    ///
    /// # Errors
    ///
    /// [`PilotError::Io`] if the file exists but can't be read, and
    /// [`PilotError::ConfigParse`] if it is not valid config JSON.
    pub fn load(store: &dyn FileStore, root: &Path) -> Result<Option<Self>> {
        let path = Self::config_path(root);
        if !store.exists(&path) {
            return Ok(None);
        }

        let content = store.read_to_string(&path).with_path(&path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| PilotError::ConfigParse { path, source })
    }

    /// Load the config, falling back to a fresh default on any failure.
    ///
    /// Failures are logged; the file on disk is left alone.
    pub fn load_or_default(store: &dyn FileStore, root: &Path, name: &str) -> Self {
        match Self::load(store, root) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default_for(name),
            Err(e) => {
                warn!("{e}. Using default configuration.");
                Self::default_for(name)
            }
        }
    }

    /// Write the config as pretty JSON, creating `.vscode/` if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, store: &dyn FileStore, root: &Path) -> Result<()> {
        let path = Self::config_path(root);
        let json = serde_json::to_string_pretty(self)?;
        store.write(&path, &json).with_path(&path)
    }

    /// Directory name for a project folder, honouring `customFolders`.
    #[must_use]
    pub fn folder_name(&self, folder: ProjectFolder) -> String {
        self.custom_folders
            .get(folder.key())
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| folder.default_dir_name().to_string())
    }

    /// Check the config for values that will be ignored or misbehave.
    ///
    /// Returns human-readable warnings; an empty list means the config is clean.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.project_name.trim().is_empty() {
            warnings.push("projectName is empty".to_string());
        }

        for key in self.custom_folders.keys() {
            if ProjectFolder::from_key(key).is_none() {
                warnings.push(format!("customFolders: unknown folder key '{key}'"));
            }
        }

        for entry in &self.preferences.task_aggregation {
            let path = Path::new(entry);
            if path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
                warnings.push(format!(
                    "taskAggregation: '{entry}' points outside the project root"
                ));
            }
        }

        warnings
    }
}
