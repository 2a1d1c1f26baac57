//! Custom error types for Pilot.
//!
//! Errors are split the way callers need to react to them: an I/O failure
//! ("the file vanished") is distinct from a format failure ("the file changed
//! shape") and from an addressing failure ("the line no longer exists").

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for Pilot operations
#[derive(Error, Debug)]
pub enum PilotError {
    // =========================================================================
    // File Errors
    // =========================================================================
    /// Reading, writing or creating a path failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line that should hold a checkbox task no longer does
    #[error("Line {line} of {} is not a task line: {content:?}", path.display())]
    Format {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// A task's recorded line is outside the file's current bounds
    #[error("Line {line} is out of bounds for {} ({line_count} lines)", path.display())]
    Addressing {
        path: PathBuf,
        line: usize,
        line_count: usize,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Persisted project config is not valid JSON for the expected shape
    #[error("Malformed project config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Task text rejected before touching any file
    #[error("Invalid task text: {reason}")]
    InvalidText { reason: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PilotError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create an I/O error tagged with the offending path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a format error for a line that is not a checkbox
    pub fn format(path: impl Into<PathBuf>, line: usize, content: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            line,
            content: content.into(),
        }
    }

    /// Create an addressing error for an out-of-bounds line
    pub fn addressing(path: impl Into<PathBuf>, line: usize, line_count: usize) -> Self {
        Self::Addressing {
            path: path.into(),
            line,
            line_count,
        }
    }

    /// Create an invalid text error
    pub fn invalid_text(reason: impl Into<String>) -> Self {
        Self::InvalidText {
            reason: reason.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::Format { path, .. }
            | Self::Addressing { path, .. }
            | Self::ConfigParse { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Check if the file contents changed since the task was captured.
    ///
    /// Both format and addressing failures mean the caller holds stale task
    /// references and should re-aggregate before retrying.
    pub fn is_stale_reference(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::Addressing { .. })
    }

    /// Check if this error came from the storage layer
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } => 2,
            Self::Format { .. } => 3,
            Self::Addressing { .. } => 4,
            Self::ConfigParse { .. } => 5,
            Self::InvalidText { .. } => 6,
            _ => 1,
        }
    }
}

/// Type alias for Pilot results
pub type Result<T> = std::result::Result<T, PilotError>;

/// Extension trait for tagging I/O results with the path they touched
pub trait IoResultExt<T> {
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| PilotError::io(path, e))
    }
}
