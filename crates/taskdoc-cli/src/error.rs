//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from taskdoc-core library
    #[error("{0}")]
    Core(#[from] taskdoc_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// No task with the requested id
    #[error("Task {id} not found in {}", path.display())]
    TaskNotFound { id: String, path: PathBuf },

    /// A task block could not be added or removed
    #[error("{message}")]
    DocumentUnchanged { message: String },

    /// Validate-only pass found invalid tasks
    #[error("{count} task(s) failed validation")]
    ValidationFailed { count: usize },

    /// Some tasks still fail after fixing
    #[error("{count} task(s) could not be fixed")]
    FixesIncomplete { count: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 1,
            Self::FileNotFound { .. } => 2,
            Self::TaskNotFound { .. } => 2,
            Self::DocumentUnchanged { .. } => 3,
            Self::ValidationFailed { .. } => 4,
            Self::FixesIncomplete { .. } => 5,
            Self::Config(_) => 6,
            Self::Json(_) => 7,
            Self::Yaml(_) => 7,
        }
    }

    /// Whether the report explaining this error was already printed
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed { .. } | Self::FixesIncomplete { .. }
        )
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
