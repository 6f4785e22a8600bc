//! Error types for the taskdoc core library
//!
//! Record-level problems never surface here: they are collected into the
//! [`ValidationReport`](crate::types::ValidationReport). This enum covers the
//! failures that abort a whole operation.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::path::{Path, PathBuf};
use taskdoc_schemas::LoaderError;
use thiserror::Error;

/// Main error type for taskdoc operations
#[derive(Error, Debug)]
pub enum Error {
    /// The task schema could not be located, parsed or compiled
    #[error("Schema error: {0}")]
    Schema(#[from] LoaderError),

    /// The exclusion pattern did not produce a usable matcher
    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Reading or writing a document failed
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A task block could not be converted to or from YAML
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document does not have the expected shape
    #[error("Document error in '{}': {message}", path.display())]
    Document { path: PathBuf, message: String },
}

/// Result type alias for taskdoc operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an I/O error for a path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a YAML error
    pub fn yaml(message: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            message: message.into(),
            source,
        }
    }

    /// Create a document shape error
    pub fn document(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Document {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Whether this error came from the schema layer
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}
