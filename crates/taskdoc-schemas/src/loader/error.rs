//! Error types for schema loading operations
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Everything that can go wrong between locating a schema and holding a
/// compiled validator for it.
///
/// None of these are per-record problems: a schema that cannot be loaded makes
/// every validation meaningless, so callers propagate them.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Schema file does not exist
    #[error("Schema file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// File I/O errors
    #[error("Failed to read file '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML file '{}': {source}", path.display())]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON file '{}': {source}", path.display())]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Unsupported file format
    #[error("Unsupported file format for '{}'. Expected .yaml, .yml, or .json", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Parsed document is not usable as a schema
    #[error("Invalid schema '{}': {reason}", path.display())]
    InvalidSchema { path: PathBuf, reason: String },

    /// The JSON Schema engine rejected the schema
    #[error("Failed to compile schema '{source_name}': {reason}")]
    CompileError { source_name: String, reason: String },
}

impl LoaderError {
    /// Create a not-found error
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an I/O error with path context
    pub fn io_error(path: PathBuf, error: std::io::Error) -> Self {
        Self::IoError {
            path,
            source: error,
        }
    }

    /// Create a YAML parsing error with path context
    pub fn yaml_parse_error(path: PathBuf, error: serde_yaml::Error) -> Self {
        Self::YamlParseError {
            path,
            source: error,
        }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: PathBuf, error: serde_json::Error) -> Self {
        Self::JsonParseError {
            path,
            source: error,
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: PathBuf) -> Self {
        Self::UnsupportedFormat { path }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            path,
            reason: reason.into(),
        }
    }

    /// Create a compile error
    pub fn compile_error(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CompileError {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Path of the schema involved, when there is one on disk
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound { path }
            | Self::IoError { path, .. }
            | Self::YamlParseError { path, .. }
            | Self::JsonParseError { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::InvalidSchema { path, .. } => Some(path),
            Self::CompileError { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = LoaderError::not_found(PathBuf::from("docs/templates/task-schema.json"));
        assert_eq!(
            err.to_string(),
            "Schema file not found: docs/templates/task-schema.json"
        );
        assert!(err.path().is_some());
    }

    #[test]
    fn test_compile_error_has_no_path() {
        let err = LoaderError::compile_error("<bundled>", "bad keyword");
        assert!(err.to_string().contains("bad keyword"));
        assert!(err.path().is_none());
    }
}
