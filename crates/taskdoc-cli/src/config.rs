//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables
//! - Command-line arguments

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskdoc_core::{CHANGELOG_FILE, TODO_FILE};
use taskdoc_schemas::SchemaLoader;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path settings
    pub paths: PathConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

/// Path configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Task document
    pub todo: PathBuf,

    /// Changelog completed tasks are moved to
    pub changelog: PathBuf,

    /// Task schema, overriding the environment and project template
    pub schema: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            todo: PathBuf::from(TODO_FILE),
            changelog: PathBuf::from(CHANGELOG_FILE),
            schema: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::config(format!(
                    "unsupported config format: {}",
                    path.display()
                )))
            }
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".taskdoc.yaml"),
            PathBuf::from(".taskdoc.json"),
            PathBuf::from("taskdoc.yaml"),
            PathBuf::from("taskdoc.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let taskdoc_dir = config_dir.join("taskdoc");
            paths.push(taskdoc_dir.join("config.yaml"));
            paths.push(taskdoc_dir.join("config.json"));
        }

        paths
    }

    /// Task document, preferring an explicit path
    pub fn todo_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.paths.todo.clone())
    }

    /// Changelog, preferring an explicit path
    pub fn changelog_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.paths.changelog.clone())
    }

    /// Schema loader: explicit path, then config, then environment,
    /// project template and bundled schema
    pub fn schema_loader(&self, explicit: Option<&Path>) -> SchemaLoader {
        match explicit.or(self.paths.schema.as_deref()) {
            Some(path) => SchemaLoader::from_path(path),
            None => SchemaLoader::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdoc_schemas::SchemaLocation;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.paths.todo, PathBuf::from("TODO.md"));
        assert_eq!(config.paths.changelog, PathBuf::from("CHANGELOG.md"));
        assert!(config.output.color);
    }

    #[test]
    fn test_yaml_config_with_partial_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskdoc.yaml");
        std::fs::write(&path, "paths:\n  todo: docs/TODO.md\nlogging:\n  level: debug\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.paths.todo, PathBuf::from("docs/TODO.md"));
        assert_eq!(config.paths.changelog, PathBuf::from("CHANGELOG.md"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskdoc.json");
        std::fs::write(&path, r#"{"paths": {"schema": "schemas/task.json"}, "output": {"color": false}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.output.color);
        assert_eq!(
            config.schema_loader(None).location(),
            &SchemaLocation::File(PathBuf::from("schemas/task.json"))
        );
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskdoc.toml");
        std::fs::write(&path, "x = 1").unwrap();
        assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = Config::default();
        assert_eq!(config.todo_path(Some(Path::new("a.md"))), PathBuf::from("a.md"));
        assert_eq!(config.todo_path(None), PathBuf::from("TODO.md"));
        assert_eq!(
            config.schema_loader(Some(Path::new("s.json"))).location(),
            &SchemaLocation::File(PathBuf::from("s.json"))
        );
    }
}
