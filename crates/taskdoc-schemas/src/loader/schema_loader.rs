//! Task schema loader
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::loader::{
    error::{LoaderError, LoaderResult},
    parser::{Format, SchemaParser},
};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable that points at a schema file
pub const SCHEMA_PATH_ENV: &str = "TASKDOC_SCHEMA_PATH";

/// Project-relative location checked when nothing else is configured
pub const DEFAULT_SCHEMA_PATH: &str = "docs/templates/task-schema.json";

/// Task schema shipped with the crate
pub const BUNDLED_TASK_SCHEMA: &str = include_str!("../../schemas/task.schema.json");

const BUNDLED_NAME: &str = "<bundled task.schema.json>";

/// Anything that can hand out a schema document.
///
/// Loading happens when a validator first needs the schema, so an
/// implementation may touch the filesystem.
pub trait SchemaProvider: Send + Sync + fmt::Debug {
    /// Produce the schema document
    fn load(&self) -> LoaderResult<Value>;

    /// Human-readable name used in errors and logs
    fn source_name(&self) -> String;
}

/// An already-parsed schema is its own provider
impl SchemaProvider for Value {
    fn load(&self) -> LoaderResult<Value> {
        Ok(self.clone())
    }

    fn source_name(&self) -> String {
        "<inline schema>".to_string()
    }
}

/// Where a [`SchemaLoader`] reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLocation {
    /// A JSON or YAML file on disk
    File(PathBuf),
    /// The schema compiled into this crate
    Bundled,
}

/// Loads the task schema from disk or from the bundled copy
#[derive(Debug)]
pub struct SchemaLoader {
    location: SchemaLocation,
    parser: SchemaParser,
}

impl SchemaLoader {
    /// Resolve the schema location from the environment and the current directory
    pub fn new() -> Self {
        let env_override = std::env::var_os(SCHEMA_PATH_ENV).map(PathBuf::from);
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::at(Self::resolve_location(&base_dir, env_override))
    }

    /// Load from a specific file; a missing file is an error at load time
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::at(SchemaLocation::File(path.into()))
    }

    /// Always use the bundled schema
    pub fn bundled() -> Self {
        Self::at(SchemaLocation::Bundled)
    }

    fn at(location: SchemaLocation) -> Self {
        Self {
            location,
            parser: SchemaParser::new(),
        }
    }

    /// The location this loader reads from
    pub fn location(&self) -> &SchemaLocation {
        &self.location
    }

    /// Pick the schema location.
    ///
    /// An explicit override always wins, even if the file is missing.
    /// Otherwise the project template is used when present, then the bundled
    /// schema.
    pub fn resolve_location(base_dir: &Path, env_override: Option<PathBuf>) -> SchemaLocation {
        if let Some(path) = env_override {
            return SchemaLocation::File(path);
        }

        let project_schema = base_dir.join(DEFAULT_SCHEMA_PATH);
        if project_schema.exists() {
            return SchemaLocation::File(project_schema);
        }

        SchemaLocation::Bundled
    }

    fn load_file(&self, path: &Path) -> LoaderResult<Value> {
        if !path.exists() {
            return Err(LoaderError::not_found(path.to_path_buf()));
        }
        let schema = self.parser.parse_file(path)?;
        self.parser.validate_basic_structure(&schema, path)?;
        Ok(schema)
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaProvider for SchemaLoader {
    fn load(&self) -> LoaderResult<Value> {
        match &self.location {
            SchemaLocation::File(path) => {
                tracing::debug!(path = %path.display(), "Loading task schema");
                self.load_file(path)
            }
            SchemaLocation::Bundled => {
                tracing::debug!("Loading bundled task schema");
                let path = Path::new(BUNDLED_NAME);
                let schema = self
                    .parser
                    .parse_content(BUNDLED_TASK_SCHEMA, Format::Json, path)?;
                self.parser.validate_basic_structure(&schema, path)?;
                Ok(schema)
            }
        }
    }

    fn source_name(&self) -> String {
        match &self.location {
            SchemaLocation::File(path) => path.display().to_string(),
            SchemaLocation::Bundled => BUNDLED_NAME.to_string(),
        }
    }
}
