//! Schema loading and parsing functionality
//!
//! This module locates the task schema and turns it into a JSON value:
//! - YAML and JSON parsing support
//! - Override through `TASKDOC_SCHEMA_PATH`
//! - Project template at `docs/templates/task-schema.json`
//! - A bundled fallback schema
//!
//! # Example Usage
//!
//! ```rust
//! use taskdoc_schemas::loader::{SchemaLoader, SchemaProvider};
//!
//! let loader = SchemaLoader::bundled();
//! let schema = loader.load()?;
//! assert_eq!(schema["type"], "object");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;
pub mod schema_loader;

pub use error::{LoaderError, LoaderResult};
pub use parser::{Format, SchemaParser};
pub use schema_loader::{
    SchemaLoader, SchemaLocation, SchemaProvider, BUNDLED_TASK_SCHEMA, DEFAULT_SCHEMA_PATH,
    SCHEMA_PATH_ENV,
};
