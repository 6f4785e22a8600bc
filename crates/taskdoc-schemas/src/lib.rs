//! Taskdoc Schemas - task schema loading and validation
//!
//! This crate owns everything about the schema a task block in `TODO.md`
//! must satisfy:
//! - **Loading**: JSON or YAML schema files, an environment override and a
//!   bundled default
//! - **Validation**: JSON Schema draft 2020-12 checks through `jsonschema`,
//!   compiled lazily and exactly once per validator
//! - **Error reporting**: per-field violations with JSON pointer paths
//!
//! ## Quick Start
//!
//! ```rust
//! use taskdoc_schemas::{JsonSchemaValidator, SchemaLoader, TaskValidator};
//! use serde_json::json;
//!
//! let validator = JsonSchemaValidator::new(SchemaLoader::bundled());
//! let outcome = validator.validate(&json!({"summary": "no id"})).unwrap();
//! assert!(!outcome.ok);
//! println!("{}", outcome.summary());
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod loader;
pub mod validation;

// Re-export commonly used types for convenience
pub use loader::{
    LoaderError, LoaderResult, SchemaLoader, SchemaLocation, SchemaProvider, BUNDLED_TASK_SCHEMA,
};
pub use validation::{
    create_task_validator, JsonSchemaValidator, TaskValidator, ValidationError, ValidationErrors,
    ValidationOutcome,
};
