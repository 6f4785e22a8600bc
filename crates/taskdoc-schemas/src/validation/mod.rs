//! Validation of task records against the task schema
//!
//! The [`TaskValidator`] trait is the seam the pipeline depends on;
//! [`JsonSchemaValidator`] is the production implementation.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod validator;

pub use error::{ValidationError, ValidationErrors, ValidationOutcome};
pub use validator::{JsonSchemaValidator, TaskValidator};

/// Convenience function to create a validator over the default schema location
///
/// # Examples
///
/// ```rust
/// use taskdoc_schemas::validation::{create_task_validator, TaskValidator};
/// use serde_json::json;
///
/// let validator = create_task_validator();
/// let outcome = validator
///     .validate(&json!({
///         "id": "T-001",
///         "summary": "Write docs",
///         "priority": "P1",
///         "status": "open",
///         "created": "2024-01-01",
///         "updated": "2024-01-01"
///     }))
///     .unwrap();
/// assert!(outcome.ok);
/// ```
pub fn create_task_validator() -> JsonSchemaValidator {
    JsonSchemaValidator::with_default_schema()
}
