//! JSON Schema validation of task records
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::loader::{LoaderError, LoaderResult, SchemaLoader, SchemaProvider};
use crate::validation::error::{ValidationError, ValidationErrors, ValidationOutcome};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Checks one record against a schema
pub trait TaskValidator: Send + Sync {
    /// Validate a record.
    ///
    /// `Err` means the schema itself could not be obtained or compiled; record
    /// problems are reported through [`ValidationOutcome`].
    fn validate(&self, record: &Value) -> LoaderResult<ValidationOutcome>;
}

/// [`TaskValidator`] backed by the `jsonschema` crate.
///
/// The schema is loaded and compiled the first time it is needed and then
/// shared by every later call, including concurrent ones.
pub struct JsonSchemaValidator {
    provider: Box<dyn SchemaProvider>,
    compiled: Mutex<Option<Arc<jsonschema::Validator>>>,
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("provider", &self.provider)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

impl JsonSchemaValidator {
    /// Create a validator over any schema provider
    pub fn new(provider: impl SchemaProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            compiled: Mutex::new(None),
        }
    }

    /// Validator over the schema found by [`SchemaLoader::new`]
    pub fn with_default_schema() -> Self {
        Self::new(SchemaLoader::new())
    }

    /// Name of the schema source
    pub fn source_name(&self) -> String {
        self.provider.source_name()
    }

    /// Whether the schema has been compiled yet
    pub fn is_compiled(&self) -> bool {
        self.compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Load and compile the schema unless that already happened
    pub fn compile(&self) -> LoaderResult<Arc<jsonschema::Validator>> {
        let mut slot = self
            .compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(validator) = slot.as_ref() {
            return Ok(Arc::clone(validator));
        }

        let schema = self.provider.load()?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| LoaderError::compile_error(self.provider.source_name(), e.to_string()))?;
        tracing::debug!(source = %self.provider.source_name(), "Compiled task schema");

        let validator = Arc::new(validator);
        *slot = Some(Arc::clone(&validator));
        Ok(validator)
    }
}

impl TaskValidator for JsonSchemaValidator {
    fn validate(&self, record: &Value) -> LoaderResult<ValidationOutcome> {
        let compiled = self.compile()?;
        let errors: ValidationErrors = compiled
            .iter_errors(record)
            .map(|error| ValidationError::new(error.instance_path.to_string(), error.to_string()))
            .collect();
        Ok(ValidationOutcome::from_errors(errors))
    }
}
