//! Core data types shared by the validation pipeline
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A task record as parsed from a YAML block.
///
/// Field order is preserved so rewritten blocks keep the author's layout.
pub type Task = Map<String, Value>;

/// Priorities the fixer accepts as-is
pub const PRIORITIES: [&str; 4] = ["P0", "P1", "P2", "P3"];

/// Statuses the fixer accepts as-is
pub const STATUSES: [&str; 4] = ["open", "in-progress", "blocked", "done"];

/// Priority written when the existing one is not recognised
pub const DEFAULT_PRIORITY: &str = "P2";

/// Status written when the existing one is not recognised
pub const DEFAULT_STATUS: &str = "open";

/// Calendar date layout used for `created` and `updated`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a field the way it reads in a message or a match.
///
/// Strings are taken verbatim, scalars use their literal form and a missing
/// or null field becomes the empty string.
pub fn field_text(task: &Task, field: &str) -> String {
    match task.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Whether a field is absent or holds a falsy value
/// (`null`, `false`, `0` or the empty string).
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(false, |n| n == 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// One field rewrite performed by the fixer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixRecord {
    /// Id of the task, empty when the task has none
    pub id: String,
    /// Field that was rewritten
    pub field: String,
    /// Value before the rewrite, absent when the field was missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    /// Value after the rewrite
    pub new: Value,
}

impl FixRecord {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        old: Option<Value>,
        new: Value,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            old,
            new,
        }
    }
}

/// Aggregate result of one validation batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True when no record produced an error
    pub valid: bool,
    /// Error lines in record order, absent when there are none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Number of records persisted through the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixes_applied: Option<usize>,
    /// Every fix proposed or applied, in record order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixes: Option<Vec<FixRecord>>,
}

impl ValidationReport {
    /// Report for a batch where nothing went wrong
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: None,
            fixes_applied: None,
            fixes: None,
        }
    }

    /// Error lines, empty when the batch was valid
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Fix records, empty when nothing was fixed
    pub fn fixes(&self) -> &[FixRecord] {
        self.fixes.as_deref().unwrap_or_default()
    }

    /// Number of persisted records, zero when none were
    pub fn fixes_applied(&self) -> usize {
        self.fixes_applied.unwrap_or(0)
    }
}
