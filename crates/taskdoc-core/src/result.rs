//! Accumulation of per-task outcomes into a [`ValidationReport`]
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::types::{FixRecord, ValidationReport};

/// What happened to one task in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Matched the exclusion pattern and was skipped
    Excluded,
    /// Satisfied the schema as given
    Valid,
    /// Invalid and without an id to fix it under
    MissingId,
    /// Invalid and the fixer found nothing to change
    Unfixable,
    /// Fixed and valid afterwards
    Fixed,
    /// Fixed but still failing the schema
    StillInvalid,
    /// Fixed but the store did not accept the write
    PersistFailed,
}

/// Local result of processing one task, merged into a builder later
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    /// Position of the task in the input batch
    pub index: usize,
    pub disposition: Disposition,
    /// Error line for the report, if any
    pub error: Option<String>,
    /// Fixes proposed or applied for this task
    pub fixes: Vec<FixRecord>,
    /// Whether the store confirmed a write
    pub persisted: bool,
}

impl TaskOutcome {
    /// Outcome that records nothing
    pub fn quiet(index: usize, disposition: Disposition) -> Self {
        Self {
            index,
            disposition,
            error: None,
            fixes: Vec::new(),
            persisted: false,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_fixes(mut self, fixes: Vec<FixRecord>) -> Self {
        self.fixes = fixes;
        self
    }

    pub fn persisted(mut self, persisted: bool) -> Self {
        self.persisted = persisted;
        self
    }
}

/// Order-preserving collector of errors, fixes and persisted-write counts
pub trait ResultBuilder: Send {
    fn add_error(&mut self, error: String);

    fn add_fixes(&mut self, fixes: Vec<FixRecord>);

    /// Count one record the store confirmed
    fn increment_fixes_applied(&mut self);

    /// Snapshot of everything collected so far
    fn build(&self) -> ValidationReport;

    /// Fold a task outcome into the builder
    fn record_outcome(&mut self, outcome: TaskOutcome) {
        if !outcome.fixes.is_empty() {
            self.add_fixes(outcome.fixes);
        }
        if outcome.persisted {
            self.increment_fixes_applied();
        }
        if let Some(error) = outcome.error {
            self.add_error(error);
        }
    }
}

/// Default [`ResultBuilder`]
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    errors: Vec<String>,
    fixes: Vec<FixRecord>,
    fixes_applied: usize,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultBuilder for ReportBuilder {
    fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    fn add_fixes(&mut self, fixes: Vec<FixRecord>) {
        self.fixes.extend(fixes);
    }

    fn increment_fixes_applied(&mut self) {
        self.fixes_applied += 1;
    }

    fn build(&self) -> ValidationReport {
        ValidationReport {
            valid: self.errors.is_empty(),
            errors: (!self.errors.is_empty()).then(|| self.errors.clone()),
            fixes_applied: (self.fixes_applied > 0).then_some(self.fixes_applied),
            fixes: (!self.fixes.is_empty()).then(|| self.fixes.clone()),
        }
    }
}
