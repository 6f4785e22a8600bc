//! Batch validation entry points
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::ValidationContext;
use crate::error::{Error, Result};
use crate::exclusion::{ExclusionFilter, PatternExclusionFilter};
use crate::fixer::{BasicFixer, FixerOptions, TaskFixer};
use crate::processor::TaskProcessor;
use crate::result::{ReportBuilder, ResultBuilder};
use crate::store::{DocumentTaskStore, TaskStore};
use crate::types::{Task, ValidationReport};
use chrono::NaiveDate;
use futures_util::future::join_all;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use taskdoc_schemas::{JsonSchemaValidator, TaskValidator};
use tracing::{debug, info, Instrument};

/// Per-call options for [`ValidationService::validate_and_fix_tasks`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Write fixed tasks to the store
    pub apply_fixes: bool,
    /// Skip tasks whose id, owner or summary match this pattern
    pub exclude_pattern: Option<String>,
    /// Date used by the fixer for missing dates
    pub today: Option<NaiveDate>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_apply_fixes(mut self, apply_fixes: bool) -> Self {
        self.apply_fixes = apply_fixes;
        self
    }

    pub fn with_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_pattern = Some(pattern.into());
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

/// The role objects one batch runs with
pub struct ValidationComponents {
    pub validator: Arc<dyn TaskValidator>,
    pub fixer: Arc<dyn TaskFixer>,
    pub exclusion_filter: Arc<dyn ExclusionFilter>,
    pub result_builder: ReportBuilder,
}

impl ValidationComponents {
    /// Build the standard components for a batch
    pub fn assemble(validator: Arc<dyn TaskValidator>, options: &ValidationOptions) -> Result<Self> {
        let fixer = BasicFixer::with_options(FixerOptions {
            today: options.today,
        });
        let exclusion_filter = PatternExclusionFilter::new(options.exclude_pattern.as_deref())?;
        Ok(Self {
            validator,
            fixer: Arc::new(fixer),
            exclusion_filter: Arc::new(exclusion_filter),
            result_builder: ReportBuilder::new(),
        })
    }
}

/// Validates batches of tasks and repairs what it can
#[derive(Clone)]
pub struct ValidationService {
    validator: Arc<dyn TaskValidator>,
    store: Arc<dyn TaskStore>,
}

impl fmt::Debug for ValidationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationService").finish_non_exhaustive()
    }
}

impl ValidationService {
    /// Service with an explicit validator and default store
    pub fn new(validator: Arc<dyn TaskValidator>, store: Arc<dyn TaskStore>) -> Self {
        Self { validator, store }
    }

    /// Service over the default schema, writing fixes back to `todo_path`
    pub fn for_document(todo_path: impl Into<PathBuf>) -> Self {
        Self::new(
            Arc::new(JsonSchemaValidator::with_default_schema()),
            Arc::new(DocumentTaskStore::new(todo_path)),
        )
    }

    /// Validate every task, fix what can be fixed and report the result.
    ///
    /// `store` overrides the service's default store for this call. Tasks
    /// are processed concurrently; the report lists them in input order.
    /// An unusable schema or exclusion pattern fails the whole call.
    pub async fn validate_and_fix_tasks(
        &self,
        tasks: Vec<Task>,
        options: &ValidationOptions,
        store: Option<Arc<dyn TaskStore>>,
    ) -> Result<ValidationReport> {
        let components = ValidationComponents::assemble(Arc::clone(&self.validator), options)?;
        let store = store.unwrap_or_else(|| Arc::clone(&self.store));
        let context = Arc::new(ValidationContext::new(
            tasks,
            options.apply_fixes,
            options.exclude_pattern.clone(),
            store,
        ));
        let span = context.span().clone();

        let ValidationComponents {
            validator,
            fixer,
            exclusion_filter,
            mut result_builder,
        } = components;
        let processor = TaskProcessor::new(validator, fixer, exclusion_filter, Arc::clone(&context));

        async {
            let outcomes = join_all(
                context
                    .tasks
                    .iter()
                    .enumerate()
                    .map(|(index, task)| processor.process_task(task, index)),
            )
            .await;

            for outcome in outcomes {
                let outcome = outcome?;
                debug!(index = outcome.index, disposition = ?outcome.disposition, "Task processed");
                result_builder.record_outcome(outcome);
            }

            let report = result_builder.build();
            info!(
                valid = report.valid,
                errors = report.errors().len(),
                fixes = report.fixes().len(),
                fixes_applied = report.fixes_applied(),
                "Validation batch finished"
            );
            Ok::<_, Error>(report)
        }
        .instrument(span)
        .await
    }

    /// Schema check only: no fixer, no exclusion, no store
    pub fn validate_tasks(&self, tasks: &[Task]) -> Result<ValidationReport> {
        let mut builder = ReportBuilder::new();
        for (index, task) in tasks.iter().enumerate() {
            let outcome = self
                .validator
                .validate(&serde_json::Value::Object(task.clone()))?;
            if !outcome.ok {
                builder.add_error(format!(
                    "Task[{}] validation failed: {}",
                    index,
                    outcome.summary()
                ));
            }
        }
        Ok(builder.build())
    }
}

/// One-shot batch over the default schema with an explicit store
pub async fn validate_and_fix_tasks(
    tasks: Vec<Task>,
    apply_fixes: bool,
    exclude_pattern: Option<&str>,
    store: Arc<dyn TaskStore>,
) -> Result<ValidationReport> {
    let mut options = ValidationOptions::new().with_apply_fixes(apply_fixes);
    options.exclude_pattern = exclude_pattern.map(String::from);
    ValidationService::new(Arc::new(JsonSchemaValidator::with_default_schema()), Arc::clone(&store))
        .validate_and_fix_tasks(tasks, &options, Some(store))
        .await
}
