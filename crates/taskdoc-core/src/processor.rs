//! Per-task validation and repair
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::context::ValidationContext;
use crate::error::Result;
use crate::exclusion::ExclusionFilter;
use crate::fixer::TaskFixer;
use crate::result::{Disposition, TaskOutcome};
use crate::types::{field_text, Task};
use serde_json::Value;
use std::sync::Arc;
use taskdoc_schemas::{TaskValidator, ValidationOutcome};
use tracing::{debug, warn, Instrument};

/// Runs one task through exclusion, validation, fixing and persistence
pub struct TaskProcessor {
    validator: Arc<dyn TaskValidator>,
    fixer: Arc<dyn TaskFixer>,
    exclusion_filter: Arc<dyn ExclusionFilter>,
    context: Arc<ValidationContext>,
}

impl TaskProcessor {
    pub fn new(
        validator: Arc<dyn TaskValidator>,
        fixer: Arc<dyn TaskFixer>,
        exclusion_filter: Arc<dyn ExclusionFilter>,
        context: Arc<ValidationContext>,
    ) -> Self {
        Self {
            validator,
            fixer,
            exclusion_filter,
            context,
        }
    }

    /// Process the task at `index` of the batch.
    ///
    /// The caller's task is never modified; fixes are applied to a copy.
    /// `Err` is returned only when the schema is unusable.
    pub async fn process_task(&self, task: &Task, index: usize) -> Result<TaskOutcome> {
        let id = field_text(task, "id");
        let span = self.context.task_span(index, &id);
        self.process(task.clone(), id, index).instrument(span).await
    }

    async fn process(&self, mut task: Task, id: String, index: usize) -> Result<TaskOutcome> {
        if self.exclusion_filter.should_exclude(&task) {
            debug!("Task excluded");
            return Ok(TaskOutcome::quiet(index, Disposition::Excluded));
        }

        let outcome = self.check(&mut task)?;
        if outcome.ok {
            return Ok(TaskOutcome::quiet(index, Disposition::Valid));
        }

        if id.is_empty() {
            return Ok(TaskOutcome::quiet(index, Disposition::MissingId)
                .with_error(format!("Task[{}] has no id; cannot auto-fix", index)));
        }

        let fixes = self.fixer.apply_basic_fixes(&mut task);
        if fixes.is_empty() {
            return Ok(TaskOutcome::quiet(index, Disposition::Unfixable).with_error(format!(
                "Task[{}] validation failed: {}",
                index,
                outcome.summary()
            )));
        }
        debug!(fixes = fixes.len(), "Applied fixes");

        let mut persisted = false;
        if self.context.apply_fixes {
            match self.persist(&id, &task, index).await {
                Ok(()) => persisted = true,
                Err(error) => {
                    return Ok(TaskOutcome::quiet(index, Disposition::PersistFailed)
                        .with_fixes(fixes)
                        .with_error(error));
                }
            }
        }

        let recheck = self.check(&mut task)?;
        let outcome = TaskOutcome::quiet(index, Disposition::Fixed)
            .with_fixes(fixes)
            .persisted(persisted);
        if recheck.ok {
            Ok(outcome)
        } else {
            let mut outcome = outcome.with_error(format!(
                "Task[{}] validation failed after fixes: {}",
                index,
                recheck.summary()
            ));
            outcome.disposition = Disposition::StillInvalid;
            Ok(outcome)
        }
    }

    /// Validate without copying the task
    fn check(&self, task: &mut Task) -> Result<ValidationOutcome> {
        let record = Value::Object(std::mem::take(task));
        let outcome = self.validator.validate(&record);
        if let Value::Object(map) = record {
            *task = map;
        }
        Ok(outcome?)
    }

    /// Write the fixed task; `Err` carries the report line
    async fn persist(
        &self,
        id: &str,
        task: &Task,
        index: usize,
    ) -> std::result::Result<(), String> {
        let reason = match self.context.store().update_task_by_id(id, task).await {
            Ok(true) => return Ok(()),
            Ok(false) => format!("no task with id {} in the store", id),
            Err(error) => format!("{:#}", error),
        };
        warn!(reason = %reason, "Fixes could not be persisted");
        Err(format!(
            "Task[{}] fixes could not be persisted: {}",
            index, reason
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::PatternExclusionFilter;
    use crate::fixer::{BasicFixer, FixerOptions};
    use crate::store::{MemoryTaskStore, TaskStore};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use taskdoc_schemas::{JsonSchemaValidator, SchemaLoader};

    struct FailingStore;

    #[async_trait]
    impl TaskStore for FailingStore {
        async fn update_task_by_id(&self, _id: &str, _task: &Task) -> anyhow::Result<bool> {
            anyhow::bail!("disk full")
        }
    }

    fn task(value: Value) -> Task {
        match value {
            Value::Object(map) => map,
            _ => panic!("test task must be an object"),
        }
    }

    fn processor(
        tasks: Vec<Task>,
        apply_fixes: bool,
        exclude: Option<&str>,
        store: Arc<dyn TaskStore>,
    ) -> TaskProcessor {
        let context = ValidationContext::new(tasks, apply_fixes, exclude.map(String::from), store);
        TaskProcessor::new(
            Arc::new(JsonSchemaValidator::new(SchemaLoader::bundled())),
            Arc::new(BasicFixer::with_options(
                FixerOptions::default().with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            )),
            Arc::new(PatternExclusionFilter::new(exclude).unwrap()),
            Arc::new(context),
        )
    }

    fn valid_task(id: &str) -> Task {
        task(json!({
            "id": id,
            "priority": "P1",
            "status": "open",
            "created": "2024-01-01",
            "updated": "2024-01-01",
            "validations": []
        }))
    }

    #[tokio::test]
    async fn test_valid_task_records_nothing() {
        let p = processor(vec![], false, None, MemoryTaskStore::shared(vec![]));
        let outcome = p.process_task(&valid_task("T-1"), 0).await.unwrap();
        assert_eq!(outcome, TaskOutcome::quiet(0, Disposition::Valid));
    }

    #[tokio::test]
    async fn test_excluded_task_is_not_validated() {
        let p = processor(vec![], true, Some("skip-*"), MemoryTaskStore::shared(vec![]));
        let outcome = p.process_task(&task(json!({"id": "skip-me"})), 3).await.unwrap();
        assert_eq!(outcome.disposition, Disposition::Excluded);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_missing_id() {
        let p = processor(vec![], true, None, MemoryTaskStore::shared(vec![]));
        let outcome = p.process_task(&task(json!({"summary": "no id"})), 4).await.unwrap();
        assert_eq!(outcome.disposition, Disposition::MissingId);
        assert_eq!(outcome.error.as_deref(), Some("Task[4] has no id; cannot auto-fix"));
        assert!(outcome.fixes.is_empty());
    }

    #[tokio::test]
    async fn test_unfixable_task_reports_schema_errors() {
        let p = processor(vec![], false, None, MemoryTaskStore::shared(vec![]));
        let mut t = valid_task("T-1");
        t.insert("summary".to_string(), json!(""));
        let outcome = p.process_task(&t, 2).await.unwrap();
        assert_eq!(outcome.disposition, Disposition::Unfixable);
        let error = outcome.error.unwrap();
        assert!(error.starts_with("Task[2] validation failed: /summary "), "{}", error);
    }

    #[tokio::test]
    async fn test_fix_without_apply_does_not_touch_store() {
        let store = MemoryTaskStore::shared(vec![]);
        let p = processor(vec![], false, None, store.clone());
        let mut t = valid_task("T-1");
        t.insert("priority".to_string(), json!("BAD"));

        let outcome = p.process_task(&t, 0).await.unwrap();
        assert_eq!(outcome.disposition, Disposition::Fixed);
        assert!(!outcome.persisted);
        assert_eq!(outcome.fixes[0].old, Some(json!("BAD")));
        assert!(store.writes().await.is_empty());
        assert_eq!(t["priority"], "BAD");
    }

    #[tokio::test]
    async fn test_fix_with_apply_persists_mutated_task() {
        let mut t = valid_task("T-1");
        t.insert("priority".to_string(), json!("BAD"));
        let store = MemoryTaskStore::shared(vec![t.clone()]);
        let p = processor(vec![], true, None, store.clone());

        let outcome = p.process_task(&t, 0).await.unwrap();
        assert!(outcome.persisted);
        let writes = store.writes().await;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1["priority"], "P2");
        assert_eq!(store.tasks().await[0]["priority"], "P2");
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let mut t = valid_task("T-1");
        t.insert("status".to_string(), json!("wip"));
        let p = processor(vec![], true, None, Arc::new(FailingStore));

        let outcome = p.process_task(&t, 1).await.unwrap();
        assert_eq!(outcome.disposition, Disposition::PersistFailed);
        assert_eq!(outcome.fixes.len(), 1);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Task[1] fixes could not be persisted: disk full")
        );
    }

    #[tokio::test]
    async fn test_store_without_task_is_reported() {
        let mut t = valid_task("T-1");
        t.insert("status".to_string(), json!("wip"));
        let p = processor(vec![], true, None, MemoryTaskStore::shared(vec![]));

        let outcome = p.process_task(&t, 0).await.unwrap();
        assert!(!outcome.persisted);
        assert!(outcome.error.unwrap().contains("no task with id T-1"));
    }

    #[tokio::test]
    async fn test_still_invalid_after_fixes() {
        let mut t = valid_task("T-1");
        t.insert("priority".to_string(), json!("BAD"));
        t.insert("summary".to_string(), json!(""));
        let p = processor(vec![], false, None, MemoryTaskStore::shared(vec![]));

        let outcome = p.process_task(&t, 5).await.unwrap();
        assert_eq!(outcome.disposition, Disposition::StillInvalid);
        assert_eq!(outcome.fixes.len(), 1);
        assert!(outcome
            .error
            .as_deref()
            .unwrap()
            .starts_with("Task[5] validation failed after fixes: /summary"));
    }

    #[tokio::test]
    async fn test_schema_failure_is_an_error() {
        let context = ValidationContext::new(vec![], false, None, MemoryTaskStore::shared(vec![]));
        let p = TaskProcessor::new(
            Arc::new(JsonSchemaValidator::new(SchemaLoader::from_path("/no/schema.json"))),
            Arc::new(BasicFixer::new()),
            Arc::new(PatternExclusionFilter::default()),
            Arc::new(context),
        );
        assert!(p.process_task(&valid_task("T-1"), 0).await.is_err());
    }
}
