//! End-to-end tests for batch validation and repair


use serde_json::json;
use std::sync::Arc;
use taskdoc_core::{Error, MemoryTaskStore, ValidationService};
use taskdoc_schemas::{JsonSchemaValidator, SchemaLoader};
use test_support::{options, service, task, FailingStore};

#[tokio::test]
async fn test_fixes_reported_without_apply() {
    let input = task(json!({
        "id": "T-1",
        "priority": "BAD",
        "status": "open",
        "created": "2024-01-01",
        "updated": "2024-01-01",
        "owner": "john   doe",
        "validations": []
    }));
    let store = MemoryTaskStore::shared(vec![input.clone()]);

    let report = service(store.clone())
        .validate_and_fix_tasks(vec![input], &options(false), None)
        .await
        .unwrap();

    assert!(report.valid);
    assert!(report.errors.is_none());
    assert!(report.fixes_applied.is_none());

    let fixes = report.fixes();
    let priority = fixes.iter().find(|f| f.field == "priority").unwrap();
    assert_eq!(priority.old, Some(json!("BAD")));
    assert_eq!(priority.new, json!("P2"));
    let owner = fixes.iter().find(|f| f.field == "owner").unwrap();
    assert_eq!(owner.new, json!("John Doe"));

    assert!(store.writes().await.is_empty());
}

#[tokio::test]
async fn test_task_without_id_is_reported_once() {
    let store = MemoryTaskStore::shared(Vec::new());

    let report = service(store.clone())
        .validate_and_fix_tasks(vec![task(json!({"summary": "no id"}))], &options(true), None)
        .await
        .unwrap();

    assert!(!report.valid);
    assert_eq!(report.errors(), ["Task[0] has no id; cannot auto-fix"]);
    assert!(report.fixes.is_none());
    assert!(store.writes().await.is_empty());
}

#[tokio::test]
async fn test_every_fixed_task_is_written_once() {
    let tasks = vec![
        task(json!({"id": "A", "priority": "P0", "status": "done", "created": "2024-01-01", "updated": "2024-01-01", "validations": ["x"]})),
        task(json!({"id": "B", "priority": "urgent", "status": "open", "created": "2024-01-01", "updated": "2024-01-01", "validations": ["x"]})),
        task(json!({"id": "C", "priority": "P1", "status": "todo", "created": "01/15/2024", "updated": "2024-01-01"})),
    ];
    let store = MemoryTaskStore::shared(tasks.clone());

    let report = service(store.clone())
        .validate_and_fix_tasks(tasks, &options(true), None)
        .await
        .unwrap();

    assert!(report.valid, "errors: {:?}", report.errors);
    assert_eq!(report.fixes_applied, Some(2));

    let writes = store.writes().await;
    assert_eq!(writes.len(), 2);
    let written_b = writes.iter().find(|(id, _)| id == "B").unwrap();
    assert_eq!(written_b.1["priority"], "P2");
    let written_c = writes.iter().find(|(id, _)| id == "C").unwrap();
    assert_eq!(written_c.1["status"], "open");
    assert_eq!(written_c.1["created"], "2024-01-15");
    assert_eq!(written_c.1["validations"], json!([]));
}

#[tokio::test]
async fn test_clean_batch_reports_nothing() {
    let tasks = vec![
        task(json!({"id": "A", "summary": "Ship it", "priority": "P0", "status": "done", "created": "2024-01-01", "updated": "2024-01-02", "owner": "Ada Lovelace", "validations": ["cargo test"]})),
        task(json!({"id": "B", "priority": "P3", "status": "open", "created": "2024-03-01", "updated": "2024-03-01", "validations": []})),
    ];
    let store = MemoryTaskStore::shared(tasks.clone());

    let report = service(store.clone())
        .validate_and_fix_tasks(tasks.clone(), &options(true), None)
        .await
        .unwrap();

    assert_eq!(report, taskdoc_core::ValidationReport::valid());
    assert!(store.writes().await.is_empty());
    assert_eq!(store.tasks().await, tasks);
}

#[tokio::test]
async fn test_report_follows_input_order() {
    let tasks = vec![
        task(json!({"summary": "first, no id"})),
        task(json!({"id": "B", "priority": "x"})),
        task(json!({"summary": "third, no id"})),
    ];

    let report = service(MemoryTaskStore::shared(Vec::new()))
        .validate_and_fix_tasks(tasks, &options(false), None)
        .await
        .unwrap();

    assert_eq!(
        report.errors(),
        [
            "Task[0] has no id; cannot auto-fix",
            "Task[2] has no id; cannot auto-fix"
        ]
    );
    assert!(report.fixes().iter().all(|f| f.id == "B"));
    assert_eq!(report.fixes()[0].field, "priority");
}

#[tokio::test]
async fn test_excluded_tasks_leave_no_trace() {
    let tasks = vec![
        task(json!({"id": "LEGACY-1", "priority": "BAD"})),
        task(json!({"summary": "Legacy cleanup"})),
        task(json!({"id": "T-2", "owner": "legacy bot", "priority": "BAD"})),
    ];
    let store = MemoryTaskStore::shared(Vec::new());
    let opts = options(true).with_exclude_pattern("legacy*");

    let report = service(store.clone())
        .validate_and_fix_tasks(tasks, &opts, None)
        .await
        .unwrap();

    assert_eq!(report, taskdoc_core::ValidationReport::valid());
    assert!(store.writes().await.is_empty());
}

#[tokio::test]
async fn test_store_override_and_persist_failure() {
    let default_store = MemoryTaskStore::shared(Vec::new());
    let tasks = vec![task(json!({
        "id": "T-9",
        "priority": "P1",
        "status": "wip",
        "created": "2024-01-01",
        "updated": "2024-01-01",
        "validations": []
    }))];

    let report = service(default_store.clone())
        .validate_and_fix_tasks(tasks, &options(true), Some(Arc::new(FailingStore)))
        .await
        .unwrap();

    assert!(!report.valid);
    assert!(report.fixes_applied.is_none());
    assert_eq!(report.fixes().len(), 1);
    assert_eq!(
        report.errors(),
        ["Task[0] fixes could not be persisted: store offline while writing T-9"]
    );
    assert!(default_store.writes().await.is_empty());
}

#[tokio::test]
async fn test_missing_schema_fails_the_batch() {
    let service = ValidationService::new(
        Arc::new(JsonSchemaValidator::new(SchemaLoader::from_path(
            "/definitely/not/task-schema.json",
        ))),
        MemoryTaskStore::shared(Vec::new()),
    );

    let err = service
        .validate_and_fix_tasks(vec![task(json!({"id": "T-1"}))], &options(false), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[tokio::test]
async fn test_empty_batch_is_valid() {
    let report = service(MemoryTaskStore::shared(Vec::new()))
        .validate_and_fix_tasks(Vec::new(), &options(true), None)
        .await
        .unwrap();
    assert!(report.valid);
    assert!(report.errors.is_none() && report.fixes.is_none() && report.fixes_applied.is_none());
}

#[test]
fn test_validate_only_pass() {
    let tasks = vec![
        task(json!({"id": "A", "priority": "P0", "status": "done", "created": "2024-01-01", "updated": "2024-01-01"})),
        task(json!({"id": "B", "priority": "BAD", "status": "done", "created": "2024-01-01", "updated": "2024-01-01"})),
    ];

    let report = service(MemoryTaskStore::shared(Vec::new()))
        .validate_tasks(&tasks)
        .unwrap();

    assert!(!report.valid);
    assert_eq!(report.errors().len(), 1);
    assert!(report.errors()[0].starts_with("Task[1] validation failed: /priority "));
    assert!(report.fixes.is_none());
}

#[tokio::test]
async fn test_one_shot_entry_point() {
    let store = MemoryTaskStore::shared(Vec::new());
    let report = taskdoc_core::validate_and_fix_tasks(
        vec![task(json!({"summary": "no id"}))],
        false,
        Some("nothing-matches"),
        store,
    )
    .await
    .unwrap();
    assert_eq!(report.errors().len(), 1);
}
