//! Taskdoc Core - validation and auto-fix pipeline for task blocks
//!
//! Tasks live as YAML blocks inside a markdown document (`TODO.md`). This
//! crate checks a batch of them against the task schema, repairs the common
//! defects it knows how to repair and optionally writes the repaired tasks
//! back through a [`TaskStore`].
//!
//! # Main Components
//!
//! - **Fixer**: deterministic rewrites of priority, status, dates, owner and validations
//! - **Exclusion Filter**: glob-like pattern that exempts tasks from the batch
//! - **Task Processor**: the per-task state machine
//! - **Validation Service**: concurrent batch driver producing a [`ValidationReport`]
//! - **Document**: reading and rewriting task blocks, plus the changelog
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use taskdoc_core::{MemoryTaskStore, Task, ValidationOptions, ValidationService};
//! use taskdoc_schemas::{JsonSchemaValidator, SchemaLoader};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> taskdoc_core::Result<()> {
//! let service = ValidationService::new(
//!     Arc::new(JsonSchemaValidator::new(SchemaLoader::bundled())),
//!     MemoryTaskStore::shared(Vec::new()),
//! );
//! let task: Task = serde_json::from_value(json!({
//!     "id": "T-1",
//!     "priority": "urgent",
//!     "status": "open",
//!     "created": "2024-01-01",
//!     "updated": "2024-01-01"
//! }))
//! .unwrap();
//!
//! let report = service
//!     .validate_and_fix_tasks(vec![task], &ValidationOptions::new(), None)
//!     .await?;
//! assert!(report.valid);
//! assert_eq!(report.fixes()[0].field, "priority");
//! # Ok(())
//! # }
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod document;
pub mod error;
pub mod exclusion;
pub mod fixer;
pub mod processor;
pub mod result;
pub mod service;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use context::ValidationContext;
pub use document::{Changelog, TodoDocument, CHANGELOG_FILE, TODO_FILE};
pub use error::{Error, Result};
pub use exclusion::{ExclusionFilter, PatternExclusionFilter};
pub use fixer::{parse_loose_date, BasicFixer, FixerOptions, TaskFixer};
pub use processor::TaskProcessor;
pub use result::{Disposition, ReportBuilder, ResultBuilder, TaskOutcome};
pub use service::{validate_and_fix_tasks, ValidationComponents, ValidationOptions, ValidationService};
pub use store::{DocumentTaskStore, MemoryTaskStore, TaskStore};
pub use types::{FixRecord, Task, ValidationReport};
