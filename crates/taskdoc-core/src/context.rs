//! Per-batch validation context
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::store::TaskStore;
use crate::types::Task;
use std::fmt;
use std::sync::Arc;
use tracing::Span;

/// Everything one validation batch shares between its tasks
///
/// The context owns the input tasks, the flags chosen by the caller, the
/// store fixes are written to and the tracing span every per-task span hangs
/// off.
pub struct ValidationContext {
    /// The input tasks, in batch order
    pub tasks: Vec<Task>,

    /// Whether fixed tasks are written to the store
    pub apply_fixes: bool,

    /// Exclusion pattern, if any
    pub exclude_pattern: Option<String>,

    store: Arc<dyn TaskStore>,
    span: Span,
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("tasks", &self.tasks.len())
            .field("apply_fixes", &self.apply_fixes)
            .field("exclude_pattern", &self.exclude_pattern)
            .finish_non_exhaustive()
    }
}

impl ValidationContext {
    /// Create a new validation context
    pub fn new(
        tasks: Vec<Task>,
        apply_fixes: bool,
        exclude_pattern: Option<String>,
        store: Arc<dyn TaskStore>,
    ) -> Self {
        let span = tracing::info_span!(
            "validation_batch",
            tasks = tasks.len(),
            apply_fixes,
            exclude = exclude_pattern.as_deref().unwrap_or(""),
        );
        Self {
            tasks,
            apply_fixes,
            exclude_pattern,
            store,
            span,
        }
    }

    /// The store fixed tasks are written to
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// The batch span
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Child span for one task
    pub fn task_span(&self, index: usize, id: &str) -> Span {
        tracing::debug_span!(parent: &self.span, "task", index, id)
    }
}
