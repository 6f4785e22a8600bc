//! Persistence of fixed tasks
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::document::TodoDocument;
use crate::types::{field_text, Task};
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Durable update of one task by id
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Replace the stored task `id` with `task`.
    ///
    /// `Ok(false)` means no task with that id exists.
    async fn update_task_by_id(&self, id: &str, task: &Task) -> anyhow::Result<bool>;
}

/// Store writing back into a [`TodoDocument`].
///
/// Every update rewrites the whole file, so updates are serialized.
#[derive(Debug)]
pub struct DocumentTaskStore {
    document: TodoDocument,
    write_lock: Mutex<()>,
}

impl DocumentTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_document(TodoDocument::new(path))
    }

    pub fn from_document(document: TodoDocument) -> Self {
        Self {
            document,
            write_lock: Mutex::new(()),
        }
    }

    pub fn document(&self) -> &TodoDocument {
        &self.document
    }
}

#[async_trait]
impl TaskStore for DocumentTaskStore {
    async fn update_task_by_id(&self, id: &str, task: &Task) -> anyhow::Result<bool> {
        let _guard = self.write_lock.lock().await;

        let document = self.document.clone();
        let owned_id = id.to_string();
        let task = task.clone();
        let updated =
            tokio::task::spawn_blocking(move || document.update_task_by_id(&owned_id, &task))
                .await
                .context("document update did not complete")?
                .with_context(|| {
                    format!(
                        "failed to update task {} in {}",
                        id,
                        self.document.path().display()
                    )
                })?;

        debug!(id, updated, "Document store write");
        Ok(updated)
    }
}

/// In-memory store that remembers every write it receives
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
    writes: Mutex<Vec<(String, Task)>>,
}

impl MemoryTaskStore {
    /// Store seeded with existing tasks
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Shared handle, ready to pass as a store
    pub fn shared(tasks: Vec<Task>) -> Arc<Self> {
        Arc::new(Self::new(tasks))
    }

    /// Current contents
    pub async fn tasks(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Every `(id, task)` pair passed to the store, in call order
    pub async fn writes(&self) -> Vec<(String, Task)> {
        self.writes.lock().await.clone()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn update_task_by_id(&self, id: &str, task: &Task) -> anyhow::Result<bool> {
        self.writes.lock().await.push((id.to_string(), task.clone()));

        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|stored| field_text(stored, "id") == id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
