//! Task blocks embedded in a markdown document, and the changelog they
//! graduate to
//!
//! A task is a YAML mapping between two `---` lines. Everything outside the
//! blocks is left untouched by every operation here.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::types::{field_text, Task};
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Default document file name
pub const TODO_FILE: &str = "TODO.md";

/// Default changelog file name
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

const UNRELEASED: &str = "Unreleased";

fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)---\r?\n(.*?)\r?\n---").expect("task block pattern is valid")
    })
}

/// One `---` delimited block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// The block including both delimiters
    pub raw: &'a str,
    /// The YAML between the delimiters
    pub body: &'a str,
}

/// Every block in `content`, in document order
pub fn extract_blocks(content: &str) -> Vec<Block<'_>> {
    block_pattern()
        .captures_iter(content)
        .filter_map(|caps| {
            Some(Block {
                raw: caps.get(0)?.as_str(),
                body: caps.get(1)?.as_str(),
            })
        })
        .collect()
}

/// Parse a block body; `Ok(None)` when it is valid YAML but not a mapping
pub fn parse_block(body: &str) -> Result<Option<Task>> {
    let value: Value = serde_yaml::from_str(body)
        .map_err(|e| Error::yaml("Failed to parse task block", e))?;
    Ok(match value {
        Value::Object(map) => Some(map),
        _ => None,
    })
}

/// Render a task as a block
pub fn render_block(task: &Task) -> Result<String> {
    let yaml =
        serde_yaml::to_string(task).map_err(|e| Error::yaml("Failed to serialize task", e))?;
    Ok(format!("---\n{}---", yaml))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::io(path, e))
}

/// Whether the block holds the task with this id
fn block_has_id(block: &Block<'_>, id: &str) -> bool {
    matches!(parse_block(block.body), Ok(Some(task)) if field_text(&task, "id") == id)
}

/// A markdown file holding task blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDocument {
    path: PathBuf,
}

impl TodoDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Every task that parses as a mapping; malformed blocks are skipped
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let content = read(&self.path)?;
        let mut tasks = Vec::new();
        for (position, block) in extract_blocks(&content).iter().enumerate() {
            match parse_block(block.body) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => {}
                Err(e) => warn!(
                    path = %self.path.display(),
                    block = position,
                    error = %e,
                    "Failed to parse YAML block"
                ),
            }
        }
        debug!(count = tasks.len(), "Extracted tasks");
        Ok(tasks)
    }

    /// First task whose id reads as `id`
    pub fn find_task_by_id(&self, id: &str) -> Result<Option<Task>> {
        let found = self
            .list_tasks()?
            .into_iter()
            .find(|task| field_text(task, "id") == id);
        debug!(id, found = found.is_some(), "Looked up task");
        Ok(found)
    }

    /// Replace every block holding `id` with `task`.
    ///
    /// The file is written only when something matched.
    pub fn update_task_by_id(&self, id: &str, task: &Task) -> Result<bool> {
        let content = read(&self.path)?;
        let replacement = render_block(task)?;
        let mut updated = content.clone();
        let mut changed = false;

        for block in extract_blocks(&content) {
            if block_has_id(&block, id) {
                updated = updated.replacen(block.raw, &replacement, 1);
                changed = true;
            }
        }

        if changed {
            write(&self.path, &updated)?;
            info!(id, path = %self.path.display(), "Updated task");
        }
        Ok(changed)
    }

    /// Delete the first block holding `id`
    pub fn remove_task_by_id(&self, id: &str) -> Result<bool> {
        let content = read(&self.path)?;
        let Some(block) = extract_blocks(&content)
            .into_iter()
            .find(|block| block_has_id(block, id))
        else {
            return Ok(false);
        };

        write(&self.path, &content.replacen(block.raw, "", 1))?;
        info!(id, path = %self.path.display(), "Removed task");
        Ok(true)
    }

    /// Append the first block of `source` to the document.
    ///
    /// Returns `false` when `source` is missing or holds no block.
    pub fn add_task_from_file(&self, source: &Path) -> Result<bool> {
        if !source.is_file() {
            return Ok(false);
        }
        let incoming = read(source)?;
        let Some(block) = extract_blocks(&incoming).into_iter().next() else {
            return Ok(false);
        };

        let mut content = read(&self.path)?;
        content.push('\n');
        content.push_str(block.raw);
        content.push('\n');
        write(&self.path, &content)?;
        info!(source = %source.display(), "Appended task block");
        Ok(true)
    }
}

/// The changelog completed tasks are appended to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    path: PathBuf,
}

impl Changelog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add an entry under the `Unreleased` heading, creating it if needed
    pub fn append_entry(&self, entry: &str) -> Result<()> {
        let header = format!("# Changelog\n\n{}\n\n- {}\n", UNRELEASED, entry);

        if !self.path.exists() {
            write(&self.path, &header)?;
            info!(entry, path = %self.path.display(), "Created changelog");
            return Ok(());
        }

        let content = read(&self.path)?;
        let updated = match content.find(UNRELEASED) {
            None => format!("{}\n{}", header, content),
            Some(start) => match content[start..].find('\n') {
                Some(offset) => {
                    let at = start + offset + 1;
                    format!("{}- {}\n{}", &content[..at], entry, &content[at..])
                }
                None => format!("{}\n- {}\n", content, entry),
            },
        };
        write(&self.path, &updated)?;
        info!(entry, path = %self.path.display(), "Appended changelog entry");
        Ok(())
    }

    /// Describe what [`complete_task`](Self::complete_task) would write
    pub fn preview_complete(&self, document: &TodoDocument, id: &str) -> Result<String> {
        Ok(match document.find_task_by_id(id)? {
            None => format!("Task {} not found", id),
            Some(task) => format!(
                "Will remove task {} from {}\nWill append to {} {}: {}",
                id,
                document.path().display(),
                self.path.display(),
                UNRELEASED,
                completion_entry(&task, None)
            ),
        })
    }

    /// Move a task from the document into the changelog.
    ///
    /// Returns the changelog entry, or `None` when the task is not in the
    /// document.
    pub fn complete_task(
        &self,
        document: &TodoDocument,
        id: &str,
        message: Option<&str>,
    ) -> Result<Option<String>> {
        let Some(task) = document.find_task_by_id(id)? else {
            return Ok(None);
        };
        if !document.remove_task_by_id(id)? {
            return Err(Error::document(
                document.path(),
                format!("task {} disappeared before it could be removed", id),
            ));
        }
        let entry = completion_entry(&task, message);
        self.append_entry(&entry)?;
        info!(id, entry = %entry, "Completed task");
        Ok(Some(entry))
    }
}

fn completion_entry(task: &Task, message: Option<&str>) -> String {
    let base = format!("{} — {}", field_text(task, "id"), field_text(task, "summary"));
    match message {
        Some(m) if !m.is_empty() => format!("{} ({})", base, m),
        _ => base,
    }
}
