//! List command handler

use crate::error::Result;
use crate::output::OutputWriter;
use taskdoc_core::TodoDocument;
use tracing::{info, instrument};

/// Handle `todo list`
#[instrument(skip_all, fields(file = %document.path().display()))]
pub fn handle_list(document: &TodoDocument, output: &mut OutputWriter) -> Result<()> {
    let tasks = document.list_tasks()?;
    info!(count = tasks.len(), "Listing tasks");

    if tasks.is_empty() {
        output.warning(&format!("No tasks found in {}", document.path().display()))?;
        if output.format() == crate::cli::OutputFormat::Human {
            return Ok(());
        }
    }

    output.task_list(&tasks)
}
