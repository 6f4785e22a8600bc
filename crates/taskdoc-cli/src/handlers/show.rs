//! Show command handler

use crate::cli::ShowArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use taskdoc_core::TodoDocument;
use tracing::instrument;

/// Handle `todo show <id>`
#[instrument(skip(document, output), fields(id = %args.id))]
pub fn handle_show(args: ShowArgs, document: &TodoDocument, output: &mut OutputWriter) -> Result<()> {
    let task = document
        .find_task_by_id(&args.id)?
        .ok_or_else(|| Error::TaskNotFound {
            id: args.id.clone(),
            path: document.path().to_path_buf(),
        })?;

    output.task(&task)
}
