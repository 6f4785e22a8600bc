//! Add command handler

use crate::cli::AddArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use taskdoc_core::TodoDocument;
use tracing::{instrument, warn};

/// Handle `todo add <file>`
#[instrument(skip(document, output), fields(source = %args.source.display()))]
pub fn handle_add(args: AddArgs, document: &TodoDocument, output: &mut OutputWriter) -> Result<()> {
    if !document.add_task_from_file(&args.source)? {
        warn!("Source held no task block");
        return Err(Error::DocumentUnchanged {
            message: format!(
                "Failed to add task from {}: no task block found",
                args.source.display()
            ),
        });
    }

    output.success(&format!(
        "✓ Task added to {} from {}",
        document.path().display(),
        args.source.display()
    ))
}
