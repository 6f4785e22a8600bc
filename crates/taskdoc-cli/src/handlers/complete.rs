//! Complete command handler

use crate::cli::CompleteArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use serde_json::json;
use taskdoc_core::{Changelog, TodoDocument};
use tracing::instrument;

/// Handle `todo complete <id>`: move the task into the changelog
#[instrument(skip(document, config, output), fields(id = %args.id, dry_run = args.dry_run))]
pub fn handle_complete(
    args: CompleteArgs,
    document: &TodoDocument,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let changelog = Changelog::new(config.changelog_path(args.changelog.as_deref()));
    let not_found = || Error::TaskNotFound {
        id: args.id.clone(),
        path: document.path().to_path_buf(),
    };

    if args.dry_run {
        if document.find_task_by_id(&args.id)?.is_none() {
            return Err(not_found());
        }
        let preview = changelog.preview_complete(document, &args.id)?;
        if output.format() == crate::cli::OutputFormat::Human {
            output.warning("Dry run preview:")?;
            return output.writeln(&preview);
        }
        return output.data(&json!({ "id": args.id, "dryRun": true, "preview": preview }));
    }

    let entry = changelog
        .complete_task(document, &args.id, args.message.as_deref())?
        .ok_or_else(not_found)?;

    output.success(&format!(
        "✓ Task {} completed and moved to {} Unreleased",
        args.id,
        changelog.path().display()
    ))?;
    if output.format() != crate::cli::OutputFormat::Human {
        output.data(&json!({ "id": args.id, "entry": entry }))?;
    }
    Ok(())
}
