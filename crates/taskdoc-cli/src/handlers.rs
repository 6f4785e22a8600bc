//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//! Every `todo` action resolves its task document the same way: the
//! `--file` flag, then the configured path.

mod add;
mod complete;
mod completions;
mod list;
mod show;
mod validate;

pub use add::handle_add;
pub use complete::handle_complete;
pub use completions::handle_completions;
pub use list::handle_list;
pub use show::handle_show;
pub use validate::handle_validate;

use crate::cli::{TodoAction, TodoArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::Path;
use taskdoc_core::TodoDocument;

/// Dispatch a `todo` action
pub async fn handle_todo(args: TodoArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let document = open_document(config, args.file.as_deref())?;

    match args.action {
        TodoAction::List => handle_list(&document, output),
        TodoAction::Show(show) => handle_show(show, &document, output),
        TodoAction::Add(add) => handle_add(add, &document, output),
        TodoAction::Complete(complete) => handle_complete(complete, &document, config, output),
        TodoAction::Validate(validate) => {
            handle_validate(validate, &document, config, output).await
        }
    }
}

/// Resolve the task document, failing when it does not exist
fn open_document(config: &Config, explicit: Option<&Path>) -> Result<TodoDocument> {
    let document = TodoDocument::new(config.todo_path(explicit));
    if !document.exists() {
        return Err(Error::FileNotFound {
            path: document.path().to_path_buf(),
        });
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("TODO.md");
        let err = open_document(&Config::default(), Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { ref path } if path == &missing));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_configured_document_is_used() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.md");
        std::fs::write(&path, "# TODO\n").unwrap();

        let mut config = Config::default();
        config.paths.todo = PathBuf::from(&path);
        let document = open_document(&config, None).unwrap();
        assert_eq!(document.path(), path.as_path());
    }
}
