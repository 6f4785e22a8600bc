//! Validation command handler
//!
//! Without `--fix` this is a schema check only. With `--fix` the whole
//! batch goes through the fixer and, unless `--dry-run` is set, fixed
//! tasks are written back to the document.

use crate::cli::{OutputFormat, ValidateArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use std::sync::Arc;
use taskdoc_core::{
    DocumentTaskStore, TodoDocument, ValidationOptions, ValidationReport, ValidationService,
};
use taskdoc_schemas::JsonSchemaValidator;
use tracing::{debug, info, instrument, warn};

/// Handle `todo validate`
#[instrument(
    skip(document, config, output),
    fields(file = %document.path().display(), fix = args.fix, dry_run = args.dry_run)
)]
pub async fn handle_validate(
    args: ValidateArgs,
    document: &TodoDocument,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details(
        "validate_command",
        &format!("file: {}", document.path().display()),
    );

    let loader = config.schema_loader(args.schema.as_deref());
    debug!(schema = ?loader.location(), "Resolved task schema");
    let service = ValidationService::new(
        Arc::new(JsonSchemaValidator::new(loader)),
        Arc::new(DocumentTaskStore::from_document(document.clone())),
    );

    let tasks = document.list_tasks()?;
    let total = tasks.len();
    info!(count = total, "Loaded tasks");

    if !args.fix {
        return validate_only(&service, &tasks, output);
    }

    let mut options = ValidationOptions::new().with_apply_fixes(!args.dry_run);
    if let Some(pattern) = &args.exclude {
        options = options.with_exclude_pattern(pattern.clone());
    }

    let spinner = output.spinner(&format!("Validating {} task(s)...", total));
    let report = {
        let _fix_timer = Timer::new("validate_and_fix");
        service.validate_and_fix_tasks(tasks, &options, None).await
    };
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let report = report?;

    write_fix_report(&args, &report, total, output)?;

    if !report.valid {
        warn!(errors = report.errors().len(), "Tasks still invalid after fixing");
        return Err(Error::FixesIncomplete {
            count: report.errors().len(),
        });
    }
    Ok(())
}

/// Schema check without fixing
fn validate_only(
    service: &ValidationService,
    tasks: &[taskdoc_core::Task],
    output: &mut OutputWriter,
) -> Result<()> {
    let report = {
        let _timer = Timer::new("schema_validation");
        service.validate_tasks(tasks)?
    };

    if output.format() != OutputFormat::Human {
        output.report(&report)?;
    } else if report.valid {
        output.success(&format!("✓ All {} tasks validate against schema", tasks.len()))?;
    } else {
        output.error_list("Validation errors:", report.errors())?;
    }

    if report.valid {
        Ok(())
    } else {
        Err(Error::ValidationFailed {
            count: report.errors().len(),
        })
    }
}

fn write_fix_report(
    args: &ValidateArgs,
    report: &ValidationReport,
    total: usize,
    output: &mut OutputWriter,
) -> Result<()> {
    if let Some(format) = args.summary {
        if !report.fixes().is_empty() {
            output.fix_summary(format, report)?;
        }
        return output.error_list("Remaining validation errors:", report.errors());
    }

    if output.format() != OutputFormat::Human {
        return output.report(report);
    }

    if report.valid && report.fixes().is_empty() {
        return output.success(&format!("✓ All {} tasks validate against schema", total));
    }

    if report.fixes().is_empty() {
        debug!("No fixes to list");
    } else if args.dry_run {
        output.fix_list(
            &format!("Planned {} fixes (dry-run):", report.fixes().len()),
            report.fixes(),
        )?;
    } else {
        output.fix_list(&format!("Applied {} fixes:", report.fixes_applied()), report.fixes())?;
    }

    if !report.valid {
        return output.error_list("Remaining validation errors:", report.errors());
    }

    if args.dry_run {
        output.success(&format!(
            "Dry-run complete; {} fixes would have been applied.",
            report.fixes().len()
        ))
    } else {
        output.success(&format!(
            "Validation and fixes completed; {} changes written.",
            report.fixes_applied()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TODO: &str = "# TODO

---
id: T-1
summary: Ready
priority: P1
status: open
created: 2024-02-01
updated: 2024-02-01
validations: []
---

---
id: T-2
summary: Needs work
priority: urgent
status: open
created: 2024-02-01
updated: 2024-02-01
validations: []
---
";

    fn setup(content: &str) -> (TempDir, TodoDocument, Config) {
        let dir = TempDir::new().unwrap();
        let todo = dir.path().join("TODO.md");
        let schema = dir.path().join("task.schema.json");
        fs::write(&todo, content).unwrap();
        fs::write(&schema, taskdoc_schemas::BUNDLED_TASK_SCHEMA).unwrap();

        let mut config = Config::default();
        config.paths.schema = Some(PathBuf::from(&schema));
        (dir, TodoDocument::new(todo), config)
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(
            OutputFormat::Human,
            false,
            false,
            0,
            Box::new(std::io::sink()),
            Box::new(std::io::sink()),
        )
    }

    fn args(fix: bool, dry_run: bool) -> ValidateArgs {
        ValidateArgs {
            fix,
            dry_run,
            exclude: None,
            summary: None,
            schema: None,
        }
    }

    #[tokio::test]
    async fn test_validate_only_fails_with_exit_code_4() {
        let (_dir, document, config) = setup(TODO);
        let err = handle_validate(args(false, false), &document, &config, &mut quiet_output())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ValidationFailed { count: 1 }));
        assert_eq!(err.exit_code(), 4);
        assert_eq!(fs::read_to_string(document.path()).unwrap(), TODO);
    }

    #[tokio::test]
    async fn test_fix_writes_document() {
        let (_dir, document, config) = setup(TODO);
        handle_validate(args(true, false), &document, &config, &mut quiet_output())
            .await
            .unwrap();

        let fixed = document.find_task_by_id("T-2").unwrap().unwrap();
        assert_eq!(fixed["priority"], "P2");
        handle_validate(args(false, false), &document, &config, &mut quiet_output())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dry_run_keeps_document() {
        let (_dir, document, config) = setup(TODO);
        handle_validate(args(true, true), &document, &config, &mut quiet_output())
            .await
            .unwrap();
        assert_eq!(fs::read_to_string(document.path()).unwrap(), TODO);
    }

    #[tokio::test]
    async fn test_exclude_skips_broken_task() {
        let (_dir, document, config) = setup(TODO);
        let mut validate = args(false, false);
        validate.fix = true;
        validate.dry_run = true;
        validate.exclude = Some("t-2".to_string());
        handle_validate(validate, &document, &config, &mut quiet_output())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unfixable_task_exits_with_code_5() {
        let (_dir, document, config) = setup("---\nsummary: no id here\n---\n");
        let err = handle_validate(args(true, false), &document, &config, &mut quiet_output())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::FixesIncomplete { count: 1 }));
        assert_eq!(err.exit_code(), 5);
        assert!(err.is_reported());
    }
}
