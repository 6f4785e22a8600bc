//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) for tasks, validation
//! reports and fix summaries, plus a spinner for long batches.

use crate::cli::{OutputFormat, SummaryFormat};
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use taskdoc_core::types::field_text;
use taskdoc_core::{FixRecord, Task, ValidationReport};
use tracing::trace;

/// Trait for formatting output with specialized support for task types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a single task with its details
    fn format_task(&self, task: &Task) -> Result<String>;

    /// Format a validation report with its fixes and errors
    fn format_report(&self, report: &ValidationReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_task(&self, task: &Task) -> Result<String> {
        match self {
            OutputFormat::Human => format_task_human(task),
            _ => self.format(task),
        }
    }

    fn format_report(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
    err_writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && format == OutputFormat::Human && io::stderr().is_terminal(),
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
            err_writer: Box::new(io::stderr()),
        }
    }

    /// Create an output writer with custom writers for results and errors
    #[allow(dead_code)]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
        err_writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            verbose,
            writer,
            err_writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    fn ewriteln(&mut self, content: &str) -> Result<()> {
        writeln!(self.err_writer, "{}", content)?;
        self.err_writer.flush()?;
        Ok(())
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message to the error stream
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.ewriteln(&message.red().to_string())
        } else {
            self.ewriteln(&format!("ERROR: {}", message))
        }
    }

    /// Write a bullet list to the error stream
    pub fn error_list(&mut self, title: &str, items: &[String]) -> Result<()> {
        if self.format != OutputFormat::Human || items.is_empty() {
            return Ok(());
        }
        self.error(title)?;
        for item in items {
            self.ewriteln(&format!("- {}", item))?;
        }
        Ok(())
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Yaml {
            // serde_yaml output already ends with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write one task in detail
    pub fn task(&mut self, task: &Task) -> Result<()> {
        let formatted = self.format.format_task(task)?;
        if self.format == OutputFormat::Human && self.use_color {
            // Color the heading line only
            let (heading, rest) = formatted.split_once('\n').unwrap_or((formatted.as_str(), ""));
            self.writeln(&heading.bold().to_string())?;
            self.write(rest)?;
            return self.writeln("");
        }
        self.data_or_text(&formatted)
    }

    /// Write the task list: a table for humans, the records otherwise
    pub fn task_list(&mut self, tasks: &[Task]) -> Result<()> {
        if self.format != OutputFormat::Human {
            return self.data(&tasks);
        }

        let rows = tasks
            .iter()
            .map(|task| {
                let priority = field_text(task, "priority");
                vec![
                    field_text(task, "id"),
                    if priority.is_empty() { "P2".to_string() } else { priority },
                    field_text(task, "status"),
                    field_text(task, "summary"),
                ]
            })
            .collect();
        self.table(&["ID", "PRIORITY", "STATUS", "SUMMARY"], rows)
    }

    /// Write a validation report
    pub fn report(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_report(report)?;
        self.data_or_text(&formatted)
    }

    /// Write the machine-readable fix summary
    pub fn fix_summary(&mut self, format: SummaryFormat, report: &ValidationReport) -> Result<()> {
        match format {
            SummaryFormat::Json => {
                let summary = json!({ "fixes": report.fixes(), "errors": report.errors() });
                self.writeln(&serde_json::to_string_pretty(&summary)?)
            }
            SummaryFormat::Csv => self.write(&fixes_csv(report.fixes())),
        }
    }

    /// Write the human listing of fixes, one `- id: field -> new` line each
    pub fn fix_list(&mut self, heading: &str, fixes: &[FixRecord]) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        self.warning(heading)?;
        for fix in fixes {
            self.writeln(&format!("- {}: {} -> {}", fix.id, fix.field, value_text(&fix.new)))?;
        }
        Ok(())
    }

    fn data_or_text(&mut self, formatted: &str) -> Result<()> {
        if self.format == OutputFormat::Yaml {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Check if verbose output should be shown
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose > 0 && self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
            } else {
                self.writeln(&format!("DEBUG: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = join_row(headers.iter().map(|h| h.to_string()), &widths);
        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            self.writeln(&join_row(row.into_iter(), &widths))?;
        }

        Ok(())
    }
}

fn join_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .enumerate()
        .map(|(i, cell)| match widths.get(i) {
            Some(width) => format!("{:width$}", cell, width = width),
            None => cell,
        })
        .collect::<Vec<_>>()
        .join(" │ ")
        .trim_end()
        .to_string()
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Render a fix value the way it reads in a listing
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `id,field,old,new` with every cell quoted
pub fn fixes_csv(fixes: &[FixRecord]) -> String {
    let mut out = String::from("id,field,old,new\n");
    for fix in fixes {
        let old = fix.old.as_ref().map(value_text).unwrap_or_default();
        let cells = [fix.id.as_str(), fix.field.as_str(), &old, &value_text(&fix.new)];
        let line = cells
            .iter()
            .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Format a task for human reading
fn format_task_human(task: &Task) -> Result<String> {
    let owner = field_text(task, "owner");
    let mut output = format!("{} — {}\n", field_text(task, "id"), field_text(task, "summary"));
    output.push_str(&format!("Status: {}\n", field_text(task, "status")));
    output.push_str(&format!(
        "Owner: {}\n",
        if owner.is_empty() { "Unassigned" } else { owner.as_str() }
    ));

    let empty = Value::Object(Default::default());
    output.push_str("\nDetailed requirements:\n");
    output.push_str(&serde_json::to_string_pretty(
        task.get("detailed_requirements").unwrap_or(&empty),
    )?);
    output.push_str("\n\nValidations:\n");
    output.push_str(&serde_json::to_string_pretty(task.get("validations").unwrap_or(&empty))?);

    Ok(output)
}

/// Format a validation report for human reading
fn format_report_human(report: &ValidationReport) -> String {
    let mut output = String::new();

    if report.valid {
        output.push_str("Validation passed");
    } else {
        output.push_str(&format!("Validation failed ({} error(s))", report.errors().len()));
    }
    if let Some(applied) = report.fixes_applied {
        output.push_str(&format!("; {} task(s) written", applied));
    }

    if !report.fixes().is_empty() {
        output.push_str("\n\nFixes:");
        for fix in report.fixes() {
            let old = fix.old.as_ref().map(value_text).unwrap_or_default();
            output.push_str(&format!(
                "\n  {} {}: {:?} -> {:?}",
                fix.id,
                fix.field,
                old,
                value_text(&fix.new)
            ));
        }
    }

    if !report.errors().is_empty() {
        output.push_str("\n\nErrors:");
        for error in report.errors() {
            output.push_str(&format!("\n  • {}", error));
        }
    }

    output
}
