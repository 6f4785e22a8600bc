//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Taskdoc CLI - manage and validate the tasks kept in TODO.md
///
/// Tasks are YAML blocks between `---` lines. The CLI lists and shows them,
/// moves finished ones to the changelog and checks every block against the
/// task schema, repairing common defects on request.
#[derive(Parser, Debug)]
#[command(
    name = "taskdoc",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TASKDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with the tasks in TODO.md
    Todo(TodoArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the todo command group
#[derive(Parser, Debug)]
pub struct TodoArgs {
    /// Task document (defaults to the configured path, then ./TODO.md)
    #[arg(long, global = true, value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub action: TodoAction,
}

/// Task actions
#[derive(Subcommand, Debug)]
pub enum TodoAction {
    /// List every task
    List,

    /// Show one task in detail
    Show(ShowArgs),

    /// Append the first task block found in another file
    Add(AddArgs),

    /// Move a task to the changelog
    Complete(CompleteArgs),

    /// Check every task against the schema, optionally fixing them
    Validate(ValidateArgs),
}

/// Arguments for todo show
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Task id
    pub id: String,
}

/// Arguments for todo add
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// File holding the task block
    #[arg(value_name = "FILE")]
    pub source: PathBuf,
}

/// Arguments for todo complete
#[derive(Parser, Debug)]
pub struct CompleteArgs {
    /// Task id
    pub id: String,

    /// Note appended to the changelog entry
    #[arg(short, long)]
    pub message: Option<String>,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Changelog file (defaults to the configured path, then ./CHANGELOG.md)
    #[arg(long, value_name = "FILE")]
    pub changelog: Option<PathBuf>,
}

/// Arguments for todo validate
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Repair common defects
    #[arg(long)]
    pub fix: bool,

    /// With --fix, report the repairs without writing them
    #[arg(long, requires = "fix")]
    pub dry_run: bool,

    /// Skip tasks whose id, owner or summary match this pattern (`*` is a wildcard)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Option<String>,

    /// Print the fix summary in a machine-readable format
    #[arg(long, value_enum, requires = "fix")]
    pub summary: Option<SummaryFormat>,

    /// Schema file overriding the configured one
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Machine-readable fix summaries
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// `{"fixes": [...], "errors": [...]}`
    Json,
    /// `id,field,old,new` rows
    Csv,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::Todo(TodoArgs {
                file: None,
                action: TodoAction::List,
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_validate_flags() {
        let cli = Cli::parse_from([
            "taskdoc", "todo", "validate", "--fix", "--dry-run", "--exclude", "T-1*", "--summary", "csv",
        ]);
        let Commands::Todo(TodoArgs {
            action: TodoAction::Validate(args),
            ..
        }) = cli.command
        else {
            panic!("expected todo validate");
        };
        assert!(args.fix && args.dry_run);
        assert_eq!(args.exclude.as_deref(), Some("T-1*"));
        assert_eq!(args.summary, Some(SummaryFormat::Csv));
    }

    #[test]
    fn test_dry_run_requires_fix() {
        assert!(Cli::try_parse_from(["taskdoc", "todo", "validate", "--dry-run"]).is_err());
    }

    #[test]
    fn test_global_file_flag() {
        let cli = Cli::try_parse_from(["taskdoc", "todo", "show", "T-1", "--file", "docs/TODO.md"]).unwrap();
        let Commands::Todo(args) = cli.command else {
            panic!("expected todo");
        };
        assert_eq!(args.file, Some(PathBuf::from("docs/TODO.md")));
    }
}
