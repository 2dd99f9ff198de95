//! CLI module for the UDON layout tools
//!
//! ## Commands
//!
//! - `tokens <file>` - Dump the token stream (default action when only a file is given)
//! - `state <file>` - Dump the token stream with the serialized scanner state after each token
//! - `check <file>` - Report layout lints; exits with 1 if any are found
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::{DumpConfig, OutputFormat};
use crate::version::UDON_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Layout scanner tools for UDON documents
#[derive(Parser, Debug)]
#[command(name = "udon")]
#[command(version = UDON_VERSION)]
#[command(about = "Layout scanner tools for UDON documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to tokenize (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub dump: DumpArgs,
}

/// Output flags shared by the dump commands.
#[derive(Args, Debug, Clone, Default)]
pub struct DumpArgs {
    /// Print JSON instead of one token per line
    #[arg(long, global = true)]
    pub json: bool,

    /// Print byte spans
    #[arg(long, global = true)]
    pub spans: bool,

    /// Do not print token text
    #[arg(long = "no-text", global = true)]
    pub no_text: bool,

    /// Print only tokens produced by the layout scanner
    #[arg(long = "external-only", global = true)]
    pub external_only: bool,
}

impl DumpArgs {
    pub fn to_config(&self) -> DumpConfig {
        let format = if self.json { OutputFormat::Json } else { OutputFormat::Text };
        DumpConfig::new()
            .with_format(format)
            .with_spans(self.spans)
            .with_text(!self.no_text)
            .with_external_only(self.external_only)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dump the token stream
    Tokens {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Dump tokens with the serialized scanner state after each one
    State {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Report layout lints
    Check {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.dump.to_config();
    match cli.command {
        Some(Command::Tokens { file }) => commands::tokens_file(&file.to_string_lossy(), &config),
        Some(Command::State { file }) => commands::state_file(&file.to_string_lossy(), &config),
        Some(Command::Check { file }) => commands::check_file(&file.to_string_lossy()),
        None => {
            // Default: dump tokens of the file if provided
            if let Some(file) = cli.file {
                commands::tokens_file(&file.to_string_lossy(), &config)
            } else {
                Err(CliError::failure("Error: no input file (try `udon --help`)"))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_tokens() {
        let cli = Cli::try_parse_from(["udon", "tokens", "doc.udon"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Tokens { .. })));
    }

    #[test]
    fn test_cli_parse_state_and_check() {
        let cli = Cli::try_parse_from(["udon", "state", "doc.udon"]).unwrap();
        assert!(matches!(cli.command, Some(Command::State { .. })));

        let cli = Cli::try_parse_from(["udon", "check", "doc.udon"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Check { .. })));
    }

    #[test]
    fn test_cli_parse_default_file() {
        let cli = Cli::try_parse_from(["udon", "doc.udon"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("doc.udon")));
    }

    #[test]
    fn test_cli_dump_flags_map_to_config() {
        let cli = Cli::try_parse_from(["udon", "tokens", "doc.udon", "--json", "--spans", "--no-text"]).unwrap();
        let config = cli.dump.to_config();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.show_spans);
        assert!(!config.show_text);
        assert!(!config.external_only);
    }

    #[test]
    fn test_cli_default_flags() {
        let cli = Cli::try_parse_from(["udon", "doc.udon", "--external-only"]).unwrap();
        let config = cli.dump.to_config();
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.show_text);
        assert!(config.external_only);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cli = Cli::try_parse_from(["udon"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
