//! CLI module for the RCL tools
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream
//! - `parse <file>` - Parse and print the tree (or a JSON summary)
//! - `fmt <file>` - Format a source file in place, or check it
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

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;

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
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
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

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Lexer, parser and formatter for RCL agent configuration files
#[derive(Parser, Debug)]
#[command(name = "rcl")]
#[command(version = VERSION)]
#[command(about = "Lexer, parser and formatter for RCL agent configuration files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a file
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a file and print its tree
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print a JSON summary instead of the tree
        #[arg(long)]
        json: bool,
        /// Keep going after errors and report all of them
        #[arg(long)]
        batch: bool,
    },

    /// Format a file in place
    Fmt {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Check formatting without modifying the file
        #[arg(long)]
        check: bool,
        /// Show a diff of formatting changes
        #[arg(long)]
        diff: bool,
        /// Indentation width (default: the file's own)
        #[arg(long, value_name = "N")]
        indent: Option<usize>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
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

fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Lex { file, json } => commands::lex_file(&file, json),
        Command::Parse { file, json, batch } => commands::parse_file(&file, json, batch),
        Command::Fmt {
            file,
            check,
            diff,
            indent,
        } => commands::format_file(&file, check, diff, indent),
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
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["rcl", "lex", "bot.rcl", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Lex { json: true, .. }));
    }

    #[test]
    fn test_cli_parse_parse_batch() {
        let cli = Cli::try_parse_from(["rcl", "parse", "bot.rcl", "--batch"]).unwrap();
        if let Command::Parse { batch, json, .. } = cli.command {
            assert!(batch);
            assert!(!json);
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_cli_parse_fmt() {
        let cli = Cli::try_parse_from(["rcl", "fmt", "bot.rcl", "--check", "--indent", "4"]).unwrap();
        if let Command::Fmt { check, indent, .. } = cli.command {
            assert!(check);
            assert_eq!(indent, Some(4));
        } else {
            panic!("Expected Fmt command");
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["rcl"]).is_err());
    }
}
