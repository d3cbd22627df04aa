#![forbid(unsafe_code)]
//! RCL: lexer, parser and canonical printer for the RCL agent configuration language
//!
//! RCL describes conversational agents as indentation-structured sections with attributes, transitions and
//! match-based branching. This crate bundles the syntax frontend (`rcl_syntax`), the canonical printer and the
//! `rcl` command line tool.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`. Malformed input is always reported as diagnostics, never as a panic.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: Registry lookups keyed by a closed enum use `.expect` with a clear explanation.

pub mod cli;
pub mod format;

pub use rcl_syntax::{ast, diagnostics, lexer, parser, visit};
pub use rcl_syntax::{CancellationToken, Diagnostic, DiagnosticKind, ErrorPolicy, ParseOptions, Severity};

pub use format::{FormatConfig, check_formatted, format_diff, format_file, format_source, format_source_with_config, line_diff};
