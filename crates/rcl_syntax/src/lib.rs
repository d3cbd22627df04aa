//! Syntax frontend for RCL (lexer, token stream, parser, AST, diagnostics).
//!
//! RCL is an indentation-structured configuration language for conversational agents: nested sections,
//! attributes, transitions and match-based branching. This crate turns source text into a typed token stream
//! and that stream into a [`ast::File`].
//!
//! ## Notes
//!
//! - The lexer is pull-based. The parser asks a [`lexer::TokenStream`] for tokens on demand and never sees more
//!   than three tokens ahead, so the whole token list is never materialized during a parse.
//! - The token stream is also usable on its own (e.g. for highlighting) through [`lexer::lex`] or by iterating a
//!   [`lexer::Lexer`].
//! - Every parse owns its own lexer state; parses of different inputs can run on different threads.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use rcl_syntax::parser;
//!
//! let source = "agent Support\n  flow Start\n    -> Greeting\n";
//! let file = parser::parse(source).unwrap();
//! assert_eq!(file.items.len(), 1);
//! ```
//!
//! ## See also
//!
//! - `rcl_core::lang` for the vocabulary registries used by the lexer.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod token_helpers;
pub mod visit;

pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use options::{CancellationToken, ErrorPolicy, ParseOptions};
