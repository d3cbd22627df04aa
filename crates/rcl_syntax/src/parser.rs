//! Parser for the RCL configuration language
//!
//! Pulls tokens from a [`TokenStream`] and builds a [`File`]. Every grammar decision is made with at most three
//! tokens of lookahead.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use rcl_syntax::parser;
//! use rcl_syntax::ast::FileItem;
//!
//! let source = "agent Foo\n  flow Start\n    -> End\n";
//! let file = parser::parse(source).unwrap();
//! assert!(matches!(file.items[0].node, FileItem::Section(_)));
//! ```

use crate::ast::*;
use crate::diagnostics::Diagnostic;
use crate::lexer::{IndentStyle, Token, TokenKind, TokenStream};
use crate::options::{ErrorPolicy, ParseOptions};
use rcl_core::lang::keywords::{self, KeywordId};
use rcl_core::lang::markers;
use rcl_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/sections.rs");
include!("parser/values.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
