//! RCL language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: keywords (reserved and
//! contextual), punctuation, literal words (booleans and nulls), and the markers that switch
//! the lexer into one of its nested modes.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `PunctuationId`) and look up spellings
//! and metadata via registry tables instead of matching on string literals.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings for shared use (diagnostics,
//!   formatting, highlighting).
//!
//! ## Examples
//! ```rust
//! use rcl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("match"), Some(KeywordId::Match));
//! assert_eq!(keywords::as_str(KeywordId::Match), "match");
//! ```

pub mod keywords;
pub mod literals;
pub mod markers;
pub mod punctuation;
pub mod registry;
