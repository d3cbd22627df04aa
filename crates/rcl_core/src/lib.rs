//! Provide the canonical vocabulary of the RCL configuration language.
//!
//! This crate is intentionally small and dependency-free. It holds the spellings the lexer
//! recognizes and the printer emits, so both sides agree without repeating string literals.
//!
//! ## Notes
//!
//! - No IO, no global state, no syntax-tree types.
//! - Every vocabulary item is addressed through a stable id (e.g. [`lang::keywords::KeywordId`]).

pub mod lang;
