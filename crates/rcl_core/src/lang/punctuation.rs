//! Punctuation vocabulary.
//!
//! Delimiters, separators, and the structural markers of the default lexer mode. Marker spellings that
//! switch the lexer into a nested mode (type tags, block scalars, embedded code) live in
//! [`crate::lang::markers`].
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - [`LONGEST_FIRST`] lists multi-character spellings before their prefixes, which is the order a
//!   maximal-munch scanner has to try them in.
//!
//! ## Examples
//! ```rust
//! use rcl_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("->"), Some(PunctuationId::Arrow));
//! assert_eq!(punctuation::as_str(PunctuationId::Spread), "...");
//! ```

use super::registry::{Since, Stability};

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// Separators like `,` and `:`.
    Separator,
    /// Path markers like `.` and `/`.
    Access,
    /// The transition arrow.
    Arrow,
    /// Misc markers like `...`, `-`, `=`.
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    Comma,
    Colon,
    Dot,
    Slash,
    Arrow,
    Spread,
    Hyphen,
    Equals,
    LParen,
    RParen,
    LBrace,
    RBrace,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator),
    info(PunctuationId::Dot, ".", PunctuationCategory::Access),
    info(PunctuationId::Slash, "/", PunctuationCategory::Access),
    info(PunctuationId::Arrow, "->", PunctuationCategory::Arrow),
    info(PunctuationId::Spread, "...", PunctuationCategory::Marker),
    info(PunctuationId::Hyphen, "-", PunctuationCategory::Marker),
    info(PunctuationId::Equals, "=", PunctuationCategory::Marker),
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter),
];

/// Multi-character spellings first, so `->` wins over `-` and `...` over `.`.
pub const LONGEST_FIRST: &[PunctuationId] = &[
    PunctuationId::Spread,
    PunctuationId::Arrow,
    PunctuationId::Comma,
    PunctuationId::Colon,
    PunctuationId::Dot,
    PunctuationId::Slash,
    PunctuationId::Hyphen,
    PunctuationId::Equals,
    PunctuationId::LParen,
    PunctuationId::RParen,
    PunctuationId::LBrace,
    PunctuationId::RBrace,
];

/// Return the canonical spelling for a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Return the full metadata record for a punctuation token.
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}
