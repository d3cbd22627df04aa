//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy
//! to work with ID-based tokens.

use crate::lexer::TokenKind;
use rcl_core::lang::keywords::{self, KeywordId};
use rcl_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for a lower-case name with exactly this spelling (contextual keywords like `start`).
    pub fn is_lower_name(&self, name: &str) -> bool {
        matches!(self, TokenKind::LowerName(n) if n == name)
    }

    /// Spelling of a name that may follow `.` in a path. Keyword spellings count, so `@user.as` is a path.
    pub fn path_segment_name(&self) -> Option<&str> {
        match self {
            TokenKind::LowerName(name) => Some(name),
            TokenKind::Keyword(id) => Some(keywords::as_str(*id)),
            _ => None,
        }
    }

    /// Return `true` for tokens that end a parameter or inline collection element.
    pub fn is_value_terminator(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline
                | TokenKind::Eof
                | TokenKind::Punctuation(PunctuationId::Comma)
                | TokenKind::Punctuation(PunctuationId::RParen)
                | TokenKind::Punctuation(PunctuationId::RBrace)
        )
    }
}
