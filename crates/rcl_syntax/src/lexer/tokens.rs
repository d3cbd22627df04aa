//! Token types for the RCL lexer.
//!
//! Vocabulary tokens carry **registry-backed IDs**:
//! - `Keyword(KeywordId)` for reserved words
//! - `Punctuation(PunctuationId)` for punctuation
//! - `Literal(LiteralWordId)` for boolean and null words
//!
//! Nested lexer modes surface as bracketing token pairs (`StringStart`/`StringEnd`, `TypeTagStart`/`TypeTagEnd`,
//! `CodeFenceStart`/`CodeFenceEnd`, `BlockScalarStart`/`BlockScalarEnd`) with content tokens in between.
//!
//! ## Notes
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use rcl_core::lang::keywords::{self, KeywordId};
use rcl_core::lang::literals::LiteralWordId;
use rcl_core::lang::markers::{CodeLanguage, Sigil, TrimMode};
use rcl_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Vocabulary (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),
    Literal(LiteralWordId),

    // ========== Names ==========
    /// Title-case name, possibly several words (`Customer Support`).
    Identifier(String),
    /// `[a-z][A-Za-z0-9_]*`: section types, path segments, keys.
    LowerName(String),
    /// A lower name directly followed by `:`; the colon is part of the token.
    AttributeName(String),
    /// `$name` or `@name`.
    Variable { sigil: Sigil, name: String },

    // ========== Simple literals ==========
    Atom { name: String, quoted: bool },
    /// `:default`
    DefaultCase,
    Number(String),
    Regex { pattern: String, flags: String },
    /// `$js> code` up to end of line.
    EmbeddedCode { language: CodeLanguage, code: String },

    // ========== Strings (TripleQuotedString / Interpolation modes) ==========
    StringStart { triple: bool },
    /// Unescaped text between interpolations.
    StringText(String),
    InterpolationStart,
    InterpolationEnd,
    StringEnd { triple: bool },

    // ========== Type tags (TypeTag mode) ==========
    TypeTagStart,
    TypeTagName(String),
    TypeTagContent(String),
    TypeTagPipe,
    TypeTagEnd,

    // ========== Fenced code (FencedCode mode) ==========
    CodeFenceStart(CodeLanguage),
    CodeLine(String),
    CodeFenceEnd,

    // ========== Block scalars (BlockScalarString mode) ==========
    BlockScalarStart(TrimMode),
    BlockScalarLine { text: String, newline: bool },
    BlockScalarEnd,

    // ========== Layout ==========
    Newline,
    Indent,
    Dedent,

    // ========== Special ==========
    Eof,
}

impl TokenKind {
    /// Short human-readable description, used in diagnostics (`found end of line`).
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(id) => format!("keyword `{}`", keywords::as_str(*id)),
            TokenKind::Punctuation(id) => format!("`{}`", rcl_core::lang::punctuation::as_str(*id)),
            TokenKind::Literal(id) => format!("`{}`", rcl_core::lang::literals::as_str(*id)),
            TokenKind::Identifier(name) => format!("identifier `{name}`"),
            TokenKind::LowerName(name) => format!("name `{name}`"),
            TokenKind::AttributeName(name) => format!("attribute `{name}:`"),
            TokenKind::Variable { sigil, name } => format!("variable `{}{name}`", sigil.as_char()),
            TokenKind::Atom { name, .. } => format!("atom `:{name}`"),
            TokenKind::DefaultCase => "`:default`".to_string(),
            TokenKind::Number(raw) => format!("number `{raw}`"),
            TokenKind::Regex { .. } => "regex".to_string(),
            TokenKind::EmbeddedCode { .. } => "embedded code".to_string(),
            TokenKind::StringStart { .. } => "string".to_string(),
            TokenKind::StringText(_) => "string text".to_string(),
            TokenKind::InterpolationStart => "interpolation".to_string(),
            TokenKind::InterpolationEnd => "`}`".to_string(),
            TokenKind::StringEnd { .. } => "end of string".to_string(),
            TokenKind::TypeTagStart => "type tag".to_string(),
            TokenKind::TypeTagName(_) | TokenKind::TypeTagContent(_) => "type tag content".to_string(),
            TokenKind::TypeTagPipe => "`|`".to_string(),
            TokenKind::TypeTagEnd => "`>`".to_string(),
            TokenKind::CodeFenceStart(_) => "code block".to_string(),
            TokenKind::CodeLine(_) => "code line".to_string(),
            TokenKind::CodeFenceEnd => "end of code block".to_string(),
            TokenKind::BlockScalarStart(_) => "multi-line string".to_string(),
            TokenKind::BlockScalarLine { .. } => "multi-line string content".to_string(),
            TokenKind::BlockScalarEnd => "end of multi-line string".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Indent => "indented block".to_string(),
            TokenKind::Dedent => "end of block".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }

    /// Stable variant name for machine-readable output (`--json`, snapshots).
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_) => "Keyword",
            TokenKind::Punctuation(_) => "Punctuation",
            TokenKind::Literal(_) => "Literal",
            TokenKind::Identifier(_) => "Identifier",
            TokenKind::LowerName(_) => "LowerName",
            TokenKind::AttributeName(_) => "AttributeName",
            TokenKind::Variable { .. } => "Variable",
            TokenKind::Atom { .. } => "Atom",
            TokenKind::DefaultCase => "DefaultCase",
            TokenKind::Number(_) => "Number",
            TokenKind::Regex { .. } => "Regex",
            TokenKind::EmbeddedCode { .. } => "EmbeddedCode",
            TokenKind::StringStart { .. } => "StringStart",
            TokenKind::StringText(_) => "StringText",
            TokenKind::InterpolationStart => "InterpolationStart",
            TokenKind::InterpolationEnd => "InterpolationEnd",
            TokenKind::StringEnd { .. } => "StringEnd",
            TokenKind::TypeTagStart => "TypeTagStart",
            TokenKind::TypeTagName(_) => "TypeTagName",
            TokenKind::TypeTagContent(_) => "TypeTagContent",
            TokenKind::TypeTagPipe => "TypeTagPipe",
            TokenKind::TypeTagEnd => "TypeTagEnd",
            TokenKind::CodeFenceStart(_) => "CodeFenceStart",
            TokenKind::CodeLine(_) => "CodeLine",
            TokenKind::CodeFenceEnd => "CodeFenceEnd",
            TokenKind::BlockScalarStart(_) => "BlockScalarStart",
            TokenKind::BlockScalarLine { .. } => "BlockScalarLine",
            TokenKind::BlockScalarEnd => "BlockScalarEnd",
            TokenKind::Newline => "Newline",
            TokenKind::Indent => "Indent",
            TokenKind::Dedent => "Dedent",
            TokenKind::Eof => "Eof",
        }
    }
}

/// A token with its kind and source span.
///
/// The lexeme is not stored; [`Token::lexeme`] slices it out of the source. Synthetic tokens (`Dedent`, `Eof`,
/// end-of-construct markers, a final `Newline` added at end of input) have zero-width spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The exact source text covered by this token.
    pub fn lexeme<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.start..self.span.end).unwrap_or("")
    }

    /// Block nesting change: `+1` for `Indent`, `-1` for `Dedent`, `0` otherwise.
    pub fn depth_delta(&self) -> i32 {
        match self.kind {
            TokenKind::Indent => 1,
            TokenKind::Dedent => -1,
            _ => 0,
        }
    }
}

/// Resolve a lower-case spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::reserved_from_str(name)
}
