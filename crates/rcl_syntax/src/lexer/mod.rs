//! Lexer for the RCL configuration language
//!
//! Handles tokenization including:
//! - Names (Title-case identifiers, lower-case names, `name:` attribute names, `$`/`@` variables)
//! - Literals (strings, numbers, atoms, regexes, boolean/null words)
//! - Nested modes: type tags, interpolated strings, fenced code, block-scalar strings
//! - Indentation-based blocks (INDENT/DEDENT tokens)
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `indent` - indentation stack and INDENT/DEDENT synthesis
//! - `strings` - string, interpolation and type-tag modes
//! - `blocks` - fenced code and block-scalar capture
//! - `stream` - bounded-lookahead token stream used by the parser

mod blocks;
mod indent;
mod stream;
mod strings;
pub mod tokens;


pub use blocks::{shape_block_scalar, shape_fenced_code, RawLine};
pub use indent::{IndentChar, IndentStyle, IndentTracker, Transition};
pub use stream::TokenStream;
pub use tokens::{keyword_id, Token, TokenKind};

use std::collections::VecDeque;

use crate::ast::Span;
use crate::diagnostics::Diagnostic;
use rcl_core::lang::literals;
use rcl_core::lang::markers::{self, Sigil};
use rcl_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Mode stack (top governs scanning):
//
//   Default ──'"'/'"""'──▶ Str ──'#{' / '${'──▶ Interpolation ──'}'──▶ (pop)
//      │                    └──closing quote──▶ (pop)
//      ├──'<'──▶ TypeTag ──'>'──▶ (pop)
//      ├──'$js>>>'──▶ FencedCode ──dedent──▶ (pop)
//      └──'|' '|-' '+|' '+|+'──▶ BlockScalar ──dedent──▶ (pop)
//
// Interpolation scans with the default rules, so strings nest.
// ============================================================================

/// Where inside a type tag the scanner is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagPart {
    Name,
    Content,
    Secondary,
}

#[derive(Debug, Clone)]
enum Mode {
    Default,
    TypeTag { start: usize, part: TagPart },
    Str { start: usize, triple: bool },
    Interpolation { start: usize, depth: usize },
    /// Captured lines waiting to be handed out, one token per call.
    FencedCode(VecDeque<Token>),
    BlockScalar(VecDeque<Token>),
}

/// Copyable view of the top mode, used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeKind {
    Default,
    TypeTag,
    Str,
    Interpolation,
    Block,
}

/// What the previous token was, for the few context-sensitive decisions (`/` as path separator or regex,
/// `-` as sign or list marker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    LineStart,
    Name,
    Other,
}

/// Lexer for RCL source code.
///
/// Pull-based: [`Lexer::next_token`] produces one token at a time. After `Eof` it keeps returning `Eof`.
/// Problems are recorded as diagnostics and scanning continues; read them with [`Lexer::take_diagnostics`].
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    modes: Vec<Mode>,
    indent: IndentTracker,
    at_line_start: bool,
    /// Indentation width of the current logical line; owns block scalars and fenced code opened on it.
    line_indent: usize,
    /// Blank lines seen since the last content line.
    blank_lines: usize,
    /// Open `(` and `{` in the default mode; newlines inside them do not end the line.
    bracket_depth: usize,
    /// The current line has produced a token and still needs its `Newline`.
    needs_newline: bool,
    prev: Prev,
    pending: VecDeque<Token>,
    finished: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            modes: vec![Mode::Default],
            indent: IndentTracker::new(),
            at_line_start: true,
            line_indent: 0,
            blank_lines: 0,
            bracket_depth: 0,
            needs_newline: false,
            prev: Prev::LineStart,
            pending: VecDeque::new(),
            finished: false,
            diagnostics: Vec::new(),
        }
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
            if self.finished {
                return Token::new(TokenKind::Eof, Span::point(self.source.len()));
            }
            match self.mode_kind() {
                ModeKind::Default => self.scan_code(false),
                ModeKind::Interpolation => self.scan_code(true),
                ModeKind::Str => self.scan_string_part(),
                ModeKind::TypeTag => self.scan_type_tag(),
                ModeKind::Block => self.drain_block(),
            }
        }
    }

    /// Drain the diagnostics recorded so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Indentation style inferred so far (fixed by the first indented line).
    pub fn indent_style(&self) -> Option<IndentStyle> {
        self.indent.style()
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.source[start..self.pos]
    }

    /// Consume a word of `[A-Za-z0-9_-]`, stopping before a `-` that starts `->`.
    fn eat_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let hyphen = c == '-' && self.peek_at(1) != Some('>');
            if c.is_ascii_alphanumeric() || c == '_' || hyphen {
                self.pos += 1;
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    /// End of the current physical line (position of its `\n` or end of input).
    fn line_end(&self) -> usize {
        self.rest().find('\n').map(|i| self.pos + i).unwrap_or(self.source.len())
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        self.prev = match &kind {
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent => Prev::LineStart,
            TokenKind::Identifier(_) | TokenKind::LowerName(_) => Prev::Name,
            _ => Prev::Other,
        };
        match &kind {
            TokenKind::Newline => self.needs_newline = false,
            TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof => {}
            _ => self.needs_newline = true,
        }
        self.pending.push_back(Token::new(kind, span));
    }

    fn push_from(&mut self, kind: TokenKind, start: usize) {
        self.push(kind, Span::new(start, self.pos));
    }

    fn error(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(message = %diagnostic.message, start = diagnostic.span.start, "lexical error");
        self.diagnostics.push(diagnostic);
    }

    // ========================================================================
    // Mode stack
    // ========================================================================

    fn mode_kind(&self) -> ModeKind {
        match self.modes.last() {
            None | Some(Mode::Default) => ModeKind::Default,
            Some(Mode::TypeTag { .. }) => ModeKind::TypeTag,
            Some(Mode::Str { .. }) => ModeKind::Str,
            Some(Mode::Interpolation { .. }) => ModeKind::Interpolation,
            Some(Mode::FencedCode(_)) | Some(Mode::BlockScalar(_)) => ModeKind::Block,
        }
    }

    fn push_mode(&mut self, mode: Mode) {
        tracing::trace!(?mode, depth = self.modes.len(), "push lexer mode");
        self.modes.push(mode);
    }

    /// Pop the top mode. The default mode at the bottom is never popped.
    fn pop_mode(&mut self) {
        if self.modes.len() > 1 {
            let mode = self.modes.pop();
            tracing::trace!(?mode, depth = self.modes.len(), "pop lexer mode");
        }
    }

    /// End of input inside a nested mode: report the innermost unterminated construct once, then close every
    /// open mode with its end token so the stream stays well-bracketed.
    fn unwind_modes_at_eof(&mut self) {
        let end = self.source.len();
        let (what, start) = match self.modes.last() {
            Some(Mode::Str { start, triple: true }) => ("triple-quoted string", *start),
            Some(Mode::Str { start, triple: false }) => ("string", *start),
            Some(Mode::Interpolation { start, .. }) => ("interpolation", *start),
            Some(Mode::TypeTag { start, .. }) => ("type tag", *start),
            _ => return,
        };
        self.error(Diagnostic::lexical(
            format!("unterminated {what} at end of input"),
            Span::new(start, end),
        ));
        while self.modes.len() > 1 {
            let closing = match self.modes.last() {
                Some(Mode::Str { triple, .. }) => Some(TokenKind::StringEnd { triple: *triple }),
                Some(Mode::Interpolation { .. }) => Some(TokenKind::InterpolationEnd),
                Some(Mode::TypeTag { .. }) => Some(TokenKind::TypeTagEnd),
                _ => None,
            };
            if let Some(kind) = closing {
                self.push(kind, Span::point(end));
            }
            self.pop_mode();
        }
    }

    /// Queue the end-of-input tokens: a final `Newline` if the last line lacked one, one `Dedent` per open
    /// block, then `Eof`.
    fn end_of_input(&mut self) {
        let end = self.source.len();
        if self.needs_newline {
            self.push(TokenKind::Newline, Span::point(end));
        }
        for _ in 0..self.indent.unwind() {
            self.push(TokenKind::Dedent, Span::point(end));
        }
        self.flush_blank_lines(end);
        self.push(TokenKind::Eof, Span::point(end));
        self.finished = true;
    }

    // ========================================================================
    // Default / interpolation scanning
    // ========================================================================

    /// Scan one step in the default mode, or inside an interpolation (`interpolation == true`), which uses the
    /// same rules except for newlines, braces, and the block openers.
    fn scan_code(&mut self, interpolation: bool) {
        if !interpolation && self.at_line_start && self.bracket_depth == 0 {
            self.handle_line_start();
            if self.at_line_start && self.pos < self.source.len() {
                return;
            }
        }

        let Some(c) = self.peek() else {
            if interpolation {
                self.unwind_modes_at_eof();
            } else {
                self.end_of_input();
            }
            return;
        };
        let start = self.pos;

        match c {
            ' ' | '\t' => {
                self.advance();
            }
            '\n' | '\r' if interpolation => {
                self.error(Diagnostic::lexical(
                    "unterminated interpolation: expected `}` before end of line",
                    Span::point(start),
                ));
                self.pop_mode();
                self.push(TokenKind::InterpolationEnd, Span::point(start));
            }
            '\r' if self.peek_at(1) == Some('\n') => {
                self.advance();
            }
            '\n' => {
                self.advance();
                if self.bracket_depth > 0 && !self.bracket_continues() {
                    tracing::debug!(depth = self.bracket_depth, "open bracket ends at line break");
                    self.bracket_depth = 0;
                }
                if self.bracket_depth == 0 {
                    self.push_from(TokenKind::Newline, start);
                    self.at_line_start = true;
                }
            }
            '#' if !interpolation => {
                self.pos = self.line_end();
            }
            '"' => self.start_string(),
            '<' => {
                self.advance();
                self.push_from(TokenKind::TypeTagStart, start);
                self.push_mode(Mode::TypeTag {
                    start,
                    part: TagPart::Name,
                });
            }
            '{' if interpolation => {
                self.advance();
                self.adjust_interpolation_depth(1);
                self.push_from(TokenKind::Punctuation(PunctuationId::LBrace), start);
            }
            '}' if interpolation => {
                self.advance();
                if self.interpolation_depth() == 0 {
                    self.push_from(TokenKind::InterpolationEnd, start);
                    self.pop_mode();
                } else {
                    self.adjust_interpolation_depth(-1);
                    self.push_from(TokenKind::Punctuation(PunctuationId::RBrace), start);
                }
            }
            '$' if !interpolation && self.code_marker().is_some() => self.scan_embedded_code(),
            '$' | '@' => self.scan_variable(),
            ':' => self.scan_colon(),
            '|' | '+' if !interpolation => self.scan_block_scalar_marker(),
            '/' if self.prev != Prev::Name => self.scan_regex(),
            // A list marker is `-` and a space; `-1` is a number even at the start of a line.
            '-' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_ascii_uppercase() => self.scan_identifier(),
            c if c.is_ascii_lowercase() => self.scan_lower_name(),
            _ => self.scan_punctuation(c),
        }
    }

    /// Whether the line after an open `(` or `{` continues it: the next content line is indented deeper than
    /// the line holding the bracket, or starts by closing it.
    fn bracket_continues(&self) -> bool {
        for line in self.rest().split('\n') {
            let content = line.trim_start_matches([' ', '\t']);
            let indent = line.len() - content.len();
            let content = content.trim_end_matches('\r');
            if content.is_empty() || content.starts_with(markers::COMMENT) {
                continue;
            }
            return indent > self.line_indent || content.starts_with([')', '}']);
        }
        false
    }

    fn interpolation_depth(&self) -> usize {
        match self.modes.last() {
            Some(Mode::Interpolation { depth, .. }) => *depth,
            _ => 0,
        }
    }

    fn adjust_interpolation_depth(&mut self, delta: isize) {
        if let Some(Mode::Interpolation { depth, .. }) = self.modes.last_mut() {
            *depth = depth.saturating_add_signed(delta);
        }
    }

    /// Title-case identifier, possibly several words, or a boolean/null word.
    fn scan_identifier(&mut self) {
        let start = self.pos;
        let first = self.eat_word();
        if let Some(word) = literals::from_str(first) {
            self.push_from(TokenKind::Literal(word), start);
            return;
        }

        let mut words = vec![first];
        loop {
            let save = self.pos;
            let gap = self.eat_while(|c| c == ' ' || c == '\t');
            let continues = !gap.is_empty()
                && self
                    .peek()
                    .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
            if !continues {
                self.pos = save;
                break;
            }
            let word = self.eat_word();
            if literals::from_str(word).is_some() {
                self.pos = save;
                break;
            }
            words.push(word);
        }
        let end = self.pos;
        self.push(TokenKind::Identifier(words.join(" ")), Span::new(start, end));
    }

    /// Lower-case name, attribute name (`name:`), or reserved keyword.
    fn scan_lower_name(&mut self) {
        let start = self.pos;
        let name = self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if self.peek() == Some(markers::ATOM_PREFIX) && self.peek_at(1) != Some(markers::ATOM_PREFIX) {
            self.advance();
            self.push_from(TokenKind::AttributeName(name.to_string()), start);
        } else if let Some(id) = keyword_id(name) {
            self.push_from(TokenKind::Keyword(id), start);
        } else {
            self.push_from(TokenKind::LowerName(name.to_string()), start);
        }
    }

    /// `$name` / `@name`.
    fn scan_variable(&mut self) {
        let start = self.pos;
        let Some(sigil) = self.advance().and_then(Sigil::from_char) else {
            return;
        };
        let name = self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            self.error(
                Diagnostic::lexical(
                    format!("expected a variable name after `{}`", sigil.as_char()),
                    Span::new(start, self.pos),
                )
                .with_hint("variables look like `$name` or `@reply.text`"),
            );
            return;
        }
        self.push_from(
            TokenKind::Variable {
                sigil,
                name: name.to_string(),
            },
            start,
        );
    }

    /// `:atom`, `:"quoted atom"`, `:default`, or a plain `:`.
    fn scan_colon(&mut self) {
        let start = self.pos;
        self.advance();
        match self.peek() {
            Some(markers::QUOTE) => {
                let name = self.scan_quoted_atom(start);
                self.push_from(TokenKind::Atom { name, quoted: true }, start);
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let word = self.eat_word();
                if word == markers::DEFAULT_CASE {
                    self.push_from(TokenKind::DefaultCase, start);
                } else {
                    self.push_from(
                        TokenKind::Atom {
                            name: word.to_string(),
                            quoted: false,
                        },
                        start,
                    );
                }
            }
            _ => self.push_from(TokenKind::Punctuation(PunctuationId::Colon), start),
        }
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += digit_at;
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        let raw = self.source[start..self.pos].to_string();
        self.push_from(TokenKind::Number(raw), start);
    }

    /// `/pattern/flags`; escapes are kept as written.
    fn scan_regex(&mut self) {
        let start = self.pos;
        self.advance();
        let body_start = self.pos;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(Diagnostic::lexical(
                        "unterminated regex literal",
                        Span::new(start, self.pos),
                    ));
                    let pattern = self.source[body_start..self.pos].to_string();
                    self.push_from(
                        TokenKind::Regex {
                            pattern,
                            flags: String::new(),
                        },
                        start,
                    );
                    return;
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some(markers::REGEX_DELIMITER) => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let pattern = self.source[body_start..self.pos].to_string();
        self.advance();
        let flags = self.eat_while(|c| c.is_ascii_lowercase()).to_string();
        self.push_from(TokenKind::Regex { pattern, flags }, start);
    }

    fn scan_punctuation(&mut self, c: char) {
        let start = self.pos;
        let rest = self.rest();
        let Some(id) = punctuation::LONGEST_FIRST
            .iter()
            .copied()
            .find(|id| rest.starts_with(punctuation::as_str(*id)))
        else {
            self.advance();
            self.error(Diagnostic::lexical(
                format!("unexpected character `{}`", c.escape_debug()),
                Span::new(start, self.pos),
            ));
            return;
        };
        self.pos += punctuation::as_str(id).len();
        match id {
            _ if self.mode_kind() != ModeKind::Default => {}
            PunctuationId::LParen | PunctuationId::LBrace => self.bracket_depth += 1,
            PunctuationId::RParen | PunctuationId::RBrace => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1)
            }
            _ => {}
        }
        self.push_from(TokenKind::Punctuation(id), start);
    }
}

// ============================================================================
// Public API
// ============================================================================

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to and including `Eof`, then `None`.
    fn next(&mut self) -> Option<Token> {
        if self.finished && self.pending.is_empty() {
            return None;
        }
        Some(self.next_token())
    }
}

/// Tokenize a complete source buffer.
///
/// Returns the full token stream (ending with `Eof`) when no lexical problem was found.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<Diagnostic>> {
    let (tokens, diagnostics) = tokenize(source);
    if diagnostics.is_empty() {
        Ok(tokens)
    } else {
        Err(diagnostics)
    }
}

/// Tokenize a complete source buffer, keeping the tokens even when diagnostics were recorded.
///
/// Useful for highlighters that want a best-effort stream for broken input.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    let diagnostics = lexer.take_diagnostics();
    (tokens, diagnostics)
}
