//! Bounded-lookahead view over the lexer, used by the parser.
//!
//! Tokens are pulled from the [`Lexer`] on demand into a small buffer. The parser may look at most
//! [`MAX_LOOKAHEAD`] tokens ahead, which keeps every grammar decision local.

use std::collections::VecDeque;

use super::indent::IndentStyle;
use super::tokens::{Token, TokenKind};
use super::Lexer;
use crate::ast::Span;
use crate::diagnostics::Diagnostic;

/// Largest lookahead any production needs (`name Identifier "label"` for message definitions).
pub const MAX_LOOKAHEAD: usize = 3;

pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    buffer: VecDeque<Token>,
    prev_span: Span,
    /// Net `Indent` minus `Dedent` consumed so far.
    depth: i64,
    consumed: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            buffer: VecDeque::with_capacity(MAX_LOOKAHEAD),
            prev_span: Span::default(),
            depth: 0,
            consumed: 0,
        }
    }

    fn fill(&mut self, n: usize) {
        while self.buffer.len() <= n {
            let token = self.lexer.next_token();
            self.buffer.push_back(token);
        }
    }

    /// The current token.
    pub fn peek(&mut self) -> &Token {
        self.peek_nth(0)
    }

    /// The token `n` positions ahead of the current one (`0` is the current token).
    ///
    /// # Panics
    /// Panics in debug builds when `n` reaches [`MAX_LOOKAHEAD`].
    pub fn peek_nth(&mut self, n: usize) -> &Token {
        debug_assert!(n < MAX_LOOKAHEAD, "lookahead {n} exceeds the bound of {MAX_LOOKAHEAD}");
        self.fill(n);
        &self.buffer[n]
    }

    /// Consume and return the current token. At end of input this keeps returning `Eof`.
    pub fn advance(&mut self) -> Token {
        self.fill(0);
        let token = match self.buffer.pop_front() {
            Some(token) => token,
            None => Token::new(TokenKind::Eof, self.prev_span),
        };
        self.depth += i64::from(token.depth_delta());
        self.prev_span = token.span;
        if token.kind != TokenKind::Eof {
            self.consumed += 1;
        }
        token
    }

    /// Span of the last consumed token.
    pub fn prev_span(&self) -> Span {
        self.prev_span
    }

    /// Net block depth of the consumed tokens. Zero once a well-formed stream is fully read.
    pub fn depth(&self) -> i64 {
        self.depth
    }

    /// Number of non-`Eof` tokens consumed.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Drain the lexer diagnostics produced so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.lexer.take_diagnostics()
    }

    pub fn indent_style(&self) -> Option<IndentStyle> {
        self.lexer.indent_style()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut stream = TokenStream::new("agent Support Bot\n");
        assert_eq!(stream.peek_nth(1).kind, TokenKind::Identifier("Support Bot".to_string()));
        assert_eq!(stream.peek().kind, TokenKind::LowerName("agent".to_string()));
        stream.advance();
        assert_eq!(stream.advance().kind, TokenKind::Identifier("Support Bot".to_string()));
        assert_eq!(stream.prev_span(), Span::new(6, 17));
    }

    #[test]
    fn depth_returns_to_zero() {
        let mut stream = TokenStream::new("a\n  b\n    c\n");
        while stream.advance().kind != TokenKind::Eof {}
        assert_eq!(stream.depth(), 0);
        assert_eq!(stream.advance().kind, TokenKind::Eof);
    }
}
