/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `peek_nth`, `advance`) with cancellation and halt checks
/// - Matching / expecting keywords, soft keywords, and punctuation
/// - Layout handling (`skip_newlines`, `expect_newline`, `skip_block`)
/// - Error recording and recovery (`record`, `synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Token access
    // ========================================================================

    /// Return `true` once no more tokens should be read.
    fn halted(&self) -> bool {
        self.cancelled || (self.options.error_policy == ErrorPolicy::FailFast && !self.diagnostics.is_empty())
    }

    fn check_cancelled(&mut self) {
        if !self.cancelled && self.options.is_cancelled() {
            tracing::debug!("cancellation requested");
            self.cancelled = true;
        }
    }

    /// Move lexer diagnostics produced so far into the parser's list.
    fn drain_lexer(&mut self) {
        for diagnostic in self.tokens.take_diagnostics() {
            self.record(diagnostic);
        }
    }

    /// Return the current token without consuming it.
    fn peek(&mut self) -> &Token {
        self.peek_nth(0)
    }

    /// Return the token `n` positions ahead without consuming anything.
    fn peek_nth(&mut self, n: usize) -> &Token {
        self.check_cancelled();
        if !self.halted() {
            self.tokens.peek_nth(n);
            self.drain_lexer();
        }
        if self.halted() {
            &self.eof
        } else {
            self.tokens.peek_nth(n)
        }
    }

    /// Consume and return the current token.
    fn advance(&mut self) -> Token {
        self.check_cancelled();
        if self.halted() {
            return self.eof.clone();
        }
        let token = self.tokens.advance();
        self.drain_lexer();
        token
    }

    fn current_span(&mut self) -> Span {
        self.peek().span
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.tokens.prev_span().end.max(start))
    }

    // ========================================================================
    // Matching
    // ========================================================================

    fn check_punct(&mut self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn check_keyword(&mut self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Contextual keywords (`start`, `set`, `to`, ...) arrive as lower names.
    fn check_soft(&mut self, id: KeywordId) -> bool {
        self.peek().kind.is_lower_name(keywords::as_str(id))
    }

    fn check_newline(&mut self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline)
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Build a "expected X, found Y" error at the current token.
    fn unexpected(&mut self, expected: &str) -> Diagnostic {
        let token = self.peek();
        Diagnostic::syntax(format!("expected {expected}, found {}", token.kind.describe()), token.span)
    }

    fn expect_punct(&mut self, id: PunctuationId, expected: &str) -> PResult<Token> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_soft(&mut self, id: KeywordId) -> PResult<Token> {
        if self.check_soft(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("`{}`", keywords::as_str(id))))
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    fn skip_newlines(&mut self) {
        while self.check_newline() {
            self.advance();
        }
    }

    fn expect_newline(&mut self) -> PResult<()> {
        if self.check_newline() {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("end of line"))
        }
    }

    fn expect_indent(&mut self, expected: &str) -> PResult<()> {
        if matches!(self.peek().kind, TokenKind::Indent) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// At an `Indent`: consume the whole block including its matching `Dedent`.
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ========================================================================
    // Errors and recovery
    // ========================================================================

    /// Record a diagnostic. Under fail-fast only the first one is kept; a cancelled parse keeps none.
    fn record(&mut self, diagnostic: Diagnostic) {
        if self.halted() {
            return;
        }
        tracing::debug!(kind = %diagnostic.kind, message = %diagnostic.message, "recorded diagnostic");
        self.diagnostics.push(diagnostic);
    }

    /// Skip to the start of the next line of the enclosing block.
    ///
    /// Consumes up to and including the next `Newline`, plus any block indented under that line. Stops before a
    /// `Dedent` that closes the current block.
    fn synchronize(&mut self) {
        tracing::trace!(at = self.tokens.prev_span().end, "synchronizing after error");
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::Newline if depth == 0 => {
                    self.advance();
                    if matches!(self.peek().kind, TokenKind::Indent) {
                        self.skip_block();
                    }
                    return;
                }
                TokenKind::Dedent if depth == 0 => return,
                TokenKind::Indent => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::Dedent => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}
