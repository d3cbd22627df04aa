/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level file loop.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
type PResult<T> = Result<T, Diagnostic>;

/// Parser state.
///
/// ## Notes
/// - Lexer diagnostics are moved into the parser's list as soon as the tokens that caused them are pulled.
/// - Once the parse is halted (cancellation, or any diagnostic under fail-fast) every token read returns a
///   synthetic `Eof`, so all productions unwind without consuming more input.
pub struct Parser<'a> {
    tokens: TokenStream<'a>,
    diagnostics: Vec<Diagnostic>,
    options: ParseOptions,
    cancelled: bool,
    eof: Token,
}

impl<'a> Parser<'a> {
    /// Create a parser over `source`.
    pub fn new(source: &'a str, options: &ParseOptions) -> Self {
        Self {
            tokens: TokenStream::new(source),
            diagnostics: Vec::new(),
            options: options.clone(),
            cancelled: false,
            eof: Token::new(TokenKind::Eof, Span::point(source.len())),
        }
    }

    /// Parse the whole input into a [`File`], keeping every item that parsed.
    ///
    /// Problems are collected in the parser; [`Parser::finish`] decides what the caller gets.
    pub fn parse_file(&mut self) -> File {
        let mut items = Vec::new();
        loop {
            self.skip_newlines();
            match &self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::Indent => {
                    let span = self.current_span();
                    self.record(
                        Diagnostic::syntax("unexpected indentation at top level", span)
                            .with_hint("top-level imports and sections start in column 1"),
                    );
                    self.skip_block();
                }
                TokenKind::Dedent => {
                    self.advance();
                }
                _ => match self.file_item() {
                    Ok(item) => items.push(item),
                    Err(e) => {
                        self.record(e);
                        self.synchronize();
                    }
                },
            }
        }
        File { items }
    }

    /// Check the block-nesting invariant and package the result according to the error policy.
    pub fn finish(mut self, file: File) -> ParseOutput {
        let indent_style = self.tokens.indent_style();
        if self.cancelled || self.options.is_cancelled() {
            tracing::debug!(consumed = self.tokens.consumed(), "parse cancelled");
            return ParseOutput {
                file: None,
                diagnostics: vec![Diagnostic::cancelled(Span::point(self.tokens.prev_span().end))],
                indent_style,
            };
        }
        if !self.halted() && self.tokens.depth() != 0 {
            let depth = self.tokens.depth();
            self.diagnostics.push(Diagnostic::structural(
                format!("unbalanced block structure: {depth} block(s) left open"),
                self.tokens.prev_span(),
            ));
        }

        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_key(|d| d.span.start);
        let file = match self.options.error_policy {
            ErrorPolicy::FailFast if !diagnostics.is_empty() => None,
            _ => Some(file),
        };
        ParseOutput {
            file,
            diagnostics,
            indent_style,
        }
    }
}
