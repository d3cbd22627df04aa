/// Small name and path productions shared by the other chunks.
impl<'a> Parser<'a> {
    fn lower_name(&mut self) -> PResult<Spanned<Ident>> {
        let token = self.advance();
        match token.kind {
            TokenKind::LowerName(name) => Ok(Spanned::new(name, token.span)),
            other => Err(Diagnostic::syntax(
                format!("expected a lower-case name, found {}", other.describe()),
                token.span,
            )),
        }
    }

    fn identifier(&mut self) -> PResult<Spanned<Ident>> {
        let token = self.advance();
        match token.kind {
            TokenKind::Identifier(name) => Ok(Spanned::new(name, token.span)),
            other => Err(Diagnostic::syntax(
                format!("expected an identifier, found {}", other.describe()),
                token.span,
            )),
        }
    }

    /// One segment of an import path: either kind of name.
    fn path_segment(&mut self) -> PResult<Spanned<Ident>> {
        match &self.peek().kind {
            TokenKind::Identifier(_) => self.identifier(),
            TokenKind::LowerName(_) => self.lower_name(),
            _ => Err(self.unexpected("an import path segment")),
        }
    }

    fn optional_atom(&mut self) -> Option<Spanned<Atom>> {
        if !matches!(self.peek().kind, TokenKind::Atom { .. }) {
            return None;
        }
        let token = self.advance();
        match token.kind {
            TokenKind::Atom { name, quoted } => Some(Spanned::new(Atom { name, quoted }, token.span)),
            _ => None,
        }
    }

    /// `.name` segments after a path root.
    fn path_segments(&mut self) -> Vec<Ident> {
        let mut segments = Vec::new();
        while self.check_punct(PunctuationId::Dot) {
            let Some(name) = self.peek_nth(1).kind.path_segment_name().map(str::to_string) else {
                break;
            };
            self.advance();
            self.advance();
            segments.push(name);
        }
        segments
    }

    /// `$name.a.b` or `@name.a.b`
    fn variable_path(&mut self) -> PResult<VariablePath> {
        let token = self.advance();
        let TokenKind::Variable { sigil, name } = token.kind else {
            return Err(Diagnostic::syntax(
                format!("expected a variable, found {}", token.kind.describe()),
                token.span,
            ));
        };
        let segments = self.path_segments();
        Ok(VariablePath {
            sigil: Some(sigil),
            root: name,
            segments,
        })
    }

    fn spanned_variable_path(&mut self) -> PResult<Spanned<VariablePath>> {
        let start = self.current_span().start;
        let path = self.variable_path()?;
        Ok(Spanned::new(path, self.span_from(start)))
    }
}
