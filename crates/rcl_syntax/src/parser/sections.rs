/// Imports, sections, and body items.
///
/// ## Notes
/// - Body items are chosen by their first token, with up to three tokens of lookahead for message definitions
///   (`name Identifier "label"`).
/// - Transition targets (plain values, flow invocations, context operations) are parsed here because they
///   are shared by `->` lines, match cases and flow handlers.
impl<'a> Parser<'a> {
    // ========================================================================
    // File items
    // ========================================================================

    fn file_item(&mut self) -> PResult<Spanned<FileItem>> {
        let start = self.current_span().start;
        if self.check_keyword(KeywordId::Import) {
            let import = self.import_decl()?;
            return Ok(Spanned::new(FileItem::Import(import), self.span_from(start)));
        }
        match &self.peek().kind {
            TokenKind::LowerName(_) => {
                if self.at_message_definition() {
                    return Err(Diagnostic::syntax(
                        "message definitions must appear inside a section",
                        self.current_span(),
                    ));
                }
                let section = self.section()?;
                Ok(Spanned::new(FileItem::Section(section), self.span_from(start)))
            }
            _ => Err(self.unexpected("`import` or a section")),
        }
    }

    /// `import Shared / Common Flows as Common`
    fn import_decl(&mut self) -> PResult<ImportDecl> {
        self.advance();
        let mut path = vec![self.path_segment()?];
        while self.match_punct(PunctuationId::Slash) {
            path.push(self.path_segment()?);
        }
        let alias = if self.match_keyword(KeywordId::As) {
            Some(self.path_segment()?)
        } else {
            None
        };
        self.expect_newline()?;
        Ok(ImportDecl { path, alias })
    }

    // ========================================================================
    // Sections
    // ========================================================================

    /// `name Identifier "label"` ahead: a message definition rather than a section.
    fn at_message_definition(&mut self) -> bool {
        matches!(self.peek().kind, TokenKind::LowerName(_))
            && matches!(self.peek_nth(1).kind, TokenKind::Identifier(_))
            && matches!(self.peek_nth(2).kind, TokenKind::StringStart { .. })
    }

    fn section(&mut self) -> PResult<Section> {
        let header = self.section_header()?;
        self.expect_newline()?;
        let body = if matches!(self.peek().kind, TokenKind::Indent) {
            self.body()
        } else {
            Vec::new()
        };
        Ok(Section { header, body })
    }

    /// Either `type [Identifier] [params]` or `type "label" [:atom] [params]`.
    fn section_header(&mut self) -> PResult<SectionHeader> {
        let section_type = self.lower_name()?;
        let mut header = SectionHeader::new(section_type);

        if matches!(self.peek().kind, TokenKind::StringStart { .. }) {
            let start = self.current_span().start;
            let label = self.string_literal()?;
            header.label = Some(Spanned::new(label, self.span_from(start)));
            header.atom = self.optional_atom();
        } else if matches!(self.peek().kind, TokenKind::Identifier(_)) {
            header.id = Some(self.identifier()?);
        }
        if !self.check_newline() {
            header.params = self.param_list()?;
        }
        Ok(header)
    }

    /// `Indent item* Dedent`. Errors inside the block are recorded and recovery continues with the next line.
    fn body(&mut self) -> Vec<Spanned<BodyItem>> {
        self.advance();
        let mut items = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::Dedent => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                _ => {
                    let start = self.current_span().start;
                    match self.body_item() {
                        Ok(item) => items.push(Spanned::new(item, self.span_from(start))),
                        Err(e) => {
                            self.record(e);
                            self.synchronize();
                        }
                    }
                }
            }
        }
        items
    }

    fn body_item(&mut self) -> PResult<BodyItem> {
        match &self.peek().kind {
            TokenKind::Newline => {
                self.advance();
                Ok(BodyItem::Blank)
            }
            TokenKind::Punctuation(PunctuationId::Spread) => {
                self.advance();
                let name = self.identifier()?;
                self.expect_newline()?;
                Ok(BodyItem::Spread(SpreadDirective { name }))
            }
            TokenKind::Punctuation(PunctuationId::Arrow) => {
                self.advance();
                let target = self.transition_line()?;
                Ok(BodyItem::Transition(SimpleTransition { target }))
            }
            TokenKind::AttributeName(_) => self.attribute(),
            TokenKind::Keyword(KeywordId::Match) => self.match_block().map(BodyItem::Match),
            TokenKind::Variable { .. } => self.variable_line(),
            TokenKind::Identifier(_) => {
                let start = self.current_span().start;
                let name = self.identifier()?;
                let target = Spanned::new(Value::Identifier(name.node), self.span_from(start));
                self.expect_newline()?;
                Ok(BodyItem::StateReference(StateReference { target }))
            }
            TokenKind::LowerName(_) => {
                if self.at_message_definition() {
                    self.message_definition().map(BodyItem::Message)
                } else {
                    self.section().map(BodyItem::Section)
                }
            }
            TokenKind::Indent => Err(Diagnostic::syntax("unexpected indentation", self.current_span())
                .with_hint("only sections, messages, match blocks and block values take an indented body")),
            _ => Err(self.unexpected("a section, attribute, transition, `match` or `...`")),
        }
    }

    /// `text Welcome "Hello" :transactional`, with an optional indented body.
    fn message_definition(&mut self) -> PResult<MessageDefinition> {
        let message_type = self.lower_name()?;
        let name = self.identifier()?;
        let start = self.current_span().start;
        let label = self.string_literal()?;
        let label = Spanned::new(label, self.span_from(start));
        let atom = self.optional_atom();
        let params = if self.check_newline() {
            Vec::new()
        } else {
            self.param_list()?
        };
        self.expect_newline()?;
        let body = if matches!(self.peek().kind, TokenKind::Indent) {
            self.body()
        } else {
            Vec::new()
        };
        Ok(MessageDefinition {
            message_type,
            name,
            label,
            atom,
            params,
            body,
        })
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// `name: value`, `name:, value`, bare `name:`, or `name:` followed by a block value.
    fn attribute(&mut self) -> PResult<BodyItem> {
        let token = self.advance();
        let TokenKind::AttributeName(name) = token.kind else {
            return Err(Diagnostic::syntax("expected an attribute name", token.span));
        };
        let target = AttributeTarget::Key(Spanned::new(name, token.span));
        let after_comma = self.match_punct(PunctuationId::Comma);
        let value = if after_comma {
            self.value_line()?
        } else {
            self.entry_value()?
        };
        Ok(BodyItem::Attribute(AttributeAssignment {
            target,
            value,
            after_comma,
        }))
    }

    /// A line starting with a variable: `$name = value` binds, anything else is a state reference.
    fn variable_line(&mut self) -> PResult<BodyItem> {
        let start = self.current_span().start;
        let path = self.variable_path()?;
        let path = Spanned::new(path, self.span_from(start));
        if self.match_punct(PunctuationId::Equals) {
            let value = self.value_line()?;
            return Ok(BodyItem::Attribute(AttributeAssignment {
                target: AttributeTarget::Variable(path),
                value,
                after_comma: false,
            }));
        }
        self.expect_newline()?;
        Ok(BodyItem::StateReference(StateReference {
            target: Spanned::new(Value::Variable(path.node), path.span),
        }))
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Transition target, the end of its line, and the handler block of a flow invocation.
    fn transition_line(&mut self) -> PResult<TransitionTarget> {
        let mut target = self.transition_target()?;
        self.expect_line_end(&target)?;
        if let TransitionTarget::Flow(flow) = &mut target {
            if matches!(self.peek().kind, TokenKind::Indent) {
                flow.handlers = self.flow_handlers()?;
            }
        }
        Ok(target)
    }

    fn expect_line_end(&mut self, target: &TransitionTarget) -> PResult<()> {
        let value = match target {
            TransitionTarget::Value(value) => Some(&value.value.node),
            TransitionTarget::Context(op) => op.then.as_ref().map(|then| &then.value.node),
            TransitionTarget::Flow(_) => None,
        };
        match value {
            Some(value) if is_block_collection(value) => Ok(()),
            _ => self.expect_newline(),
        }
    }

    fn transition_target(&mut self) -> PResult<TransitionTarget> {
        let is_flow = self.check_soft(KeywordId::Start) && matches!(self.peek_nth(1).kind, TokenKind::Identifier(_));
        if is_flow {
            self.advance();
            let flow = self.identifier()?;
            let params = if self.match_keyword(KeywordId::With) {
                self.param_list()?
            } else {
                Vec::new()
            };
            return Ok(TransitionTarget::Flow(FlowInvocation {
                flow,
                params,
                handlers: Vec::new(),
            }));
        }
        if self.check_soft(KeywordId::Set) && matches!(self.peek_nth(1).kind, TokenKind::Variable { .. }) {
            self.advance();
            let target = self.spanned_variable_path()?;
            self.expect_soft(KeywordId::To)?;
            let value = self.value()?;
            return self.context_operation(ContextOpKind::Set, target, value);
        }
        for (verb, kind, joiner) in [
            (KeywordId::Append, ContextOpKind::Append, KeywordId::To),
            (KeywordId::Merge, ContextOpKind::Merge, KeywordId::Into),
        ] {
            if self.check_soft(verb) {
                self.advance();
                let value = self.value()?;
                self.expect_soft(joiner)?;
                let target = self.spanned_variable_path()?;
                return self.context_operation(kind, target, value);
            }
        }
        Ok(TransitionTarget::Value(self.contextualized_value()?))
    }

    /// Finish a context operation with its optional `-> next` continuation.
    fn context_operation(
        &mut self,
        kind: ContextOpKind,
        target: Spanned<VariablePath>,
        value: Spanned<Value>,
    ) -> PResult<TransitionTarget> {
        let then = if self.match_punct(PunctuationId::Arrow) {
            Some(Box::new(self.contextualized_value()?))
        } else {
            None
        };
        Ok(TransitionTarget::Context(ContextOperation {
            kind,
            target,
            value,
            then,
        }))
    }

    /// `value [with params]`
    fn contextualized_value(&mut self) -> PResult<ContextualizedValue> {
        let value = self.value()?;
        let params = if self.match_keyword(KeywordId::With) {
            self.param_list()?
        } else {
            Vec::new()
        };
        Ok(ContextualizedValue { value, params })
    }

    /// Indented `on :outcome -> target` lines under a flow invocation.
    fn flow_handlers(&mut self) -> PResult<Vec<Spanned<FlowHandler>>> {
        self.advance();
        let mut handlers = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::Dedent => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.advance();
                }
                _ => {
                    let start = self.current_span().start;
                    match self.flow_handler() {
                        Ok(handler) => handlers.push(Spanned::new(handler, self.span_from(start))),
                        Err(e) => {
                            self.record(e);
                            self.synchronize();
                        }
                    }
                }
            }
        }
        Ok(handlers)
    }

    fn flow_handler(&mut self) -> PResult<FlowHandler> {
        self.expect_soft(KeywordId::On)?;
        let outcome = self.outcome_atom()?;
        self.expect_punct(PunctuationId::Arrow, "`->`")?;
        let target = self.contextualized_value()?;
        self.expect_newline()?;
        Ok(FlowHandler { outcome, target })
    }

    fn outcome_atom(&mut self) -> PResult<Spanned<Atom>> {
        let token = self.advance();
        match token.kind {
            TokenKind::Atom { name, quoted } => Ok(Spanned::new(Atom { name, quoted }, token.span)),
            TokenKind::DefaultCase => Ok(Spanned::new(
                Atom {
                    name: markers::DEFAULT_CASE.to_string(),
                    quoted: false,
                },
                token.span,
            )),
            other => Err(Diagnostic::syntax(
                format!("expected an outcome atom, found {}", other.describe()),
                token.span,
            )),
        }
    }

    // ========================================================================
    // Match blocks
    // ========================================================================

    /// `match value` followed by an indented block of `pattern -> target` cases.
    fn match_block(&mut self) -> PResult<MatchBlock> {
        self.advance();
        let scrutinee = self.value()?;
        self.expect_newline()?;
        self.expect_indent("an indented block of match cases")?;

        let mut cases: Vec<Spanned<MatchCase>> = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::Dedent => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.advance();
                }
                _ => {
                    let start = self.current_span().start;
                    match self.match_case() {
                        Ok(case) => cases.push(Spanned::new(case, self.span_from(start))),
                        Err(e) => {
                            self.record(e);
                            self.synchronize();
                        }
                    }
                }
            }
        }

        let last = cases.len().saturating_sub(1);
        if let Some(misplaced) = cases
            .iter()
            .take(last)
            .find(|case| case.node.pattern.node == MatchPattern::Default)
        {
            let span = misplaced.node.pattern.span;
            self.record(
                Diagnostic::syntax("`:default` must be the last case", span)
                    .with_note("cases are tried in order, so later cases could never match"),
            );
        }
        Ok(MatchBlock { scrutinee, cases })
    }

    fn match_case(&mut self) -> PResult<MatchCase> {
        let pattern = self.match_pattern()?;
        self.expect_punct(PunctuationId::Arrow, "`->` after the match pattern")?;
        let target = self.transition_line()?;
        Ok(MatchCase { pattern, target })
    }

    fn match_pattern(&mut self) -> PResult<Spanned<MatchPattern>> {
        let start = self.current_span().start;
        let pattern = match &self.peek().kind {
            TokenKind::StringStart { .. } => MatchPattern::String(self.string_literal()?),
            TokenKind::DefaultCase => {
                self.advance();
                MatchPattern::Default
            }
            TokenKind::Number(_) | TokenKind::Atom { .. } | TokenKind::Regex { .. } => {
                match self.value()?.node {
                    Value::Number(number) => MatchPattern::Number(number),
                    Value::Atom(atom) => MatchPattern::Atom(atom),
                    Value::Regex(regex) => MatchPattern::Regex(regex),
                    other => {
                        return Err(Diagnostic::syntax(
                            format!("{} is not a match pattern", other.describe()),
                            self.span_from(start),
                        ));
                    }
                }
            }
            _ => return Err(self.unexpected("a match pattern (string, number, atom, regex or `:default`)")),
        };
        Ok(Spanned::new(pattern, self.span_from(start)))
    }
}

/// Block-form collections consume their closing `Dedent` instead of a `Newline`.
fn is_block_collection(value: &Value) -> bool {
    match value {
        Value::List(list) => list.form == CollectionForm::Block,
        Value::Dictionary(dict) => dict.form == CollectionForm::Block,
        _ => false,
    }
}
