/// Values, strings, collections and parameter lists.
///
/// Value parsing is driven by the first token. Block-form lists and dictionaries only appear where a value can
/// take the rest of the line (`value_line`), since they start with `Newline Indent`.
impl<'a> Parser<'a> {
    // ========================================================================
    // Value lines
    // ========================================================================

    /// Value of an attribute or dictionary entry: a value line, or [`Value::Omitted`] for a bare `name:`.
    fn entry_value(&mut self) -> PResult<Spanned<Value>> {
        if self.check_newline() && !matches!(self.peek_nth(1).kind, TokenKind::Indent) {
            let span = Span::point(self.tokens.prev_span().end);
            self.advance();
            return Ok(Spanned::new(Value::Omitted, span));
        }
        self.value_line()
    }

    /// An inline value ending its line, or `Newline` followed by a block list or dictionary.
    fn value_line(&mut self) -> PResult<Spanned<Value>> {
        if self.check_newline() && matches!(self.peek_nth(1).kind, TokenKind::Indent) {
            return self.block_collection();
        }
        let value = self.value()?;
        self.expect_newline()?;
        Ok(value)
    }

    /// `Newline Indent` then `- item` lines (list) or `key value` lines (dictionary).
    fn block_collection(&mut self) -> PResult<Spanned<Value>> {
        self.advance();
        let start = self.current_span().start;
        self.advance();
        self.skip_newlines();

        if self.check_punct(PunctuationId::Hyphen) {
            let mut items = Vec::new();
            self.block_lines(|p| {
                p.expect_punct(PunctuationId::Hyphen, "`-` before a list item")?;
                items.push(p.value_line()?);
                Ok(())
            });
            let list = ListValue {
                form: CollectionForm::Block,
                items,
            };
            return Ok(Spanned::new(Value::List(list), self.span_from(start)));
        }

        let mut entries = Vec::new();
        self.block_lines(|p| {
            let entry_start = p.current_span().start;
            let key = p.dict_key()?;
            let value = p.entry_value()?;
            entries.push(Spanned::new(DictEntry { key, value }, p.span_from(entry_start)));
            Ok(())
        });
        let dict = DictValue {
            form: CollectionForm::Block,
            entries,
        };
        Ok(Spanned::new(Value::Dictionary(dict), self.span_from(start)))
    }

    /// Run `line` for each line of the current block until its `Dedent`, recovering per line.
    fn block_lines(&mut self, mut line: impl FnMut(&mut Self) -> PResult<()>) {
        loop {
            match &self.peek().kind {
                TokenKind::Dedent => {
                    self.advance();
                    return;
                }
                TokenKind::Eof => return,
                TokenKind::Newline => {
                    self.advance();
                }
                _ => {
                    if let Err(e) = line(self) {
                        self.record(e);
                        self.synchronize();
                    }
                }
            }
        }
    }

    // ========================================================================
    // Values
    // ========================================================================

    fn value(&mut self) -> PResult<Spanned<Value>> {
        let start = self.current_span().start;
        let value = match &self.peek().kind {
            TokenKind::StringStart { .. } => Value::String(self.string_literal()?),
            TokenKind::Punctuation(PunctuationId::LParen) => Value::List(self.paren_list()?),
            TokenKind::Punctuation(PunctuationId::LBrace) => Value::Dictionary(self.brace_dict()?),
            TokenKind::Variable { .. } => Value::Variable(self.variable_path()?),
            TokenKind::TypeTagStart => Value::TypeTag(self.type_tag()?),
            TokenKind::CodeFenceStart(_) => Value::Code(self.fenced_code()?),
            TokenKind::BlockScalarStart(_) => Value::MultiLine(self.block_scalar()?),
            _ => self.simple_value()?,
        };
        Ok(Spanned::new(value, self.span_from(start)))
    }

    /// Single-token values.
    fn simple_value(&mut self) -> PResult<Value> {
        let token = self.advance();
        match token.kind {
            TokenKind::Regex { pattern, flags } => Ok(Value::Regex(RegexLiteral { pattern, flags })),
            TokenKind::Number(raw) => Ok(Value::Number(number_literal(raw, token.span)?)),
            TokenKind::Literal(word) => Ok(Value::from_literal_word(word)),
            TokenKind::Atom { name, quoted } => Ok(Value::Atom(Atom { name, quoted })),
            TokenKind::Identifier(name) => Ok(Value::Identifier(name)),
            TokenKind::EmbeddedCode { language, code } => Ok(Value::Code(EmbeddedCode {
                language,
                form: CodeForm::Inline,
                code,
            })),
            other => Err(Diagnostic::syntax(
                format!("expected a value, found {}", other.describe()),
                token.span,
            )),
        }
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// `StringStart (text | interpolation)* StringEnd`
    fn string_literal(&mut self) -> PResult<StringLiteral> {
        let open = self.advance();
        let TokenKind::StringStart { triple } = open.kind else {
            return Err(Diagnostic::syntax(
                format!("expected a string, found {}", open.kind.describe()),
                open.span,
            ));
        };
        let mut parts: Vec<StringPart> = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::StringText(_) => {
                    if let TokenKind::StringText(text) = self.advance().kind {
                        match parts.last_mut() {
                            Some(StringPart::Text(prev)) => prev.push_str(&text),
                            _ => parts.push(StringPart::Text(text)),
                        }
                    }
                }
                TokenKind::InterpolationStart => {
                    let start = self.current_span().start;
                    self.advance();
                    let interpolation = self.interpolation()?;
                    if !matches!(self.peek().kind, TokenKind::InterpolationEnd) {
                        return Err(self.unexpected("`}` to close the interpolation"));
                    }
                    self.advance();
                    parts.push(StringPart::Interpolation(Spanned::new(interpolation, self.span_from(start))));
                }
                TokenKind::StringEnd { .. } => {
                    self.advance();
                    break;
                }
                _ => return Err(self.unexpected("the end of the string")),
            }
        }
        Ok(StringLiteral { triple, parts })
    }

    /// Interpolation content: a dotted path (`$user.name`, `name.first`) or any other value.
    fn interpolation(&mut self) -> PResult<Interpolation> {
        match &self.peek().kind {
            TokenKind::Variable { .. } => Ok(Interpolation::Path(self.variable_path()?)),
            TokenKind::LowerName(_) => {
                let root = self.lower_name()?.node;
                let segments = self.path_segments();
                Ok(Interpolation::Path(VariablePath {
                    sigil: None,
                    root,
                    segments,
                }))
            }
            TokenKind::InterpolationEnd => Err(self.unexpected("a value inside the interpolation")),
            _ => Ok(Interpolation::Value(Box::new(self.value()?.node))),
        }
    }

    // ========================================================================
    // Type tags, code, block scalars
    // ========================================================================

    /// `TypeTagStart name [content] [| [content]] TypeTagEnd`
    fn type_tag(&mut self) -> PResult<TypeTag> {
        self.advance();
        let token = self.advance();
        let TokenKind::TypeTagName(type_name) = token.kind else {
            return Err(Diagnostic::syntax(
                format!("expected a type name, found {}", token.kind.describe()),
                token.span,
            ));
        };
        let mut tag = TypeTag {
            type_name,
            content: None,
            secondary: None,
        };
        if let TokenKind::TypeTagContent(_) = &self.peek().kind {
            if let TokenKind::TypeTagContent(content) = self.advance().kind {
                tag.content = Some(content);
            }
        }
        if matches!(self.peek().kind, TokenKind::TypeTagPipe) {
            self.advance();
            tag.secondary = Some(String::new());
            if let TokenKind::TypeTagContent(_) = &self.peek().kind {
                if let TokenKind::TypeTagContent(content) = self.advance().kind {
                    tag.secondary = Some(content);
                }
            }
        }
        if !matches!(self.peek().kind, TokenKind::TypeTagEnd) {
            return Err(self.unexpected("`>` to close the type tag"));
        }
        self.advance();
        Ok(tag)
    }

    /// `CodeFenceStart CodeLine* CodeFenceEnd`; lines are joined with `\n`.
    fn fenced_code(&mut self) -> PResult<EmbeddedCode> {
        let TokenKind::CodeFenceStart(language) = self.advance().kind else {
            return Err(self.unexpected("a code block"));
        };
        let mut lines = Vec::new();
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::CodeLine(line) => lines.push(line),
                TokenKind::CodeFenceEnd => break,
                other => {
                    return Err(Diagnostic::syntax(
                        format!("expected code, found {}", other.describe()),
                        token.span,
                    ));
                }
            }
        }
        Ok(EmbeddedCode {
            language,
            form: CodeForm::Fenced,
            code: lines.join("\n"),
        })
    }

    /// `BlockScalarStart BlockScalarLine* BlockScalarEnd`
    fn block_scalar(&mut self) -> PResult<MultiLineString> {
        let TokenKind::BlockScalarStart(mode) = self.advance().kind else {
            return Err(self.unexpected("a multi-line string"));
        };
        let mut segments = Vec::new();
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::BlockScalarLine { text, newline } => segments.push(TextSegment { text, newline }),
                TokenKind::BlockScalarEnd => break,
                other => {
                    return Err(Diagnostic::syntax(
                        format!("expected multi-line string content, found {}", other.describe()),
                        token.span,
                    ));
                }
            }
        }
        Ok(MultiLineString { mode, segments })
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// `( value, ... )`, possibly empty, trailing comma allowed.
    fn paren_list(&mut self) -> PResult<ListValue> {
        self.advance();
        let mut items = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            items.push(self.value()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "`,` or `)`")?;
        Ok(ListValue {
            form: CollectionForm::Inline,
            items,
        })
    }

    /// `{ key: value, ... }`, possibly empty, trailing comma allowed.
    fn brace_dict(&mut self) -> PResult<DictValue> {
        self.advance();
        let mut entries = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            let start = self.current_span().start;
            let key = self.dict_key()?;
            let value = self.value()?;
            entries.push(Spanned::new(DictEntry { key, value }, self.span_from(start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBrace, "`,` or `}`")?;
        Ok(DictValue {
            form: CollectionForm::Inline,
            entries,
        })
    }

    /// `name:` (attribute-name token), `name :`, or `"quoted": `.
    fn dict_key(&mut self) -> PResult<Spanned<DictKey>> {
        let start = self.current_span().start;
        let spaced_key = matches!(self.peek().kind, TokenKind::LowerName(_))
            && self.peek_nth(1).kind.is_punctuation(PunctuationId::Colon);
        match &self.peek().kind {
            TokenKind::AttributeName(_) => {
                let token = self.advance();
                let TokenKind::AttributeName(name) = token.kind else {
                    return Err(Diagnostic::syntax("expected a key", token.span));
                };
                Ok(Spanned::new(DictKey::Name(name), token.span))
            }
            TokenKind::LowerName(_) if spaced_key => {
                let name = self.lower_name()?;
                self.advance();
                Ok(Spanned::new(DictKey::Name(name.node), self.span_from(start)))
            }
            TokenKind::StringStart { .. } => {
                let key = self.string_literal()?;
                self.expect_punct(PunctuationId::Colon, "`:` after the key")?;
                Ok(Spanned::new(DictKey::Quoted(key), self.span_from(start)))
            }
            _ => Err(self.unexpected("a key (`name:` or `\"name\":`)")),
        }
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Comma-separated parameters, at least one.
    fn param_list(&mut self) -> PResult<Vec<Spanned<Parameter>>> {
        let mut params = vec![self.parameter()?];
        while self.match_punct(PunctuationId::Comma) {
            params.push(self.parameter()?);
        }
        Ok(params)
    }

    /// Named (`size: 3`), keyed (`size : 3`, `"Size": 3`) or positional (`3`).
    fn parameter(&mut self) -> PResult<Spanned<Parameter>> {
        let start = self.current_span().start;
        if let TokenKind::AttributeName(_) = &self.peek().kind {
            let token = self.advance();
            let TokenKind::AttributeName(name) = token.kind else {
                return Err(Diagnostic::syntax("expected a parameter name", token.span));
            };
            let name = Spanned::new(name, token.span);
            let value = if self.peek().kind.is_value_terminator() {
                Spanned::new(Value::Omitted, Span::point(token.span.end))
            } else {
                self.value()?
            };
            return Ok(Spanned::new(Parameter::Named { name, value }, self.span_from(start)));
        }

        if matches!(self.peek().kind, TokenKind::LowerName(_))
            && self.peek_nth(1).kind.is_punctuation(PunctuationId::Colon)
        {
            let name = self.lower_name()?;
            self.advance();
            let key = Spanned::new(DictKey::Name(name.node), self.span_from(start));
            let value = self.value()?;
            return Ok(Spanned::new(Parameter::Keyed { key, value }, self.span_from(start)));
        }

        let value = self.value()?;
        if let Value::String(string) = &value.node {
            if !string.triple && self.check_punct(PunctuationId::Colon) {
                self.advance();
                let key = Spanned::new(DictKey::Quoted(string.clone()), value.span);
                let value = self.value()?;
                return Ok(Spanned::new(Parameter::Keyed { key, value }, self.span_from(start)));
            }
        }
        Ok(Spanned::new(Parameter::Positional(value), self.span_from(start)))
    }
}

fn number_literal(raw: String, span: Span) -> PResult<NumberLiteral> {
    match raw.parse::<f64>() {
        Ok(value) => Ok(NumberLiteral { raw, value }),
        Err(_) => Err(Diagnostic::syntax(format!("invalid number `{raw}`"), span)),
    }
}
