/// Public parsing entrypoints.

/// Result of a parse: the tree (if the policy allows one), every diagnostic in source order, and the
/// indentation style the lexer settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub file: Option<File>,
    pub diagnostics: Vec<Diagnostic>,
    pub indent_style: Option<IndentStyle>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Convert to the fail-fast shape: the tree when there were no errors, the diagnostics otherwise.
    pub fn into_result(self) -> Result<File, Vec<Diagnostic>> {
        match self.file {
            Some(file) if !self.has_errors() => Ok(file),
            _ => Err(self.diagnostics),
        }
    }
}

/// Parse `source` with the given options.
#[tracing::instrument(skip_all, fields(source_len = source.len(), policy = ?options.error_policy))]
pub fn parse_source(source: &str, options: &ParseOptions) -> ParseOutput {
    let mut parser = Parser::new(source, options);
    let file = parser.parse_file();
    let output = parser.finish(file);
    tracing::debug!(diagnostics = output.diagnostics.len(), "parse finished");
    output
}

/// Parse `source`, stopping at the first error.
pub fn parse(source: &str) -> Result<File, Vec<Diagnostic>> {
    parse_source(source, &ParseOptions::default()).into_result()
}

/// Parse `source` with batch recovery, returning the partial tree and all diagnostics.
pub fn parse_batch(source: &str) -> (File, Vec<Diagnostic>) {
    let output = parse_source(source, &ParseOptions::batch());
    (output.file.unwrap_or_default(), output.diagnostics)
}
