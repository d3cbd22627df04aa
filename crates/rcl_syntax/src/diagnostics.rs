//! Diagnostics produced by the lexer and parser.
//!
//! A [`Diagnostic`] is plain data (kind, severity, message, span, notes, hints) so it can be collected, sorted and
//! compared in tests. Rendering with source context goes through [`DiagnosticReport`], which implements
//! [`miette::Diagnostic`].

use std::fmt;

use miette::{LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ast::Span;

/// A problem found while lexing or parsing, with its location.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            span,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Lexical, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, message, span)
    }

    /// Internal invariant violation (e.g. unbalanced block tokens). Never expected on any input.
    pub fn structural(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Structural, message, span)
    }

    pub fn cancelled(span: Span) -> Self {
        Self::new(DiagnosticKind::Cancelled, "parse cancelled", span)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Attach source text so the diagnostic can be rendered by `miette`.
    pub fn to_report(&self, file_name: &str, source: &str) -> DiagnosticReport {
        DiagnosticReport {
            diagnostic: self.clone(),
            src: NamedSource::new(file_name, source.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Structural,
    Cancelled,
}

impl DiagnosticKind {
    /// Stable diagnostic code, shown next to rendered reports.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::Lexical => "rcl::lexical",
            DiagnosticKind::Syntax => "rcl::syntax",
            DiagnosticKind::Structural => "rcl::internal",
            DiagnosticKind::Cancelled => "rcl::cancelled",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "lexical error"),
            DiagnosticKind::Syntax => write!(f, "syntax error"),
            DiagnosticKind::Structural => write!(f, "internal error"),
            DiagnosticKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A [`Diagnostic`] bundled with its source, ready for `miette` rendering.
#[derive(Debug, Error)]
#[error("{diagnostic}")]
pub struct DiagnosticReport {
    diagnostic: Diagnostic,
    src: NamedSource<String>,
}

impl miette::Diagnostic for DiagnosticReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diagnostic.kind.code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diagnostic.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let mut lines: Vec<String> = self.diagnostic.notes.iter().map(|n| format!("note: {n}")).collect();
        lines.extend(self.diagnostic.hints.iter().cloned());
        if lines.is_empty() {
            None
        } else {
            Some(Box::new(lines.join("\n")))
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diagnostic.span;
        let source_span = SourceSpan::from((span.start, span.len()));
        let label = LabeledSpan::new_with_span(Some(self.diagnostic.kind.to_string()), source_span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// 1-based line and column (in characters) for a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut line_start = 0;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    let column = source
        .get(line_start..offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(0)
        + 1;
    (line, column)
}

/// One-line rendering: `file:line:col: kind: message`.
pub fn format_short(file_name: &str, source: &str, diagnostic: &Diagnostic) -> String {
    let (line, col) = line_col(source, diagnostic.span.start);
    format!("{file_name}:{line}:{col}: {}: {}", diagnostic.kind, diagnostic.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let src = "agent A\n  flow B\n";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 10), (2, 3));
    }

    #[test]
    fn line_col_clamps_past_end() {
        assert_eq!(line_col("ab", 99), (1, 3));
    }

    #[test]
    fn short_format_includes_position_and_kind() {
        let d = Diagnostic::syntax("expected end of line", Span::new(8, 9));
        let out = format_short("main.rcl", "agent A\n  x", &d);
        assert_eq!(out, "main.rcl:2:1: syntax error: expected end of line");
    }

    #[test]
    fn display_is_the_message() {
        let d = Diagnostic::lexical("unterminated string", Span::point(0)).with_hint("add a closing quote");
        assert_eq!(d.to_string(), "unterminated string");
        assert_eq!(d.hints.len(), 1);
    }

    #[test]
    fn report_carries_source_and_label() {
        use miette::Diagnostic as _;

        let d = Diagnostic::syntax("unexpected `)`", Span::new(8, 9)).with_note("values start here");
        let report = d.to_report("bot.rcl", "agent A\n)\n");
        assert_eq!(report.to_string(), "unexpected `)`");
        assert!(report.source_code().is_some());
        assert_eq!(report.code().map(|c| c.to_string()), Some(DiagnosticKind::Syntax.code().to_string()));
        let labels: Vec<LabeledSpan> = report.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 8);
        assert!(report.help().is_some_and(|h| h.to_string().contains("values start here")));
    }
}
