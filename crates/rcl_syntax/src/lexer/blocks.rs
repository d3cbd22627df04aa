//! Indented block capture for fenced code (`$js>>>`) and block-scalar strings (`|`, `|-`, `+|`, `+|+`).
//!
//! The block is every following line indented deeper than the line that opened it; blank lines inside the
//! block belong to it. Captured lines are queued in a lexer mode and handed out one token per call, followed
//! by the end token and the `Newline` that ends the opening line.

use std::collections::VecDeque;

use super::indent::line_break_len;
use super::tokens::{Token, TokenKind};
use super::{Lexer, Mode};
use crate::ast::{Span, TextSegment};
use crate::diagnostics::Diagnostic;
use rcl_core::lang::markers::{self, CodeLanguage, TrimMode};

/// One physical line of a captured block, as written (indentation included, line break excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    /// Byte offset of the line start.
    pub start: usize,
    /// Whether a line break followed the line in the source.
    pub newline: bool,
}

impl RawLine {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn indent(&self) -> usize {
        leading_whitespace(&self.text)
    }
}

fn leading_whitespace(s: &str) -> usize {
    s.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

/// Remove `width` columns of leading whitespace, or all of it when the line is indented less.
fn strip_indent(text: &str, width: usize) -> &str {
    if leading_whitespace(text) >= width {
        &text[width..]
    } else {
        text.trim_start()
    }
}

fn min_indent(lines: &[RawLine]) -> usize {
    lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(RawLine::indent)
        .min()
        .unwrap_or(0)
}

/// Apply a trim mode to captured block-scalar lines.
///
/// The result is index-aligned with `lines`: segment `i` comes from line `i`, and only trailing lines are ever
/// dropped.
pub fn shape_block_scalar(mode: TrimMode, lines: &[RawLine]) -> Vec<TextSegment> {
    let width = match mode {
        TrimMode::PreserveAll => min_indent(lines),
        _ => lines
            .iter()
            .find(|l| !l.is_blank())
            .map(RawLine::indent)
            .unwrap_or(0),
    };

    let mut segments: Vec<TextSegment> = lines
        .iter()
        .map(|line| match mode {
            TrimMode::Clean => TextSegment {
                text: strip_indent(&line.text, width).to_string(),
                newline: true,
            },
            TrimMode::Trim => TextSegment {
                text: line.text.trim().to_string(),
                newline: true,
            },
            TrimMode::Preserve | TrimMode::PreserveAll => TextSegment {
                text: strip_indent(&line.text, width).to_string(),
                newline: line.newline,
            },
        })
        .collect();

    if matches!(mode, TrimMode::Clean | TrimMode::Trim) {
        while segments.last().is_some_and(|s| s.text.is_empty()) {
            segments.pop();
        }
    }
    segments
}

/// Strip the common indentation of a fenced code block and drop trailing blank lines.
pub fn shape_fenced_code(lines: &[RawLine]) -> Vec<String> {
    let width = min_indent(lines);
    let mut out: Vec<String> = lines
        .iter()
        .map(|line| strip_indent(&line.text, width).trim_end().to_string())
        .collect();
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}

impl<'a> Lexer<'a> {
    /// Embedded-code marker at the cursor: language and whether it is fenced.
    pub(super) fn code_marker(&self) -> Option<(CodeLanguage, bool)> {
        let rest = self.rest();
        markers::CODE_LANGUAGES
            .iter()
            .find(|info| rest.starts_with(info.fenced))
            .map(|info| (info.language, true))
            .or_else(|| {
                markers::CODE_LANGUAGES
                    .iter()
                    .find(|info| rest.starts_with(info.single_line))
                    .map(|info| (info.language, false))
            })
    }

    /// `$js> code` to end of line, or a `$js>>>` fence followed by an indented block.
    pub(super) fn scan_embedded_code(&mut self) {
        let Some((language, fenced)) = self.code_marker() else {
            return;
        };
        let start = self.pos;
        if !fenced {
            self.pos += markers::single_line_code_marker(language).len();
            let end = self.line_end();
            let code = self.source[self.pos..end].trim().to_string();
            self.pos = end;
            self.push_from(TokenKind::EmbeddedCode { language, code }, start);
            return;
        }

        self.pos += markers::fenced_code_marker(language).len();
        self.push_from(TokenKind::CodeFenceStart(language), start);
        let opener = Span::new(start, self.pos);
        let lines = self.capture_block(opener, false);

        let mut queue = VecDeque::new();
        for (text, line) in shape_fenced_code(&lines).into_iter().zip(&lines) {
            let span = Span::new(line.start, line.start + line.text.len());
            queue.push_back(Token::new(TokenKind::CodeLine(text), span));
        }
        queue.push_back(Token::new(TokenKind::CodeFenceEnd, Span::point(self.pos)));
        self.push_mode(Mode::FencedCode(queue));
    }

    /// `|`, `|-`, `+|` or `+|+` followed by an indented block.
    pub(super) fn scan_block_scalar_marker(&mut self) {
        let start = self.pos;
        let rest = self.rest();
        let Some(info) = markers::TRIM_MODES.iter().find(|t| rest.starts_with(t.marker)) else {
            self.advance();
            self.error(
                Diagnostic::lexical("unexpected character `+`", Span::new(start, self.pos))
                    .with_hint("multi-line strings open with `|`, `|-`, `+|` or `+|+`"),
            );
            return;
        };
        let mode = info.mode;
        self.pos += info.marker.len();
        self.push_from(TokenKind::BlockScalarStart(mode), start);
        let opener = Span::new(start, self.pos);
        let keep_trailing = matches!(mode, TrimMode::Preserve | TrimMode::PreserveAll);
        let lines = self.capture_block(opener, keep_trailing);

        let mut queue = VecDeque::new();
        for (segment, line) in shape_block_scalar(mode, &lines).into_iter().zip(&lines) {
            let span = Span::new(line.start, line.start + line.text.len());
            queue.push_back(Token::new(
                TokenKind::BlockScalarLine {
                    text: segment.text,
                    newline: segment.newline,
                },
                span,
            ));
        }
        queue.push_back(Token::new(TokenKind::BlockScalarEnd, Span::point(self.pos)));
        self.push_mode(Mode::BlockScalar(queue));
    }

    /// Consume the rest of the opener line and the indented block below it.
    ///
    /// Trailing blank lines are left in the source unless `keep_trailing` is set, so they count as blank lines
    /// of the enclosing block.
    fn capture_block(&mut self, opener: Span, keep_trailing: bool) -> Vec<RawLine> {
        let end = self.line_end();
        let tail = self.source[self.pos..end].trim();
        if !tail.is_empty() && !tail.starts_with(markers::COMMENT) {
            self.error(
                Diagnostic::lexical(
                    "unexpected text after multi-line opener",
                    Span::new(self.pos, end),
                )
                .with_hint("the block content goes on the following, more indented lines"),
            );
        }
        self.pos = end;
        let Some(break_len) = line_break_len(self.rest()) else {
            self.error(self.unterminated_block(opener));
            return Vec::new();
        };
        self.pos += break_len;
        let body_start = self.pos;

        let mut lines: Vec<RawLine> = Vec::new();
        while self.pos < self.source.len() {
            let end = self.line_end();
            let text = self.source[self.pos..end].trim_end_matches('\r');
            let line = RawLine {
                text: text.to_string(),
                start: self.pos,
                newline: end < self.source.len(),
            };
            if !line.is_blank() && line.indent() <= self.line_indent {
                break;
            }
            lines.push(line);
            self.pos = (end + 1).min(self.source.len());
        }
        // Indentation after the last line break is not a line of the block.
        if lines.last().is_some_and(|l| l.is_blank() && !l.newline) {
            lines.pop();
        }

        if !lines.iter().any(|l| !l.is_blank()) {
            self.error(self.unterminated_block(opener));
            self.pos = body_start;
            return Vec::new();
        }
        if !keep_trailing {
            while let Some(last) = lines.last() {
                if !last.is_blank() {
                    break;
                }
                self.pos = last.start;
                lines.pop();
            }
        }
        lines
    }

    fn unterminated_block(&self, opener: Span) -> Diagnostic {
        Diagnostic::lexical(
            "unterminated multi-line string / code block: expected an indented block",
            opener,
        )
        .with_note(format!(
            "block lines must be indented deeper than {} columns",
            self.line_indent
        ))
    }

    /// Hand out one queued block token; once the queue is empty, leave the mode and end the opener line.
    pub(super) fn drain_block(&mut self) {
        let next = match self.modes.last_mut() {
            Some(Mode::FencedCode(queue)) | Some(Mode::BlockScalar(queue)) => queue.pop_front(),
            _ => None,
        };
        match next {
            Some(token) => self.push(token.kind, token.span),
            None => {
                self.pop_mode();
                self.push(TokenKind::Newline, Span::point(self.pos));
                self.at_line_start = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(lines: &[&str]) -> Vec<RawLine> {
        let mut start = 0;
        lines
            .iter()
            .map(|text| {
                let line = RawLine {
                    text: text.to_string(),
                    start,
                    newline: true,
                };
                start += text.len() + 1;
                line
            })
            .collect()
    }

    fn texts(segments: &[TextSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn clean_strips_block_indent_and_trailing_blanks() {
        let lines = raw(&["    Hello", "      world", "", "    bye", ""]);
        let segments = shape_block_scalar(TrimMode::Clean, &lines);
        assert_eq!(texts(&segments), vec!["Hello", "  world", "", "bye"]);
        assert!(segments.iter().all(|s| s.newline));
    }

    #[test]
    fn clean_leaves_trailing_whitespace_alone() {
        let lines = raw(&["    x  ", "    y"]);
        let segments = shape_block_scalar(TrimMode::Clean, &lines);
        assert_eq!(texts(&segments), vec!["x  ", "y"]);
    }

    #[test]
    fn trim_trims_each_line() {
        let lines = raw(&["    Hello  ", "      world"]);
        let segments = shape_block_scalar(TrimMode::Trim, &lines);
        assert_eq!(texts(&segments), vec!["Hello", "world"]);
    }

    #[test]
    fn preserve_keeps_trailing_whitespace_and_blank_lines() {
        let lines = raw(&["    a  ", "", "    b"]);
        let segments = shape_block_scalar(TrimMode::Preserve, &lines);
        assert_eq!(texts(&segments), vec!["a  ", "", "b"]);
    }

    #[test]
    fn preserve_all_uses_minimum_indent() {
        let lines = raw(&["      deep", "    shallow"]);
        let segments = shape_block_scalar(TrimMode::PreserveAll, &lines);
        assert_eq!(texts(&segments), vec!["  deep", "shallow"]);
        let preserve = shape_block_scalar(TrimMode::Preserve, &lines);
        assert_eq!(texts(&preserve), vec!["deep", "shallow"]);
    }

    #[test]
    fn fenced_code_strips_common_indent() {
        let lines = raw(&["    if (x) {", "      y();", "    }", ""]);
        assert_eq!(shape_fenced_code(&lines), vec!["if (x) {", "  y();", "}"]);
    }

    #[test]
    fn block_ends_at_owner_indent() {
        let source = "body: |\n  line one\n\n  line two\nnext: 1\n";
        let (tokens, diagnostics) = super::super::tokenize(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let names: Vec<_> = tokens.iter().map(|t| t.kind.name()).collect();
        assert_eq!(
            names,
            vec![
                "AttributeName",
                "BlockScalarStart",
                "BlockScalarLine",
                "BlockScalarLine",
                "BlockScalarLine",
                "BlockScalarEnd",
                "Newline",
                "AttributeName",
                "Number",
                "Newline",
                "Eof"
            ]
        );
    }

    #[test]
    fn last_line_without_break_is_marked() {
        let line_flags = |source: &str| -> Vec<(String, bool)> {
            super::super::tokenize(source)
                .0
                .into_iter()
                .filter_map(|t| match t.kind {
                    TokenKind::BlockScalarLine { text, newline } => Some((text, newline)),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(line_flags("body: +|\n  x"), vec![("x".to_string(), false)]);
        assert_eq!(line_flags("body: +|\n  x\n  "), vec![("x".to_string(), true)]);
    }

    #[test]
    fn empty_block_is_an_error() {
        let (tokens, diagnostics) = super::super::tokenize("body: |\nnext: 1\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.starts_with("unterminated multi-line"));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::BlockScalarEnd));
    }

    #[test]
    fn fenced_code_tokens() {
        let source = "run: $js>>>\n  const a = 1;\n  return a;\n";
        let (tokens, diagnostics) = super::super::tokenize(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let lines: Vec<_> = tokens
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::CodeLine(line) => Some(line.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec!["const a = 1;", "return a;"]);
    }

    #[test]
    fn single_line_code_runs_to_end_of_line() {
        let (tokens, _) = super::super::tokenize("check: $ts> a.b # not a comment\n");
        assert_eq!(
            tokens[1].kind,
            TokenKind::EmbeddedCode {
                language: CodeLanguage::TypeScript,
                code: "a.b # not a comment".to_string()
            }
        );
    }
}
