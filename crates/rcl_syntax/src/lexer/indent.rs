//! Indentation tracking for the RCL lexer
//!
//! Turns the leading whitespace of each logical line into `Indent`/`Dedent` tokens. Blank lines and
//! comment-only lines never touch the indentation stack.
//!
//! Blank lines are reported as `Newline` tokens, but only after the structural tokens of the next content line,
//! so a blank line belongs to the block of the line that follows it.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Span;
use crate::diagnostics::Diagnostic;

/// Character a file indents with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChar {
    Space,
    Tab,
}

impl IndentChar {
    pub fn as_char(self) -> char {
        match self {
            IndentChar::Space => ' ',
            IndentChar::Tab => '\t',
        }
    }

    fn plural(self) -> &'static str {
        match self {
            IndentChar::Space => "spaces",
            IndentChar::Tab => "tabs",
        }
    }
}

/// Indentation style inferred from the first indented line of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentStyle {
    pub ch: IndentChar,
    /// Width of the first indentation seen, in characters.
    pub unit: usize,
}

/// Result of comparing a line's indentation with the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Same,
    Indent,
    Dedent(usize),
    /// The width matched no open level. After popping `dedents` levels the tracker re-opened a block at the
    /// offending width so the token stream stays balanced.
    Misaligned { dedents: usize, nearest: usize },
}

/// Stack of open indentation widths. The bottom entry (column 0) is never popped.
#[derive(Debug, Clone)]
pub struct IndentTracker {
    stack: Vec<usize>,
    style: Option<IndentStyle>,
}

impl Default for IndentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentTracker {
    pub fn new() -> Self {
        Self {
            stack: vec![0],
            style: None,
        }
    }

    /// Number of open blocks.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn style(&self) -> Option<IndentStyle> {
        self.style
    }

    /// Validate the whitespace prefix of a content line against the file's indentation style.
    ///
    /// The first non-empty prefix fixes the style; a prefix mixing both characters, or using the other one
    /// later, is rejected.
    pub fn check_prefix(&mut self, prefix: &str) -> Result<(), String> {
        if prefix.is_empty() {
            return Ok(());
        }
        let has_space = prefix.contains(' ');
        let has_tab = prefix.contains('\t');
        if has_space && has_tab {
            return Err("mixed tabs and spaces in indentation".to_string());
        }
        let ch = if has_tab { IndentChar::Tab } else { IndentChar::Space };
        match self.style {
            None => {
                self.style = Some(IndentStyle {
                    ch,
                    unit: prefix.len(),
                });
                Ok(())
            }
            Some(style) if style.ch != ch => Err(format!(
                "indentation uses {} but this file is indented with {}",
                ch.plural(),
                style.ch.plural()
            )),
            Some(_) => Ok(()),
        }
    }

    /// Apply a new line's indentation width.
    pub fn transition(&mut self, width: usize) -> Transition {
        let top = self.top();
        if width == top {
            return Transition::Same;
        }
        if width > top {
            self.stack.push(width);
            return Transition::Indent;
        }
        let mut dedents = 0;
        while self.stack.len() > 1 && width < self.top() {
            self.stack.pop();
            dedents += 1;
        }
        let landed = self.top();
        if landed == width {
            Transition::Dedent(dedents)
        } else {
            self.stack.push(width);
            Transition::Misaligned {
                dedents,
                nearest: landed,
            }
        }
    }

    /// Close every open level; returns how many were open.
    pub fn unwind(&mut self) -> usize {
        let open = self.depth();
        self.stack.truncate(1);
        open
    }

    fn top(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }
}

impl<'a> Lexer<'a> {
    /// Process the start of a physical line in the default mode.
    ///
    /// Consumes blank and comment-only lines whole. For a content line, consumes the indentation prefix and
    /// queues the structural tokens it implies.
    pub(super) fn handle_line_start(&mut self) {
        let line_start = self.pos;
        let rest = self.rest();
        let prefix_len = rest.bytes().take_while(|b| *b == b' ' || *b == b'\t').count();
        let after = &rest[prefix_len..];

        if after.is_empty() {
            self.pos += prefix_len;
            return;
        }
        if let Some(newline_len) = line_break_len(after) {
            let start = line_start + prefix_len;
            self.pos = start + newline_len;
            self.blank_lines += 1;
            return;
        }
        if after.starts_with(rcl_core::lang::markers::COMMENT) {
            let end = after.find('\n').map(|i| i + 1).unwrap_or(after.len());
            self.pos = line_start + prefix_len + end;
            return;
        }

        let content_start = line_start + prefix_len;
        let prefix_span = Span::new(line_start, content_start);
        let prefix = &self.source[line_start..content_start];
        if let Err(message) = self.indent.check_prefix(prefix) {
            self.error(Diagnostic::lexical(message, prefix_span));
        }

        match self.indent.transition(prefix_len) {
            Transition::Same => {}
            Transition::Indent => self.push(TokenKind::Indent, prefix_span),
            Transition::Dedent(count) => {
                for _ in 0..count {
                    self.push(TokenKind::Dedent, Span::point(content_start));
                }
            }
            Transition::Misaligned { dedents, nearest } => {
                for _ in 0..dedents {
                    self.push(TokenKind::Dedent, Span::point(content_start));
                }
                self.push(TokenKind::Indent, prefix_span);
                self.error(
                    Diagnostic::lexical(
                        format!("inconsistent indentation: width {prefix_len} matches no enclosing block"),
                        prefix_span,
                    )
                    .with_note(format!("the nearest enclosing block is indented by {nearest}")),
                );
            }
        }

        self.flush_blank_lines(content_start);
        self.pos = content_start;
        self.line_indent = prefix_len;
        self.at_line_start = false;
    }

    /// Emit the `Newline` tokens of buffered blank lines at `pos`.
    pub(super) fn flush_blank_lines(&mut self, pos: usize) {
        for _ in 0..std::mem::take(&mut self.blank_lines) {
            self.push(TokenKind::Newline, Span::point(pos));
        }
    }
}

/// Length of a line break at the start of `s` (`\n` or `\r\n`).
pub(super) fn line_break_len(s: &str) -> Option<usize> {
    if s.starts_with("\r\n") {
        Some(2)
    } else if s.starts_with('\n') {
        Some(1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_pushes_and_pops() {
        let mut t = IndentTracker::new();
        assert_eq!(t.transition(0), Transition::Same);
        assert_eq!(t.transition(2), Transition::Indent);
        assert_eq!(t.transition(4), Transition::Indent);
        assert_eq!(t.transition(0), Transition::Dedent(2));
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn tracker_realigns_on_inconsistent_dedent() {
        let mut t = IndentTracker::new();
        t.transition(4);
        assert_eq!(
            t.transition(2),
            Transition::Misaligned {
                dedents: 1,
                nearest: 0
            }
        );
        assert_eq!(t.depth(), 1);
        assert_eq!(t.transition(2), Transition::Same);
        assert_eq!(t.unwind(), 1);
    }

    #[test]
    fn first_prefix_fixes_the_style() {
        let mut t = IndentTracker::new();
        assert!(t.check_prefix("  ").is_ok());
        assert_eq!(
            t.style(),
            Some(IndentStyle {
                ch: IndentChar::Space,
                unit: 2
            })
        );
        assert!(t.check_prefix("\t").is_err());
        assert!(t.check_prefix("    ").is_ok());
    }

    #[test]
    fn mixed_prefix_is_rejected() {
        let mut t = IndentTracker::new();
        assert!(t.check_prefix(" \t").is_err());
    }

    #[test]
    fn line_breaks() {
        assert_eq!(line_break_len("\r\nx"), Some(2));
        assert_eq!(line_break_len("\nx"), Some(1));
        assert_eq!(line_break_len("x"), None);
    }
}
