//! String, interpolation and type-tag scanning.
//!
//! A string is always lexed as `StringStart`, then `StringText` / interpolation runs, then `StringEnd`, so the
//! parser never re-scans string contents. Interpolations switch the lexer back to the default rules until the
//! matching `}`.

use super::tokens::TokenKind;
use super::{Lexer, Mode, TagPart};
use crate::ast::Span;
use crate::diagnostics::Diagnostic;
use rcl_core::lang::markers;

/// Resolve the character after a backslash. Unknown escapes are kept as written.
fn unescape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\\' | '"' | '#' | '$' | '{' | '}' => Some(c),
        _ => None,
    }
}

impl<'a> Lexer<'a> {
    /// At `"`: open a single- or triple-quoted string.
    pub(super) fn start_string(&mut self) {
        let start = self.pos;
        let triple = self.rest().starts_with(markers::TRIPLE_QUOTE);
        self.pos += if triple { markers::TRIPLE_QUOTE.len() } else { 1 };
        self.push_from(TokenKind::StringStart { triple }, start);
        self.push_mode(Mode::Str { start, triple });
    }

    /// Scan string content up to the next interpolation or the closing quote.
    pub(super) fn scan_string_part(&mut self) {
        let triple = matches!(self.modes.last(), Some(Mode::Str { triple: true, .. }));
        let text_start = self.pos;
        let mut text = String::new();

        loop {
            let Some(c) = self.peek() else {
                self.push_text(text, text_start);
                self.unwind_modes_at_eof();
                return;
            };
            let at_line_break = c == '\n' || (c == '\r' && self.peek_at(1) == Some('\n'));
            if at_line_break && !triple {
                self.push_text(text, text_start);
                self.error(
                    Diagnostic::lexical("unterminated string", Span::point(self.pos))
                        .with_hint("single-quoted strings end on the line they start; use `\"\"\"` for multi-line text"),
                );
                self.pop_mode();
                self.push(TokenKind::StringEnd { triple: false }, Span::point(self.pos));
                return;
            }
            match c {
                '"' if !triple || self.rest().starts_with(markers::TRIPLE_QUOTE) => {
                    self.push_text(text, text_start);
                    let start = self.pos;
                    self.pos += if triple { markers::TRIPLE_QUOTE.len() } else { 1 };
                    self.push_from(TokenKind::StringEnd { triple }, start);
                    self.pop_mode();
                    return;
                }
                '\\' => {
                    self.advance();
                    match self.peek() {
                        Some(next) if next != '\n' => {
                            self.advance();
                            match unescape(next) {
                                Some(resolved) => text.push(resolved),
                                None => {
                                    text.push('\\');
                                    text.push(next);
                                }
                            }
                        }
                        _ => text.push('\\'),
                    }
                }
                '#' | '$' if self.at_interpolation_opener() => {
                    self.push_text(text, text_start);
                    let start = self.pos;
                    self.pos += 2;
                    self.push_from(TokenKind::InterpolationStart, start);
                    self.push_mode(Mode::Interpolation { start, depth: 0 });
                    return;
                }
                _ => {
                    self.advance();
                    text.push(c);
                }
            }
        }
    }

    fn at_interpolation_opener(&self) -> bool {
        let rest = self.rest();
        markers::INTERPOLATION_OPENERS.iter().any(|opener| rest.starts_with(opener))
    }

    fn push_text(&mut self, text: String, start: usize) {
        if !text.is_empty() {
            self.push(TokenKind::StringText(text), Span::new(start, self.pos));
        }
    }

    /// At the `"` of `:"quoted atom"`: consume the quoted name and return it unescaped.
    pub(super) fn scan_quoted_atom(&mut self, start: usize) -> String {
        self.advance();
        let mut name = String::new();
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    self.error(Diagnostic::lexical(
                        "unterminated quoted atom",
                        Span::new(start, self.pos),
                    ));
                    return name;
                }
                Some('"') => {
                    self.advance();
                    return name;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(next) if next != '\n' => {
                            self.advance();
                            match unescape(next) {
                                Some(resolved) => name.push(resolved),
                                None => {
                                    name.push('\\');
                                    name.push(next);
                                }
                            }
                        }
                        _ => name.push('\\'),
                    }
                }
                Some(c) => {
                    self.advance();
                    name.push(c);
                }
            }
        }
    }

    // ========================================================================
    // Type tags: `<name content | secondary>`
    // ========================================================================

    pub(super) fn scan_type_tag(&mut self) {
        let part = match self.modes.last() {
            Some(Mode::TypeTag { part, .. }) => *part,
            _ => return,
        };
        self.eat_while(|c| c == ' ' || c == '\t');

        if part == TagPart::Name {
            let start = self.pos;
            let name = self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
            if name.is_empty() {
                self.error(Diagnostic::lexical(
                    "expected a type name after `<`",
                    Span::point(self.pos),
                ));
            } else {
                self.push_from(TokenKind::TypeTagName(name.to_string()), start);
            }
            self.set_tag_part(TagPart::Content);
            return;
        }

        let start = self.pos;
        let raw = self.eat_while(|c| {
            c != markers::TYPE_TAG_CLOSE && c != markers::TYPE_TAG_PIPE && c != '\n' && c != '\r'
        });
        let content = raw.trim_end();
        if !content.is_empty() {
            self.push(
                TokenKind::TypeTagContent(content.to_string()),
                Span::new(start, start + content.len()),
            );
        }

        let at = self.pos;
        match self.peek() {
            Some(markers::TYPE_TAG_CLOSE) => {
                self.advance();
                self.push_from(TokenKind::TypeTagEnd, at);
                self.pop_mode();
            }
            Some(markers::TYPE_TAG_PIPE) if part == TagPart::Content => {
                self.advance();
                self.push_from(TokenKind::TypeTagPipe, at);
                self.set_tag_part(TagPart::Secondary);
            }
            Some(markers::TYPE_TAG_PIPE) => {
                self.advance();
                self.error(Diagnostic::lexical(
                    "a type tag takes at most one `|`",
                    Span::new(at, self.pos),
                ));
            }
            None => self.unwind_modes_at_eof(),
            Some(_) => {
                self.error(
                    Diagnostic::lexical("unterminated type tag", Span::point(at))
                        .with_hint("close the tag with `>` on the same line"),
                );
                self.pop_mode();
                self.push(TokenKind::TypeTagEnd, Span::point(at));
            }
        }
    }

    fn set_tag_part(&mut self, next: TagPart) {
        if let Some(Mode::TypeTag { part, .. }) = self.modes.last_mut() {
            *part = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tokenize;
    use super::super::tokens::TokenKind;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn escapes_are_resolved() {
        let kinds = kinds(r#""a\n\"b\q""#);
        assert_eq!(kinds[1], TokenKind::StringText("a\n\"b\\q".to_string()));
    }

    #[test]
    fn interpolation_splits_text() {
        let names: Vec<_> = kinds(r#""Hi #{name}!""#).iter().map(TokenKind::name).collect();
        assert_eq!(
            names,
            vec![
                "StringStart",
                "StringText",
                "InterpolationStart",
                "LowerName",
                "InterpolationEnd",
                "StringText",
                "StringEnd",
                "Newline",
                "Eof"
            ]
        );
    }

    #[test]
    fn escaped_opener_is_text() {
        let kinds = kinds(r#""cost \${x}""#);
        assert_eq!(kinds[1], TokenKind::StringText("cost ${x}".to_string()));
        assert_eq!(kinds[2], TokenKind::StringEnd { triple: false });
    }

    #[test]
    fn triple_quoted_string_spans_lines() {
        let kinds = kinds("\"\"\"one\n\"two\"\n\"\"\"");
        assert_eq!(kinds[1], TokenKind::StringText("one\n\"two\"\n".to_string()));
        assert_eq!(kinds[2], TokenKind::StringEnd { triple: true });
    }

    #[test]
    fn unterminated_string_closes_at_line_end() {
        let (tokens, diagnostics) = super::super::tokenize("\"abc\nx: 1\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unterminated string"));
        assert_eq!(tokens[2].kind, TokenKind::StringEnd { triple: false });
        assert_eq!(tokens[3].kind, TokenKind::Newline);
    }

    #[test]
    fn type_tag_parts() {
        let kinds = kinds("<date 2024-01-01 | %Y-%m-%d>");
        assert_eq!(kinds[1], TokenKind::TypeTagName("date".to_string()));
        assert_eq!(kinds[2], TokenKind::TypeTagContent("2024-01-01".to_string()));
        assert_eq!(kinds[3], TokenKind::TypeTagPipe);
        assert_eq!(kinds[4], TokenKind::TypeTagContent("%Y-%m-%d".to_string()));
        assert_eq!(kinds[5], TokenKind::TypeTagEnd);
    }

    #[test]
    fn quoted_atom() {
        let kinds = kinds(r#":"needs review""#);
        assert_eq!(
            kinds[0],
            TokenKind::Atom {
                name: "needs review".to_string(),
                quoted: true
            }
        );
    }
}
