//! Formatting configuration for RCL
//!
//! The printer reuses the indentation of the file it formats unless told otherwise.

use rcl_syntax::lexer::{IndentChar, IndentStyle};

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Characters per indentation level
    pub indent_width: usize,
    /// Character used for indentation
    pub indent_char: IndentChar,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            indent_char: IndentChar::Space,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Config matching an inferred file style, or the default when the file has no indentation.
    pub fn for_style(style: Option<IndentStyle>) -> Self {
        match style {
            Some(style) => Self {
                indent_width: style.unit.max(1),
                indent_char: style.ch,
            },
            None => Self::default(),
        }
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    pub fn with_indent_char(mut self, ch: IndentChar) -> Self {
        self.indent_char = ch;
        self
    }

    /// The whitespace for one indentation level.
    pub fn unit(&self) -> String {
        self.indent_char.as_char().to_string().repeat(self.indent_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_two_spaces() {
        let config = FormatConfig::default();
        assert_eq!(config.unit(), "  ");
    }

    #[test]
    fn test_for_style_follows_the_file() {
        let style = IndentStyle {
            ch: IndentChar::Tab,
            unit: 1,
        };
        let config = FormatConfig::for_style(Some(style));
        assert_eq!(config.unit(), "\t");
        assert_eq!(FormatConfig::for_style(None), FormatConfig::default());
    }

    #[test]
    fn test_width_is_at_least_one() {
        let config = FormatConfig::new().with_indent_width(0);
        assert_eq!(config.indent_width, 1);
    }
}
