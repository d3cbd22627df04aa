//! Output writer with indentation tracking
//!
//! Handles writing formatted source with proper indentation. Empty lines never carry indentation.

use super::config::FormatConfig;

/// Writer that tracks indentation and builds formatted output
pub struct FormatWriter {
    output: String,
    indent_level: usize,
    unit: String,
    at_line_start: bool,
}

impl FormatWriter {
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            unit: config.unit(),
            at_line_start: true,
        }
    }

    /// Get the formatted output
    pub fn finish(self) -> String {
        self.output
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.unit);
            }
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// End the current line.
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    #[cfg(test)]
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcl_syntax::lexer::IndentChar;

    fn default_writer() -> FormatWriter {
        FormatWriter::new(&FormatConfig::default())
    }

    #[test]
    fn test_write_simple() {
        let mut writer = default_writer();
        writer.write("hello");
        writer.write(" ");
        writer.write("world");
        assert_eq!(writer.finish(), "hello world");
    }

    #[test]
    fn test_indented_lines() {
        let mut writer = default_writer();
        writer.writeln("agent A");
        writer.indent();
        writer.writeln("name: 1");
        writer.dedent();
        writer.writeln("flow F");
        assert_eq!(writer.finish(), "agent A\n  name: 1\nflow F\n");
    }

    #[test]
    fn test_blank_lines_have_no_indentation() {
        let mut writer = default_writer();
        writer.indent();
        writer.newline();
        writer.writeln("x");
        assert_eq!(writer.finish(), "\n  x\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut writer = default_writer();
        writer.dedent();
        assert_eq!(writer.current_indent(), 0);
    }

    #[test]
    fn test_tab_indentation() {
        let config = FormatConfig::new().with_indent_char(IndentChar::Tab).with_indent_width(1);
        let mut writer = FormatWriter::new(&config);
        writer.indent();
        writer.writeln("x");
        assert_eq!(writer.finish(), "\tx\n");
    }
}
