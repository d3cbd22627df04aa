//! RCL canonical printer
//!
//! Prints a parsed file back to source in one canonical layout:
//! - indentation of the input file (two spaces when it has none)
//! - one space around `->`, after `:` and after `,`
//! - one blank line between top-level sections; blank lines inside bodies are kept
//! - interpolations always written with `#{`
//!
//! Printing and re-parsing yields a tree with the same shape as the original.

mod config;
mod formatter;
mod writer;

pub use config::FormatConfig;
pub use formatter::Formatter;

use rcl_syntax::Diagnostic;
use rcl_syntax::ast::File;
use rcl_syntax::parser::parse_source;
use rcl_syntax::ParseOptions;

/// Print a parsed file with the given configuration.
pub fn format_file(file: &File, config: &FormatConfig) -> String {
    Formatter::new(config).format(file)
}

/// Format RCL source, keeping the file's own indentation style.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn format_source(source: &str) -> Result<String, Vec<Diagnostic>> {
    let output = parse_source(source, &ParseOptions::default());
    let config = FormatConfig::for_style(output.indent_style);
    let file = output.into_result()?;
    Ok(format_file(&file, &config))
}

/// Format RCL source with a custom configuration
pub fn format_source_with_config(source: &str, config: &FormatConfig) -> Result<String, Vec<Diagnostic>> {
    let file = rcl_syntax::parser::parse(source)?;
    Ok(format_file(&file, config))
}

/// Check if source is already formatted
pub fn check_formatted(source: &str) -> Result<bool, Vec<Diagnostic>> {
    let formatted = format_source(source)?;
    Ok(source == formatted)
}

/// Line-by-line diff between the source and its formatted form, `None` when they match.
pub fn format_diff(source: &str) -> Result<Option<String>, Vec<Diagnostic>> {
    let formatted = format_source(source)?;
    Ok(line_diff(source, &formatted))
}

/// Line-by-line diff of two texts, `None` when they are equal.
pub fn line_diff(original: &str, formatted: &str) -> Option<String> {
    if original == formatted {
        return None;
    }

    let mut diff = String::new();
    let original_lines: Vec<&str> = original.lines().collect();
    let formatted_lines: Vec<&str> = formatted.lines().collect();
    for i in 0..original_lines.len().max(formatted_lines.len()) {
        let orig = original_lines.get(i).copied().unwrap_or("");
        let fmt = formatted_lines.get(i).copied().unwrap_or("");
        if orig != fmt {
            diff.push_str(&format!("-{:4} | {}\n", i + 1, orig));
            diff.push_str(&format!("+{:4} | {}\n", i + 1, fmt));
        }
    }
    Some(diff)
}
