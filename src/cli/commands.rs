//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use serde_json::{Value as Json, json};

use crate::format::{FormatConfig, format_file as print_file, line_diff};
use rcl_syntax::diagnostics::{Diagnostic, line_col};
use rcl_syntax::lexer::{self, Token};
use rcl_syntax::parser::parse_source;
use rcl_syntax::visit::NodeStats;
use rcl_syntax::{ErrorPolicy, ParseOptions};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))
}

/// Render diagnostics with source snippets.
pub fn render_diagnostics(path: &Path, source: &str, diagnostics: &[Diagnostic]) -> String {
    let name = path.display().to_string();
    let mut out = String::new();
    for diagnostic in diagnostics {
        let report = miette::Report::new(diagnostic.to_report(&name, source));
        out.push_str(&format!("{report:?}\n"));
    }
    out.trim_end().to_string()
}

fn diagnostics_json(source: &str, diagnostics: &[Diagnostic]) -> Vec<Json> {
    diagnostics
        .iter()
        .map(|d| {
            let (line, column) = line_col(source, d.span.start);
            json!({
                "kind": d.kind.to_string(),
                "code": d.kind.code(),
                "severity": d.severity.to_string(),
                "message": d.message,
                "start": d.span.start,
                "end": d.span.end,
                "line": line,
                "column": column,
            })
        })
        .collect()
}

fn token_json(source: &str, token: &Token) -> Json {
    let (line, column) = line_col(source, token.span.start);
    json!({
        "kind": token.kind.name(),
        "text": token.lexeme(source),
        "start": token.span.start,
        "end": token.span.end,
        "line": line,
        "column": column,
    })
}

/// Lex and display tokens.
#[tracing::instrument(skip_all, fields(file = %path.display()))]
pub fn lex_file(path: &Path, json_output: bool) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let (tokens, diagnostics) = lexer::tokenize(&source);

    if json_output {
        let out = json!({
            "tokens": tokens.iter().map(|t| token_json(&source, t)).collect::<Vec<_>>(),
            "diagnostics": diagnostics_json(&source, &diagnostics),
        });
        println!("{out:#}");
    } else {
        for token in &tokens {
            let (line, column) = line_col(&source, token.span.start);
            println!("{line}:{column}\t{}\t{:?}", token.kind.name(), token.lexeme(&source));
        }
    }

    if diagnostics.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(render_diagnostics(path, &source, &diagnostics)))
    }
}

/// Parse and display the tree.
#[tracing::instrument(skip_all, fields(file = %path.display(), batch))]
pub fn parse_file(path: &Path, json_output: bool, batch: bool) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let policy = if batch {
        ErrorPolicy::Batch
    } else {
        ErrorPolicy::FailFast
    };
    let output = parse_source(&source, &ParseOptions::new().with_error_policy(policy));

    if json_output {
        let stats = output.file.as_ref().map(NodeStats::collect);
        let out = json!({
            "ok": output.diagnostics.is_empty(),
            "stats": stats.map(|s| json!({
                "imports": s.imports,
                "sections": s.sections,
                "attributes": s.attributes,
                "messages": s.messages,
                "transitions": s.transitions,
                "match_blocks": s.match_blocks,
                "interpolations": s.interpolations,
                "variables": s.variables,
            })),
            "diagnostics": diagnostics_json(&source, &output.diagnostics),
        });
        println!("{out:#}");
    } else if let Some(file) = &output.file {
        println!("{file:#?}");
    }

    if output.diagnostics.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(render_diagnostics(path, &source, &output.diagnostics)))
    }
}

/// Format a file in place, or report whether it needs formatting.
#[tracing::instrument(skip_all, fields(file = %path.display(), check, diff))]
pub fn format_file(path: &Path, check: bool, diff: bool, indent: Option<usize>) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let output = parse_source(&source, &ParseOptions::default());
    let mut config = FormatConfig::for_style(output.indent_style);
    if let Some(width) = indent {
        config = config.with_indent_width(width);
    }
    let file = output
        .into_result()
        .map_err(|diagnostics| CliError::failure(render_diagnostics(path, &source, &diagnostics)))?;
    let formatted = print_file(&file, &config);
    let changed = source != formatted;

    if diff && let Some(text) = line_diff(&source, &formatted) {
        println!("--- {}", path.display());
        print!("{text}");
    }

    if check || diff {
        if changed {
            return Err(CliError::failure(format!("Would reformat: {}", path.display())));
        }
        println!("✓ {} already formatted", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    if changed {
        fs::write(path, &formatted)
            .map_err(|e| CliError::failure(format!("Error writing {}: {}", path.display(), e)))?;
        println!("Formatted: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
