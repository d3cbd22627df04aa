//! Integration tests for the RCL frontend and printer

use std::fs;
use std::path::Path;

use rcl::ast::{
    AttributeTarget, BodyItem, File, FileItem, Interpolation, MatchPattern, Section, StringPart, TransitionTarget,
    Value,
};
use rcl::lexer::{self, TokenKind};
use rcl::parser::{self, parse_source};
use rcl::visit::NodeStats;
use rcl::{DiagnosticKind, ErrorPolicy, ParseOptions, format_source};

fn fixtures(kind: &str) -> Vec<std::path::PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(kind);
    let mut paths: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().map(|e| e == "rcl").unwrap_or(false))
        .collect();
    paths.sort();
    paths
}

fn only_section(file: &File) -> &Section {
    let sections: Vec<_> = file.sections().collect();
    assert_eq!(sections.len(), 1, "expected exactly one section");
    sections[0]
}

/// Test that all valid fixtures parse and survive a print/re-parse round trip
#[test]
fn test_valid_fixtures() {
    let paths = fixtures("valid");
    assert!(!paths.is_empty());
    for path in paths {
        let source = fs::read_to_string(&path).unwrap();
        let file = parser::parse(&source)
            .unwrap_or_else(|d| panic!("{} failed to parse: {d:#?}", path.display()));
        let printed = format_source(&source).unwrap();
        let reparsed = parser::parse(&printed)
            .unwrap_or_else(|d| panic!("{} printed form failed to parse: {d:#?}\n{printed}", path.display()));
        assert!(file.same_shape(&reparsed), "{} changed shape:\n{printed}", path.display());
    }
}

/// Test that invalid fixtures produce errors in both policies
#[test]
fn test_invalid_fixtures() {
    let paths = fixtures("invalid");
    assert!(!paths.is_empty());
    for path in paths {
        let source = fs::read_to_string(&path).unwrap();
        let fail_fast = parse_source(&source, &ParseOptions::default());
        assert!(fail_fast.file.is_none(), "{} produced a tree in fail-fast mode", path.display());
        assert!(fail_fast.has_errors(), "{} produced no diagnostics", path.display());

        let batch = parse_source(&source, &ParseOptions::batch());
        assert!(batch.file.is_some(), "{} produced no best-effort tree", path.display());
        assert!(batch.diagnostics.len() >= fail_fast.diagnostics.len());
    }
}

#[test]
fn test_support_fixture_contents() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/valid/support_agent.rcl");
    let file = parser::parse(&fs::read_to_string(path).unwrap()).unwrap();
    assert!(matches!(file.items[0].node, FileItem::Import(_)));

    let stats = NodeStats::collect(&file);
    assert_eq!(stats.imports, 1);
    assert_eq!(stats.sections, 4);
    assert_eq!(stats.messages, 1);
    assert_eq!(stats.match_blocks, 1);
    assert_eq!(stats.interpolations, 2);
}

#[test]
fn test_nested_sections_with_transition() {
    let file = parser::parse("agent Foo\n  flow Start\n    -> End\n").unwrap();
    let agent = only_section(&file);
    assert_eq!(agent.header.section_type.node, "agent");
    assert_eq!(agent.header.id.as_ref().map(|id| id.node.as_str()), Some("Foo"));

    let BodyItem::Section(flow) = &agent.body[0].node else {
        panic!("expected nested section");
    };
    assert_eq!(flow.header.section_type.node, "flow");
    assert_eq!(flow.header.id.as_ref().map(|id| id.node.as_str()), Some("Start"));

    let BodyItem::Transition(transition) = &flow.body[0].node else {
        panic!("expected transition");
    };
    let TransitionTarget::Value(target) = &transition.target else {
        panic!("expected plain target");
    };
    assert_eq!(target.value.node, Value::Identifier("End".to_string()));
}

#[test]
fn test_variable_binding_interpolation() {
    let file = parser::parse("agent A\n  $greeting = \"Hi ${name}\"\n").unwrap();
    let BodyItem::Attribute(attr) = &only_section(&file).body[0].node else {
        panic!("expected attribute");
    };
    assert!(matches!(attr.target, AttributeTarget::Variable(_)));
    let Value::String(string) = &attr.value.node else {
        panic!("expected string");
    };
    let interpolations: Vec<_> = string.interpolations().collect();
    assert_eq!(interpolations.len(), 1);
    let Interpolation::Path(path) = &interpolations[0].node else {
        panic!("expected path interpolation");
    };
    assert_eq!(path.root, "name");
    assert!(path.segments.is_empty());
    assert!(matches!(&string.parts[0], StringPart::Text(text) if text == "Hi "));
}

#[test]
fn test_trim_modes_on_same_content() {
    let content = "    first  \n    second\t\n";
    let preserve_all = parser::parse(&format!("agent A\n  text: +|+\n{content}")).unwrap();
    let trim = parser::parse(&format!("agent A\n  text: |-\n{content}")).unwrap();

    let text_of = |file: &File| {
        let BodyItem::Attribute(attr) = &only_section(file).body[0].node else {
            panic!("expected attribute");
        };
        let Value::MultiLine(text) = &attr.value.node else {
            panic!("expected multi-line string");
        };
        text.clone()
    };
    assert_eq!(text_of(&preserve_all).text(), "first  \nsecond\t\n");
    let trimmed: Vec<String> = text_of(&trim).segments.into_iter().map(|s| s.text).collect();
    assert_eq!(trimmed, ["first", "second"]);
}

#[test]
fn test_match_cases_keep_source_order() {
    let file = parser::parse("flow F\n  match $x\n    \"a\" -> Foo\n    :default -> Bar\n").unwrap();
    let BodyItem::Match(block) = &only_section(&file).body[0].node else {
        panic!("expected match block");
    };
    assert_eq!(block.cases.len(), 2);
    assert!(matches!(&block.cases[0].node.pattern.node, MatchPattern::String(s) if s.as_plain().as_deref() == Some("a")));
    assert_eq!(block.cases[1].node.pattern.node, MatchPattern::Default);
}

#[test]
fn test_inconsistent_indent_reports_line() {
    let source = "agent A\n    name: 1\n  other: 2\n";
    let (tokens, diagnostics) = lexer::tokenize(source);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Lexical);
    let (line, _) = rcl::diagnostics::line_col(source, diagnostics[0].span.start);
    assert_eq!(line, 3);

    let depth: i32 = tokens.iter().map(|t| t.depth_delta()).sum();
    assert_eq!(depth, 0);
}

#[test]
fn test_fail_fast_stops_batch_continues() {
    let source = "agent A\n  name: )\n  flow Start\n    -> )\n";
    let fail_fast = parse_source(source, &ParseOptions::new().with_error_policy(ErrorPolicy::FailFast));
    assert_eq!(fail_fast.diagnostics.len(), 1);
    assert!(fail_fast.file.is_none());

    let batch = parse_source(source, &ParseOptions::batch());
    assert_eq!(batch.diagnostics.len(), 2);
    let file = batch.file.expect("best-effort tree");
    assert_eq!(file.sections().count(), 1);
}

#[test]
fn test_lexer_stream_ends_with_eof() {
    let tokens = lexer::lex("agent A\n").unwrap();
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

#[test]
fn test_cli_commands_on_fixture() {
    let valid = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/valid/values.rcl");
    assert!(rcl::cli::commands::lex_file(&valid, true).is_ok());
    assert!(rcl::cli::commands::parse_file(&valid, true, false).is_ok());

    let invalid = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/invalid/missing_arrow.rcl");
    let err = rcl::cli::commands::parse_file(&invalid, true, true).unwrap_err();
    assert!(err.message.contains("->"));

    let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/none.rcl");
    assert!(rcl::cli::commands::read_source(&missing).is_err());
}

#[test]
fn test_fmt_command_check_mode() {
    let dir = std::env::temp_dir().join(format!("rcl-fmt-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("messy.rcl");
    fs::write(&path, "agent   A\n  name:    1\n").unwrap();

    assert!(rcl::cli::commands::format_file(&path, true, false, None).is_err());
    assert!(rcl::cli::commands::format_file(&path, false, false, None).is_ok());
    assert_eq!(fs::read_to_string(&path).unwrap(), "agent A\n  name: 1\n");
    assert!(rcl::cli::commands::format_file(&path, true, false, None).is_ok());

    fs::remove_dir_all(&dir).unwrap();
}
