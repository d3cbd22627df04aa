//! Property-based tests for the RCL lexer, parser and printer
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;
use rcl::diagnostics::line_col;
use rcl::format_source;
use rcl::lexer::{Token, TokenKind, tokenize};
use rcl::parser::{parse, parse_batch};

// =============================================================================
// Generators
// =============================================================================

/// Source-like text: indentation, line breaks and every character that switches lexer modes.
fn sourceish() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("\n".to_string()),
            Just("  ".to_string()),
            Just("\t".to_string()),
            Just("\"\"\"".to_string()),
            Just("$js>>>".to_string()),
            Just("+|+".to_string()),
            Just("|-".to_string()),
            Just("#{".to_string()),
            Just("(".to_string()),
            Just("{".to_string()),
            Just("-1".to_string()),
            Just("@a.as".to_string()),
            "[a-zA-Z0-9 :\"#{}$@<>|()/,.\\-é→]{1,6}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

fn key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}".prop_map(|s| format!("k_{s}"))
}

/// `:name`, never `:default`, which is the match fallback rather than an atom.
fn atom() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
        .prop_filter("default case marker", |s| s != "default")
        .prop_map(|s| format!(":{s}"))
}

fn scalar() -> impl Strategy<Value = String> {
    prop_oneof![
        (-999i32..999).prop_map(|n| n.to_string()),
        "[a-zA-Z0-9 ,.!?]{0,12}".prop_map(|s| format!("\"{s}\"")),
        atom(),
        prop::sample::select(vec!["True", "No", "None"]).prop_map(str::to_string),
        (
            prop::sample::select(vec!["@user", "$order", "name"]),
            prop::sample::select(vec!["as", "to", "with", "email", "k_id"]),
        )
            .prop_map(|(root, segment)| format!("\"hi #{{{root}.{segment}}}\"")),
        ("[a-z]{1,6}", "[a-z0-9-]{1,8}", prop::option::of("[A-Z]{1,3}")).prop_map(|(name, content, secondary)| {
            match secondary {
                Some(secondary) => format!("<{name} {content} | {secondary}>"),
                None => format!("<{name} {content}>"),
            }
        }),
    ]
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => scalar(),
        1 => prop::collection::vec(scalar(), 0..4).prop_map(|items| format!("({})", items.join(", "))),
        1 => prop::collection::vec((key(), scalar()), 0..3).prop_map(|entries| {
            let entries: Vec<String> = entries.into_iter().map(|(k, v)| format!("{k}: {v}")).collect();
            format!("{{{}}}", entries.join(", "))
        }),
    ]
}

fn target() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Start", "Main Menu", "Checkout", "Goodbye"]).prop_map(str::to_string)
}

/// Lines of a `|`, `|-`, `+|` or `+|+` block at `indent`, some with trailing spaces or extra indentation.
fn block_scalar(indent: usize) -> impl Strategy<Value = String> {
    let line = ("[a-z][a-z .,!]{0,10}", any::<bool>(), any::<bool>());
    (
        prop::sample::select(vec!["|", "|-", "+|", "+|+"]),
        prop::collection::vec(line, 1..4),
        any::<bool>(),
    )
        .prop_map(move |(marker, lines, blank_after_first)| {
            let pad = " ".repeat(indent);
            let mut out = format!("{marker}\n");
            for (i, (text, padded, deeper)) in lines.iter().enumerate() {
                let extra = if *deeper && i > 0 { "  " } else { "" };
                let trailing = if *padded { "  " } else { "" };
                out.push_str(&format!("{pad}{extra}{text}{trailing}\n"));
                if i == 0 && blank_after_first && lines.len() > 1 {
                    out.push('\n');
                }
            }
            out
        })
}

fn fenced_code(indent: usize) -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["$js>>>", "$ts>>>", "$>>>"]),
        prop::collection::vec(("[a-z][a-z0-9();= ]{0,10}", any::<bool>()), 1..4),
    )
        .prop_map(move |(marker, lines)| {
            let pad = " ".repeat(indent);
            let mut out = format!("{marker}\n");
            for (text, deeper) in lines {
                let extra = if deeper { "  " } else { "" };
                out.push_str(&format!("{pad}{extra}{text}\n"));
            }
            out
        })
}

/// `key:` followed by an indented block list or block dictionary.
fn block_collection(indent: usize) -> impl Strategy<Value = String> {
    let pad = " ".repeat(indent);
    let list_pad = pad.clone();
    prop_oneof![
        prop::collection::vec(scalar(), 1..4).prop_map(move |items| {
            let lines: Vec<String> = items.iter().map(|v| format!("{list_pad}- {v}\n")).collect();
            format!("\n{}", lines.concat())
        }),
        prop::collection::vec((key(), scalar()), 1..4).prop_map(move |entries| {
            let lines: Vec<String> = entries.iter().map(|(k, v)| format!("{pad}{k}: {v}\n")).collect();
            format!("\n{}", lines.concat())
        }),
    ]
}

/// Attribute value text including its line break; block forms continue on deeper lines.
fn attribute_value(indent: usize) -> BoxedStrategy<String> {
    prop_oneof![
        6 => value().prop_map(|v| format!(" {v}\n")),
        1 => block_scalar(indent + 2).prop_map(|b| format!(" {b}")),
        1 => fenced_code(indent + 2).prop_map(|c| format!(" {c}")),
        1 => block_collection(indent + 2),
    ]
    .boxed()
}

fn transition(indent: usize) -> BoxedStrategy<String> {
    let pad = " ".repeat(indent);
    let handler_pad = " ".repeat(indent + 2);
    prop_oneof![
        3 => target().prop_map(|t| format!("-> {t}\n")),
        1 => (target(), key(), scalar()).prop_map(|(t, k, v)| format!("-> {t} with {k}: {v}\n")),
        1 => (target(), prop::collection::vec((atom(), target()), 0..3)).prop_map(move |(flow, handlers)| {
            let handlers: Vec<String> =
                handlers.iter().map(|(outcome, t)| format!("{handler_pad}on {outcome} -> {t}\n")).collect();
            format!("-> start {flow} with {}: 1\n{}", "k_id", handlers.concat())
        }),
        1 => (key(), scalar()).prop_map(|(k, v)| format!("-> set @user.{k} to {v}\n")),
        1 => target().prop_map(|t| format!("-> append $item to @cart.items -> {t}\n")),
        1 => (key(), scalar()).prop_map(|(k, v)| format!("-> merge {{{k}: {v}}} into @prefs\n")),
    ]
    .prop_map(move |line| format!("{pad}{line}"))
    .boxed()
}

fn match_block(indent: usize) -> impl Strategy<Value = String> {
    let pattern = prop_oneof![
        (-99i32..99).prop_map(|n| n.to_string()),
        "[a-z]{1,6}".prop_map(|s| format!("\"{s}\"")),
        atom(),
        "[a-z]{1,5}".prop_map(|s| format!("/{s}/")),
    ];
    (
        prop::sample::select(vec!["$x", "@user.plan"]),
        prop::collection::vec((pattern, target()), 1..4),
        prop::option::of(target()),
    )
        .prop_map(move |(subject, cases, fallback)| {
            let pad = " ".repeat(indent);
            let case_pad = " ".repeat(indent + 2);
            let mut out = format!("{pad}match {subject}\n");
            for (pattern, t) in cases {
                out.push_str(&format!("{case_pad}{pattern} -> {t}\n"));
            }
            if let Some(t) = fallback {
                out.push_str(&format!("{case_pad}:default -> {t}\n"));
            }
            out
        })
}

/// A body item at the given indentation, possibly spanning several lines.
fn body_line(indent: usize) -> BoxedStrategy<String> {
    let pad = " ".repeat(indent);
    let attribute_pad = pad.clone();
    let spread_pad = pad.clone();
    prop_oneof![
        6 => (key(), attribute_value(indent)).prop_map(move |(k, v)| format!("{attribute_pad}{k}:{v}")),
        3 => transition(indent),
        1 => match_block(indent),
        1 => target().prop_map(move |t| format!("{spread_pad}...{t}\n")),
        1 => (target(), "[a-zA-Z ]{0,8}", prop::option::of(atom())).prop_map(move |(name, text, atom)| {
            let atom = atom.map(|a| format!(" {a}")).unwrap_or_default();
            format!("{pad}text {name} \"{text}\"{atom}\n")
        }),
    ]
    .boxed()
}

fn section(indent: usize, nested: bool) -> BoxedStrategy<String> {
    let header = (prop::sample::select(vec!["agent", "flow", "step"]), target())
        .prop_map(move |(kind, id)| format!("{}{kind} {id}\n", " ".repeat(indent)));
    let lines = prop::collection::vec(body_line(indent + 2), 1..4);
    if nested {
        let children = prop::collection::vec(section(indent + 2, false), 0..3);
        (header, lines, children)
            .prop_map(|(h, lines, children)| format!("{h}{}{}", lines.concat(), children.concat()))
            .boxed()
    } else {
        (header, lines).prop_map(|(h, lines)| format!("{h}{}", lines.concat())).boxed()
    }
}

fn well_formed_file() -> impl Strategy<Value = String> {
    prop::collection::vec(section(0, true), 1..4).prop_map(|sections| sections.concat())
}

fn depth(tokens: &[Token]) -> i32 {
    tokens.iter().map(Token::depth_delta).sum()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: block starts and block ends balance for any input, and the stream ends with `Eof`
    #[test]
    fn indents_and_dedents_balance(source in sourceish()) {
        let (tokens, _) = tokenize(&source);
        prop_assert_eq!(depth(&tokens), 0);
        prop_assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    /// Property: the parser never panics and batch mode always returns diagnostics for broken input
    #[test]
    fn batch_parse_is_total(source in sourceish()) {
        let (_, diagnostics) = parse_batch(&source);
        if parse(&source).is_err() {
            prop_assert!(!diagnostics.is_empty());
        }
    }

    /// Property: print then re-parse yields the same tree, and printing is idempotent
    #[test]
    fn print_round_trip_keeps_shape(source in well_formed_file()) {
        let original = parse(&source).map_err(|d| TestCaseError::fail(format!("{d:#?}\n{source}")))?;
        let printed = format_source(&source).map_err(|d| TestCaseError::fail(format!("{d:#?}")))?;
        let reparsed = parse(&printed).map_err(|d| TestCaseError::fail(format!("{d:#?}\n{printed}")))?;
        prop_assert!(original.same_shape(&reparsed), "shape changed:\n{}", printed);
        prop_assert_eq!(format_source(&printed).ok(), Some(printed.clone()));
    }

    /// Property: an unclosed bracket ends with its line, so the rest of the file still parses
    #[test]
    fn unclosed_bracket_stays_on_its_line(source in well_formed_file()) {
        let original = parse(&source).map_err(|d| TestCaseError::fail(format!("{d:#?}\n{source}")))?;
        let header_end = source.find('\n').map_or(source.len(), |i| i + 1);
        let broken = format!("{}  k_open: (1, 2\n{}", &source[..header_end], &source[header_end..]);
        let (file, diagnostics) = parse_batch(&broken);
        prop_assert_eq!(diagnostics.len(), 1, "{:#?}\n{}", diagnostics, broken);
        prop_assert_eq!(file.sections().count(), original.sections().count());
    }

    /// Property: a dedent to a width that no open block uses is reported exactly once, on that line
    #[test]
    fn misaligned_dedent_reported_once(outer in 1usize..6, extra in 1usize..6, cut in 1usize..6) {
        let inner = outer + extra;
        let misaligned = outer + cut.min(extra - 1).max(1);
        prop_assume!(misaligned > outer && misaligned < inner);
        let source = format!(
            "a\n{}b\n{}c\n{}d\ne\n",
            " ".repeat(outer),
            " ".repeat(inner),
            " ".repeat(misaligned)
        );
        let (tokens, diagnostics) = tokenize(&source);
        prop_assert_eq!(diagnostics.len(), 1);
        prop_assert!(diagnostics[0].message.contains("inconsistent indentation"));
        prop_assert_eq!(line_col(&source, diagnostics[0].span.start).0, 4);
        prop_assert_eq!(depth(&tokens), 0);
    }
}

#[test]
fn format_handles_empty_input() {
    for source in ["", "\n\n\n", "# comment only\n"] {
        assert_eq!(format_source(source), Ok(String::new()));
    }
}
