//! Golden snapshot tests for the canonical printer
//!
//! These tests format `.rcl` input files and compare the output against
//! stored snapshots, so layout changes are reviewed and intentional.
//!
//! Run with: `cargo test --test format_snapshot_tests`
//! Review changes: `cargo insta review`

use std::fs;

use rcl::format_source;

/// Load a test file from the format_snapshots directory
fn load_test_file(name: &str) -> String {
    let path = format!("{}/tests/format_snapshots/{name}.rcl", env!("CARGO_MANIFEST_DIR"));
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read test file: {path}"))
}

fn format_fixture(name: &str) -> String {
    let source = load_test_file(name);
    format_source(&source).unwrap_or_else(|d| panic!("{name} failed to format: {d:#?}"))
}

#[test]
fn test_messy_spacing_format() {
    let formatted = format_fixture("messy");
    insta::assert_snapshot!("messy", formatted);
}

#[test]
fn test_block_values_format() {
    let formatted = format_fixture("blocks");
    insta::assert_snapshot!("blocks", formatted);
}

#[test]
fn test_snapshots_are_fixed_points() {
    for name in ["messy", "blocks"] {
        let formatted = format_fixture(name);
        assert_eq!(format_source(&formatted).expect("formats again"), formatted, "{name}");
    }
}
