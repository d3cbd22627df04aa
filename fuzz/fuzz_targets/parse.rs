#![no_main]

use libfuzzer_sys::fuzz_target;
use rcl::lexer;
use rcl::ParseOptions;
use rcl::parser::parse_source;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // The token stream must stay balanced whatever the input
        let (tokens, _) = lexer::tokenize(s);
        let depth: i32 = tokens.iter().map(|t| t.depth_delta()).sum();
        assert_eq!(depth, 0, "unbalanced block tokens");

        // Both policies must terminate without panicking
        let _ = parse_source(s, &ParseOptions::default());
        let _ = parse_source(s, &ParseOptions::batch());
    }
});
