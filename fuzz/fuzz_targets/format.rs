#![no_main]

use libfuzzer_sys::fuzz_target;
use rcl::format_source;
use rcl::parser::parse;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Whatever parses must print to something that parses to the same tree
        if let (Ok(original), Ok(printed)) = (parse(s), format_source(s)) {
            let reparsed = parse(&printed).expect("printed source parses");
            assert!(original.same_shape(&reparsed), "print changed the tree:\n{printed}");
        }
    }
});
