#![no_main]

use boolsearch::query::{parse_query, tokenize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Any input either parses or yields a typed error, never a panic
    let _ = tokenize(data);
    if let Ok(tree) = parse_query(data) {
        assert!(tree.terms().iter().all(|t| !t.is_empty()));
    }
});
