//! Fuzz target: `escape_query`
//!
//! Every escaped string must consist of unreserved bytes and well-formed
//! `%XX` triples only.
//!
//! cargo fuzz run fuzz_query_escape

#![no_main]

use gardengate::adapters::utils::escape_query;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    let escaped = escape_query(text);
    let bytes = escaped.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            assert!(i + 2 < bytes.len());
            assert!(bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit());
            i += 3;
        } else {
            assert!(bytes[i].is_ascii_alphanumeric() || b"-._~".contains(&bytes[i]));
            i += 1;
        }
    }
});
