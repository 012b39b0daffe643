//! Validator fuzz target: feed arbitrary text to the netstring validator.
//! It must not panic, with whitespace kept the validated text must be a prefix of the input, and validating
//! that text again must give it back unchanged.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    for skip_whitespace in [true, false] {
        let parser = netstring_parser::NetstringParser::new(netstring_parser::ParserOptions { skip_whitespace });
        if let Ok(text) = parser.parse(s) {
            if !skip_whitespace {
                assert!(s.starts_with(&text));
            }
            assert_eq!(parser.parse(&text).ok().as_deref(), Some(text.as_str()));
        }
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
