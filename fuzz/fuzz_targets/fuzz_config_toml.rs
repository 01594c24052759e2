#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing, including unknown-key suggestions, must never panic
        let _ = tower_operator::config::parse_with_warnings(
            content,
            std::path::Path::new("fuzz.toml"),
        );
    }
});
