#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(doc) = tower_operator::infrastructure::repositories::parse_manifest(content) {
            // Whatever disc count survives parsing, validation must not panic
            let _ = tower_operator::MoveGenerator::generate(doc.spec.discs.min(20));
        }
    }
});
