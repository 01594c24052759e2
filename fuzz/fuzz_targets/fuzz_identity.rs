#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        if let Ok(identity) = tower_operator::ParentIdentity::new(name) {
            let _ = identity.record_name(usize::MAX);
        }
    }
});
