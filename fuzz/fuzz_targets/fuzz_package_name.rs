#![no_main]

use libfuzzer_sys::fuzz_target;
use stackcraft_core::PackageName;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let parsed = PackageName::parse(s);

        if let Some(name) = &parsed {
            // A parsed name round-trips through Display unchanged.
            assert_eq!(name.as_str(), s, "parsed name should echo its input: {s}");
            // Parsing its own rendering must succeed and agree.
            assert_eq!(PackageName::parse(name.as_str()).as_ref(), Some(name));
        }

        // Parsing must never panic on trimmed or uppercased variants either.
        let _ = PackageName::parse(s.trim());
        let _ = PackageName::parse(&s.to_lowercase());
    }
});
