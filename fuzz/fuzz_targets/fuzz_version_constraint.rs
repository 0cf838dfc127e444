#![no_main]

use libfuzzer_sys::fuzz_target;
use stackcraft_core::{Version, VersionRange};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let range = VersionRange::parse(s);

        let test_versions = [
            Version::new(vec![0]),
            Version::new(vec![0, 0, 1]),
            Version::new(vec![0, 1, 0]),
            Version::new(vec![1, 0, 0]),
            Version::new(vec![1, 2, 3]),
            Version::new(vec![2, 0, 0]),
            Version::new(vec![10, 20, 30]),
            Version::new(vec![99, 99, 99]),
        ];

        if let Some(range) = &range {
            for version in &test_versions {
                // Should never panic regardless of how pathological the range is.
                let _ = range.within_range(version);
            }

            // Display must round-trip through the parser without panicking.
            let rendered = range.to_string();
            let _ = VersionRange::parse(&rendered);

            // Self-intersection and self-union must not panic either.
            let _ = range.clone().intersect(range.clone());
            let _ = range.clone().union(range.clone());
        }

        // Version parsing alone must never panic on arbitrary input.
        let _ = Version::parse(s);
    }
});
