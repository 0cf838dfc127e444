//! Content-addressed hashing for cache keys.
//!
//! Two hash families are used: `blake3` for the fast, general-purpose
//! cache keys the binary cache envelope uses (snapshot tag, per-package
//! memoization), and SHA-256 for custom-snapshot content addressing,
//! where the spec fixes the algorithm (§5) so the cache path is stable
//! across implementations.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A blake3 digest, hex-rendered for use as a cache path component.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Incremental hasher for streaming content (cabal-file bytes, snapshot
/// documents) into a `ContentHash` without buffering the whole input.
#[derive(Debug, Default, Clone)]
pub struct ContentHasher(blake3::Hasher);

impl ContentHasher {
    #[must_use]
    pub fn new() -> Self {
        Self(blake3::Hasher::new())
    }

    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.update(bytes);
        self
    }

    #[must_use]
    pub fn finalize(&self) -> ContentHash {
        ContentHash(*self.0.finalize().as_bytes())
    }
}

/// SHA-256 hex digest of `bytes`, used to content-address custom
/// snapshot cache entries (spec §5: "SHA-256 of the source document for
/// custom snapshots").
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_deterministic() {
        assert_eq!(ContentHash::of(b"abc"), ContentHash::of(b"abc"));
        assert_ne!(ContentHash::of(b"abc"), ContentHash::of(b"abd"));
    }

    #[test]
    fn hasher_matches_one_shot() {
        let mut hasher = ContentHasher::new();
        hasher.update(b"ab").update(b"c");
        assert_eq!(hasher.finalize(), ContentHash::of(b"abc"));
    }

    #[test]
    fn sha256_hex_is_64_chars() {
        let digest = sha256_hex(b"hello");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, sha256_hex(b"hello"));
    }
}
