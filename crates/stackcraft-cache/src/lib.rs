//! Versioned binary cache envelope for materialized build plans.
//!
//! A `MiniPlan` is produced once per (snapshot, compiler) pair and cached
//! on disk in a tag-versioned binary envelope (§4.3, §6): retrieval
//! validates the tag and rebuilds on any mismatch or decode failure. The
//! same envelope format backs the hash-addressed custom-snapshot cache
//! (§5).
//!
//! Writers use a temp-file-plus-rename so a reader never observes a
//! partially written file (§5): no in-process lock is required because
//! the cache key is itself content-addressed or version-tagged.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

use rkyv::rancor::Error as RancorError;
use rkyv::{Archive, Deserialize, Serialize};
use stackcraft_core::{ContentHash, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The current schema tag. Bump whenever the archived envelope's schema
/// changes in a way that would break `rkyv` access on old files.
pub const SCHEMA_TAG: u32 = 1;

/// On-disk envelope: a schema tag plus the archived payload.
#[derive(Archive, Serialize, Deserialize, Debug, Clone)]
#[rkyv(derive(Debug))]
pub struct Envelope<T> {
    tag: u32,
    payload: T,
}

/// Decode `path` if it holds an envelope tagged `SCHEMA_TAG`; otherwise
/// run `build`, cache the result atomically, and return it.
///
/// Mirrors the external `taggedDecodeOrLoad` interface (§6): a missing or
/// malformed cache file, or a schema-tag mismatch, are both treated as a
/// cache miss rather than an error.
pub fn tagged_decode_or_load<T, F>(path: &Path, build: F) -> Result<T>
where
    T: Archive
        + for<'a> Serialize<rkyv::api::high::HighSerializer<rkyv::util::AlignedVec, rkyv::ser::allocator::ArenaHandle<'a>, RancorError>>
        + Clone,
    T::Archived: rkyv::Deserialize<T, rkyv::api::high::HighDeserializer<RancorError>>,
    F: FnOnce() -> Result<T>,
{
    if let Some(value) = try_decode(path) {
        debug!(path = %path.display(), "cache hit");
        return Ok(value);
    }

    debug!(path = %path.display(), "cache miss, rebuilding");
    let value = build()?;
    store(path, &value)?;
    Ok(value)
}

fn try_decode<T>(path: &Path) -> Option<T>
where
    T: Archive,
    T::Archived: rkyv::Deserialize<T, rkyv::api::high::HighDeserializer<RancorError>>,
{
    let bytes = fs::read(path).ok()?;
    let envelope: Envelope<T> = match rkyv::from_bytes::<Envelope<T>, RancorError>(&bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cache decode failed, will rebuild");
            return None;
        }
    };
    if envelope.tag != SCHEMA_TAG {
        warn!(path = %path.display(), tag = envelope.tag, "cache schema mismatch, will rebuild");
        return None;
    }
    Some(envelope.payload)
}

/// Atomically write `value` to `path` as a tagged envelope.
///
/// # Errors
/// Returns an error if the parent directory cannot be created, the temp
/// file cannot be written, or the rename fails.
pub fn store<T>(path: &Path, value: &T) -> Result<()>
where
    T: Archive
        + for<'a> Serialize<rkyv::api::high::HighSerializer<rkyv::util::AlignedVec, rkyv::ser::allocator::ArenaHandle<'a>, RancorError>>
        + Clone,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let envelope = Envelope {
        tag: SCHEMA_TAG,
        payload: value.clone(),
    };
    let bytes = rkyv::to_bytes::<RancorError>(&envelope)
        .map_err(|e| Error::cache(format!("failed to serialize cache entry: {e}")))?;

    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, &bytes).map_err(|e| Error::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| format!(".{}.tmp", n.to_string_lossy()))
        .unwrap_or_else(|| ".cache.tmp".to_string());
    path.with_file_name(file_name)
}

/// Hash-addressed path for a content-keyed cache entry (custom
/// snapshots, §5): `root/<first-2-hex>/<rest-hex>`.
#[must_use]
pub fn content_addressed_path(root: &Path, hash: &ContentHash) -> PathBuf {
    let hex = hash.to_hex();
    let (prefix, rest) = hex.split_at(2);
    root.join(prefix).join(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkyv::rancor::Error as RancorError;

    #[derive(Archive, Serialize, Deserialize, Debug, Clone, PartialEq)]
    #[rkyv(derive(Debug))]
    struct Sample {
        name: String,
        values: Vec<u32>,
    }

    #[test]
    fn cache_miss_runs_build_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.bin");
        let mut calls = 0;

        let sample = Sample {
            name: "a".to_string(),
            values: vec![1, 2, 3],
        };
        let expected = sample.clone();
        let got = tagged_decode_or_load(&path, || {
            calls += 1;
            Ok(expected.clone())
        })
        .unwrap();
        assert_eq!(got, sample);
        assert_eq!(calls, 1);
        assert!(path.exists());

        let got_again = tagged_decode_or_load(&path, || {
            calls += 1;
            Ok(sample.clone())
        })
        .unwrap();
        assert_eq!(got_again, sample);
        assert_eq!(calls, 1, "second call should hit the cache, not rebuild");
    }

    #[test]
    fn malformed_cache_file_triggers_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.bin");
        fs::write(&path, b"not a valid envelope").unwrap();

        let sample = Sample {
            name: "b".to_string(),
            values: vec![],
        };
        let got = tagged_decode_or_load(&path, || Ok(sample.clone())).unwrap();
        assert_eq!(got, sample);
    }

    #[test]
    fn schema_tag_mismatch_triggers_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.bin");
        let stale = Envelope {
            tag: SCHEMA_TAG + 1,
            payload: Sample {
                name: "stale".to_string(),
                values: vec![9],
            },
        };
        let bytes = rkyv::to_bytes::<RancorError>(&stale).unwrap();
        fs::write(&path, &bytes).unwrap();

        let fresh = Sample {
            name: "fresh".to_string(),
            values: vec![1],
        };
        let got = tagged_decode_or_load(&path, || Ok(fresh.clone())).unwrap();
        assert_eq!(got, fresh);
    }

    #[test]
    fn content_addressed_path_splits_prefix() {
        let hash = ContentHash::of(b"hello world");
        let path = content_addressed_path(Path::new("/cache"), &hash);
        let hex = hash.to_hex();
        assert_eq!(path, Path::new("/cache").join(&hex[..2]).join(&hex[2..]));
    }
}
