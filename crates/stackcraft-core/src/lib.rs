//! Core types and utilities for build-plan resolution.
//!
//! This crate provides the foundational data model shared by every other
//! crate in the workspace:
//! - Package/flag/snapshot identifiers and the version algebra
//! - Content-addressable hashing for cache keys
//! - JSON/YAML codec helpers
//! - The workspace's error taxonomy

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
mod hash;
mod json;
mod platform;
mod version;

pub use error::{Error, Result, ShadowedPackage, UnknownPackage};
pub use hash::{ContentHash, ContentHasher, sha256_hex};
pub use json::{from_json, from_json_slice, from_yaml, from_yaml_slice, to_json, to_json_pretty, to_yaml};
pub use platform::{Arch, Os, PackageConfig, Platform, is_wired_in_package};
pub use version::{
    CompilerVersion, FlagAssignment, FlagName, PackageIdentifier, PackageName, SnapName, Version,
    VersionRange,
};

// Re-exported for the rest of the workspace's concurrent data structures.
pub use ahash::{AHashMap, AHashSet};
pub use dashmap::DashMap;
pub use parking_lot::{Mutex, RwLock};

/// Global allocator for high-performance allocation across the workspace.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
