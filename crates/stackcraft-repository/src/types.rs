//! Wire-format types decoded from snapshot and custom-snapshot documents
//! (§6). These are the raw, pre-materialization shape of a snapshot; the
//! materializer turns a `BuildPlan` into a `MiniPlan`.

use serde::{Deserialize, Serialize};
use stackcraft_core::{AHashMap, CompilerVersion, FlagAssignment, PackageIdentifier, Version};

/// `systemInfo` block of a snapshot document: the compiler this snapshot
/// was curated against, and the versions of packages the compiler ships
/// (and which therefore never need a package-index lookup).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemInfo {
    pub compiler_version: CompilerVersion,
    pub core_packages: AHashMap<stackcraft_core::PackageName, Version>,
}

/// Per-package constraints carried by a snapshot entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PackageConstraints {
    pub flag_overrides: FlagAssignment,
}

/// One package entry in a snapshot document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildPlanPackage {
    pub version: Version,
    #[serde(default)]
    pub constraints: PackageConstraints,
}

/// A decoded snapshot document: the raw input to the materializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildPlan {
    pub system_info: SystemInfo,
    pub packages: AHashMap<stackcraft_core::PackageName, BuildPlanPackage>,
}

/// A user-authored custom snapshot (§6): either a resolver reference plus
/// overrides, or a fully self-contained package list. `compiler` is kept
/// unparsed here; `stackcraft_core::CompilerVersion::from_str` is applied
/// by the caller so a malformed string surfaces as `Error::invalid_compiler`
/// rather than a generic deserialize failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CustomSnapshot {
    pub compiler: String,
    pub packages: Vec<PackageIdentifier>,
    #[serde(default)]
    pub flags: AHashMap<stackcraft_core::PackageName, FlagAssignment>,
}
