//! The package-description oracle (§6): decouples the materializer and
//! per-package checker from any real Cabal-file parser. A production
//! implementation fetches and parses the package's declaration blob;
//! tests substitute a static table.

use crate::types::{ExeName, ToolName};
use stackcraft_core::{AHashMap, AHashSet, PackageConfig, PackageIdentifier, PackageName, Result, VersionRange};

/// A package's dependency/executable surface as resolved under one
/// `PackageConfig` (flags, compiler, platform, tests/bench toggles).
///
/// `dependency_ranges` carries the version range each dependency was
/// declared with: the materializer only needs the name set (a snapshot
/// already pins the version), but the per-package checker (§4.7) tests
/// pool versions against the range itself.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDescription {
    pub dependency_ranges: AHashMap<PackageName, VersionRange>,
    pub tool_deps: AHashSet<ToolName>,
    pub exes: AHashSet<ExeName>,
    pub has_library: bool,
}

impl ResolvedDescription {
    #[must_use]
    pub fn package_deps(&self) -> AHashSet<PackageName> {
        self.dependency_ranges.keys().cloned().collect()
    }
}

/// Resolves a package identifier's declaration under a given
/// configuration.
///
/// This combines the source's two-step `readPackageUnresolvedBS` /
/// `resolvePackageDescription` into one call: the raw-bytes fetch is an
/// external collaborator (§1) this crate does not implement.
pub trait PackageDescriptionOracle: Send + Sync {
    fn resolve(
        &self,
        ident: &PackageIdentifier,
        config: &PackageConfig,
    ) -> Result<ResolvedDescription>;
}
