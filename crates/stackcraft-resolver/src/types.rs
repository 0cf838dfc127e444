//! Core data types for the materialized build-plan domain (§3): `MiniPlan`,
//! the per-package summary it's built from, and the dependency-error
//! accounting types the flag selector and bundle checker thread through.

use stackcraft_core::{
    AHashMap, AHashSet, CompilerVersion, FlagAssignment, PackageName, Version, VersionRange,
};
use std::sync::Arc;

/// An executable name a package provides.
pub type ExeName = Arc<str>;
/// An executable name required as a tool dependency, prior to tool-map
/// resolution.
pub type ToolName = Arc<str>;

/// Per-package summary distilled from a resolved package description (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniPackageInfo {
    pub version: Version,
    pub flags: FlagAssignment,
    /// Library and executable dependencies, self-excluded.
    pub package_deps: AHashSet<PackageName>,
    /// Unresolved executable names, expanded via the tool map (§4.4).
    pub tool_deps: AHashSet<ToolName>,
    pub exes: AHashSet<ExeName>,
    pub has_library: bool,
}

/// A materialized snapshot: every package's resolved metadata, keyed by
/// name (§3).
#[derive(Debug, Clone)]
pub struct MiniPlan {
    pub compiler_version: CompilerVersion,
    pub packages: AHashMap<PackageName, MiniPackageInfo>,
}

impl MiniPlan {
    #[must_use]
    pub fn new(compiler_version: CompilerVersion) -> Self {
        Self {
            compiler_version,
            packages: AHashMap::default(),
        }
    }
}

/// A reverse index from executable name to the set of packages providing
/// it (§4.4).
pub type ToolMap = AHashMap<ToolName, AHashSet<PackageName>>;

/// One package's unmet or conflicting dependency, accumulated across every
/// requirer that mentioned it (§3).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepError {
    pub observed: Option<Version>,
    pub needed_by: AHashMap<PackageName, VersionRange>,
}

impl DepError {
    /// Monoidal combine: the right-hand `observed` wins when present (a
    /// later observation of a concrete conflicting version enriches the
    /// diagnostic); `neededBy` ranges intersect per requirer (§9).
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        if other.observed.is_some() {
            self.observed = other.observed;
        }
        for (name, range) in other.needed_by {
            match self.needed_by.remove(&name) {
                Some(existing) => {
                    self.needed_by.insert(name, existing.intersect(range));
                }
                None => {
                    self.needed_by.insert(name, range);
                }
            }
        }
        self
    }
}

/// A package-name indexed map of `DepError`s (§3).
pub type DepErrors = AHashMap<PackageName, DepError>;

/// Monoidal combine over two `DepErrors` maps (property 10).
#[must_use]
pub fn combine_dep_errors(mut a: DepErrors, b: DepErrors) -> DepErrors {
    for (name, err) in b {
        match a.remove(&name) {
            Some(existing) => {
                a.insert(name, existing.combine(err));
            }
            None => {
                a.insert(name, err);
            }
        }
    }
    a
}

/// The verdict of checking a snapshot or package's build plan against a
/// version pool (§3). `Fail` is reserved for conflicts touching a
/// compiler-wired-in package.
#[derive(Debug, Clone)]
pub enum BuildPlanCheck {
    Ok(FlagAssignment),
    Partial(FlagAssignment, DepErrors),
    Fail(CompilerVersion, DepErrors),
}
