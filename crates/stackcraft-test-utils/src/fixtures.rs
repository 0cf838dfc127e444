//! Pre-built test fixtures: snapshot documents, `MiniPlan`s, and package
//! identifiers for common resolution scenarios.

use stackcraft_core::{AHashMap, FlagAssignment, PackageIdentifier, PackageName, Version};
use stackcraft_resolver::{MiniPackageInfo, MiniPlan};

/// Fixture builders, grouped as associated functions the way call sites
/// reach for `Fixtures::...`.
pub struct Fixtures;

impl Fixtures {
    /// A minimal valid snapshot document: a compiler, no core packages,
    /// no user packages.
    #[must_use]
    pub fn empty_snapshot_yaml() -> String {
        r#"
system-info:
  compiler-version: !Ghc 9.4.7
  core-packages: {}
packages: {}
"#
        .trim_start()
        .to_string()
    }

    /// A small snapshot with two independent packages and no core
    /// packages, suitable for exercising the materializer end to end.
    #[must_use]
    pub fn small_snapshot_yaml() -> String {
        r#"
system-info:
  compiler-version: !Ghc 9.4.7
  core-packages: {}
packages:
  aeson:
    version: 2.1.2.1
  text:
    version: 2.0.2
"#
        .trim_start()
        .to_string()
    }

    /// A snapshot entry carrying a non-default flag override.
    #[must_use]
    pub fn snapshot_with_flag_override_yaml() -> String {
        r#"
system-info:
  compiler-version: !Ghc 9.4.7
  core-packages: {}
packages:
  yaml:
    version: 0.11.11.0
    constraints:
      flag-overrides:
        system-libyaml: false
"#
        .trim_start()
        .to_string()
    }

    /// A custom-snapshot document resolving a local bundle against a
    /// self-contained package list rather than a named resolver snapshot.
    #[must_use]
    pub fn custom_snapshot_yaml() -> String {
        r#"
compiler: ghc-9.4.7
packages:
  - name: aeson
    version: 2.1.2.1
flags: {}
"#
        .trim_start()
        .to_string()
    }

    /// A package identifier with a small, realistic version.
    #[must_use]
    pub fn package_identifier(name: &str, version: &str) -> PackageIdentifier {
        PackageIdentifier::new(
            PackageName::parse(name).expect("fixture package name is valid"),
            Version::parse(version).expect("fixture version is valid"),
        )
    }

    /// A `MiniPlan` with a small linear dependency chain: `app -> mid -> leaf`.
    #[must_use]
    pub fn linear_mini_plan() -> MiniPlan {
        let mut plan = MiniPlan::new("ghc-9.4.7".parse().expect("valid compiler"));
        plan.packages.insert(PackageName::new_unchecked("leaf"), package_info(&[]));
        plan.packages.insert(PackageName::new_unchecked("mid"), package_info(&["leaf"]));
        plan.packages.insert(PackageName::new_unchecked("app"), package_info(&["mid"]));
        plan
    }

    /// A `MiniPlan` with a diamond dependency shape: `a` and `b` both
    /// depend on `shared`.
    #[must_use]
    pub fn diamond_mini_plan() -> MiniPlan {
        let mut plan = MiniPlan::new("ghc-9.4.7".parse().expect("valid compiler"));
        plan.packages.insert(PackageName::new_unchecked("shared"), package_info(&[]));
        plan.packages.insert(PackageName::new_unchecked("a"), package_info(&["shared"]));
        plan.packages.insert(PackageName::new_unchecked("b"), package_info(&["shared"]));
        plan
    }

    /// An empty flag assignment, for call sites that need a concrete
    /// value rather than `None`.
    #[must_use]
    pub fn no_flags() -> FlagAssignment {
        FlagAssignment::new()
    }

    /// An empty core-package map, for snapshots with no compiler-wired
    /// packages under test.
    #[must_use]
    pub fn no_core_packages() -> AHashMap<PackageName, Version> {
        AHashMap::default()
    }
}

fn package_info(deps: &[&str]) -> MiniPackageInfo {
    MiniPackageInfo {
        version: Version::parse("1.0.0").expect("fixture version is valid"),
        flags: FlagAssignment::new(),
        package_deps: deps.iter().map(|d| PackageName::new_unchecked(*d)).collect(),
        tool_deps: Default::default(),
        exes: Default::default(),
        has_library: true,
    }
}
