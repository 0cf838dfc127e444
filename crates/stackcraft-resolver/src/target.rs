//! Target resolver (§4.5): transitive closure over a target set, with
//! shadow and unknown-package accounting.

use crate::types::{MiniPlan, ToolMap};
use stackcraft_core::{
    AHashMap, AHashSet, Error, FlagAssignment, PackageIdentifier, PackageName, Result,
    ShadowedPackage, UnknownPackage, Version,
};
use std::path::Path;

/// Mutable state threaded through the depth-first closure (§3).
#[derive(Debug, Default)]
pub struct ResolveState {
    /// Per-package shadowed closure, doubling as the visited set: a
    /// placeholder (empty set) is inserted before recursing into a name
    /// to break cycles, then overwritten with the true closure on return.
    visited: AHashMap<PackageName, AHashSet<PackageName>>,
    unknown: AHashMap<PackageName, AHashSet<PackageName>>,
    shadowed: AHashMap<PackageName, AHashSet<PackageIdentifier>>,
    to_install: AHashMap<PackageName, (Version, FlagAssignment)>,
    used_by: AHashMap<PackageName, AHashSet<PackageName>>,
}

/// `packageDeps ∪ expand(toolDeps)`, self excluded (the `getDeps` helper).
#[must_use]
pub fn get_deps(
    name: &PackageName,
    info: &crate::types::MiniPackageInfo,
    tool_map: &ToolMap,
) -> AHashSet<PackageName> {
    let mut deps = info.package_deps.clone();
    for tool in &info.tool_deps {
        if let Some(providers) = tool_map.get(tool) {
            deps.extend(providers.iter().cloned());
        }
    }
    deps.remove(name);
    deps
}

impl ResolveState {
    fn visit(
        &mut self,
        plan: &MiniPlan,
        tool_map: &ToolMap,
        is_shadowed: &dyn Fn(&PackageName) -> bool,
        name: &PackageName,
        requirers: &AHashSet<PackageName>,
    ) -> AHashSet<PackageName> {
        self.used_by
            .entry(name.clone())
            .or_default()
            .extend(requirers.iter().cloned());

        let Some(info) = plan.packages.get(name) else {
            self.unknown
                .entry(name.clone())
                .or_default()
                .extend(requirers.iter().cloned());
            return AHashSet::default();
        };

        if let Some(closure) = self.visited.get(name) {
            return closure.clone();
        }
        // Placeholder breaks cycles: a recursive lookup of `name` before
        // this call returns sees an empty closure rather than recursing
        // forever.
        self.visited.insert(name.clone(), AHashSet::default());

        let deps = get_deps(name, info, tool_map);
        let mut shadowed_closure: AHashSet<PackageName> = AHashSet::default();
        let self_ident = PackageIdentifier::new(name.clone(), info.version.clone());

        for dep in deps {
            if is_shadowed(&dep) {
                self.shadowed
                    .entry(dep.clone())
                    .or_default()
                    .insert(self_ident.clone());
                shadowed_closure.insert(dep);
                continue;
            }
            let mut dep_requirers = AHashSet::default();
            dep_requirers.insert(name.clone());
            let child_closure = self.visit(plan, tool_map, is_shadowed, &dep, &dep_requirers);
            for shadowed_name in child_closure {
                self.shadowed
                    .entry(shadowed_name.clone())
                    .or_default()
                    .insert(self_ident.clone());
                shadowed_closure.insert(shadowed_name);
            }
        }

        self.to_install
            .insert(name.clone(), (info.version.clone(), info.flags.clone()));
        self.visited.insert(name.clone(), shadowed_closure.clone());
        shadowed_closure
    }
}

/// Resolve `targets` (target → its requirers) against `plan` (§4.5).
///
/// `best_known_version` is consulted for unknown packages' diagnostic
/// (§7): the source takes the max across all configured package-index
/// caches; which index to prefer when several disagree is left
/// unspecified (§9), so any deterministic combinator is conformant.
pub fn resolve_build_plan(
    plan: &MiniPlan,
    tool_map: &ToolMap,
    is_shadowed: &dyn Fn(&PackageName) -> bool,
    targets: &AHashMap<PackageName, AHashSet<PackageName>>,
    best_known_version: &dyn Fn(&PackageName) -> Option<Version>,
    stack_yaml_path: Option<&Path>,
) -> Result<(
    AHashMap<PackageName, (Version, FlagAssignment)>,
    AHashMap<PackageName, AHashSet<PackageName>>,
)> {
    let mut state = ResolveState::default();
    for (target, requirers) in targets {
        state.visit(plan, tool_map, is_shadowed, target, requirers);
    }

    if state.unknown.is_empty() && state.shadowed.is_empty() {
        return Ok((state.to_install, state.used_by));
    }

    let unknown = state
        .unknown
        .into_iter()
        .map(|(name, requirers)| UnknownPackage {
            best_known_version: best_known_version(&name),
            requirers: requirers.into_iter().collect(),
            name,
        })
        .collect();
    let shadowed = state
        .shadowed
        .into_iter()
        .map(|(name, requirers)| ShadowedPackage {
            requirers: requirers.into_iter().map(|ident| ident.name).collect(),
            name,
        })
        .collect();
    Err(Error::unknown_packages(
        stack_yaml_path.map(Path::to_path_buf),
        unknown,
        shadowed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MiniPackageInfo;
    use stackcraft_core::Version;

    fn info(version: &str, deps: &[&str]) -> MiniPackageInfo {
        MiniPackageInfo {
            version: Version::parse(version).unwrap(),
            flags: FlagAssignment::new(),
            package_deps: deps.iter().map(|d| PackageName::new_unchecked(*d)).collect(),
            tool_deps: AHashSet::default(),
            exes: AHashSet::default(),
            has_library: true,
        }
    }

    fn targets(names: &[&str]) -> AHashMap<PackageName, AHashSet<PackageName>> {
        names
            .iter()
            .map(|n| (PackageName::new_unchecked(*n), AHashSet::default()))
            .collect()
    }

    #[test]
    fn s1_simple_closure() {
        let mut plan = MiniPlan::new("ghc-9.4.7".parse().unwrap());
        plan.packages
            .insert(PackageName::new_unchecked("A"), info("1.0", &["B"]));
        plan.packages
            .insert(PackageName::new_unchecked("B"), info("2.0", &[]));

        let (to_install, used_by) = resolve_build_plan(
            &plan,
            &ToolMap::default(),
            &|_| false,
            &targets(&["A"]),
            &|_| None,
            None,
        )
        .unwrap();

        assert_eq!(to_install.len(), 2);
        assert!(used_by[&PackageName::new_unchecked("A")].is_empty());
        assert_eq!(
            used_by[&PackageName::new_unchecked("B")],
            AHashSet::from_iter([PackageName::new_unchecked("A")])
        );
    }

    #[test]
    fn s2_shadow_propagates_to_requirer() {
        let mut plan = MiniPlan::new("ghc-9.4.7".parse().unwrap());
        plan.packages
            .insert(PackageName::new_unchecked("A"), info("1.0", &["B"]));
        plan.packages
            .insert(PackageName::new_unchecked("B"), info("2.0", &[]));

        let err = resolve_build_plan(
            &plan,
            &ToolMap::default(),
            &|n| n.as_str() == "B",
            &targets(&["A"]),
            &|_| None,
            None,
        )
        .unwrap_err();

        match err {
            Error::UnknownPackages { shadowed, .. } => {
                assert_eq!(shadowed.len(), 1);
                assert_eq!(shadowed[0].name, PackageName::new_unchecked("B"));
                assert_eq!(shadowed[0].requirers, vec![PackageName::new_unchecked("A")]);
            }
            other => panic!("expected UnknownPackages, got {other:?}"),
        }
    }

    #[test]
    fn s3_unknown_target_reports_requirer() {
        let mut plan = MiniPlan::new("ghc-9.4.7".parse().unwrap());
        plan.packages
            .insert(PackageName::new_unchecked("A"), info("1.0", &[]));

        let mut targets = AHashMap::default();
        targets.insert(
            PackageName::new_unchecked("Z"),
            AHashSet::from_iter([PackageName::new_unchecked("local")]),
        );

        let err = resolve_build_plan(
            &plan,
            &ToolMap::default(),
            &|_| false,
            &targets,
            &|_| None,
            None,
        )
        .unwrap_err();

        match err {
            Error::UnknownPackages { unknown, .. } => {
                assert_eq!(unknown.len(), 1);
                assert_eq!(unknown[0].name, PackageName::new_unchecked("Z"));
                assert_eq!(unknown[0].best_known_version, None);
            }
            other => panic!("expected UnknownPackages, got {other:?}"),
        }
    }

    #[test]
    fn cycle_does_not_infinite_loop() {
        let mut plan = MiniPlan::new("ghc-9.4.7".parse().unwrap());
        plan.packages
            .insert(PackageName::new_unchecked("A"), info("1.0", &["B"]));
        plan.packages
            .insert(PackageName::new_unchecked("B"), info("1.0", &["A"]));

        let (to_install, _) = resolve_build_plan(
            &plan,
            &ToolMap::default(),
            &|_| false,
            &targets(&["A"]),
            &|_| None,
            None,
        )
        .unwrap();
        assert_eq!(to_install.len(), 2);
    }
}
