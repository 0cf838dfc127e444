//! The materializer (§4.3): turns a raw snapshot (core packages plus
//! user-land packages at pinned versions) into a `MiniPlan`, fetching each
//! package's resolved dependency/executable surface through the package
//! index and package-description oracle, then caching the result.

use crate::oracle::PackageDescriptionOracle;
use crate::types::{MiniPackageInfo, MiniPlan};
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use stackcraft_core::{
    AHashMap, AHashSet, CompilerVersion, Error, FlagAssignment, FlagName, PackageConfig,
    PackageIdentifier, PackageName, Result, Version,
};
use stackcraft_repository::CustomSnapshot;
use std::str::FromStr;

/// Outcome of asking the package index which identifiers it has entries
/// for (§6's `resolvePackagesAllowMissing`).
#[derive(Debug, Default)]
pub struct IndexResolution {
    /// Names absent from the index under any version.
    pub missing_names: AHashSet<PackageName>,
    /// Identifiers (name known, this exact version absent) the index
    /// cannot supply a declaration blob for.
    pub missing_idents: AHashSet<PackageIdentifier>,
}

/// The package index (§6): confirms which identifiers have a fetchable
/// declaration blob, prior to handing them to the oracle.
pub trait PackageIndex: Send + Sync {
    fn resolve(&self, idents: &[PackageIdentifier]) -> Result<IndexResolution>;
}

/// The closed set of build-plan fixes (§6): deterministic flag-override
/// post-processing for known-problematic packages.
fn apply_build_plan_fixes(plan: &mut MiniPlan) {
    if let Some(info) = plan
        .packages
        .get_mut(&PackageName::new_unchecked("persistent-sqlite"))
    {
        info.flags.insert(FlagName::new("systemlib"), false);
    }
    if let Some(info) = plan.packages.get_mut(&PackageName::new_unchecked("yaml")) {
        info.flags.insert(FlagName::new("system-libyaml"), false);
    }
}

/// Materialize a raw snapshot into a `MiniPlan` (§4.3).
///
/// `core_packages` is the compiler's own package set; `user_packages` is
/// the snapshot's pinned user-land packages with any per-package flag
/// overrides. Core identifiers the index doesn't have a declaration for
/// are synthesized with empty deps and `has_library = true`; it is a
/// programmer error for a core *name* to be entirely unknown to the
/// index. Any user-land identifier missing from the index is fatal.
pub fn to_mini_build_plan(
    compiler: CompilerVersion,
    core_packages: &AHashMap<PackageName, Version>,
    user_packages: &AHashMap<PackageName, (Version, FlagAssignment)>,
    index: &dyn PackageIndex,
    oracle: &dyn PackageDescriptionOracle,
) -> Result<MiniPlan> {
    let core_idents: Vec<PackageIdentifier> = core_packages
        .iter()
        .map(|(name, version)| PackageIdentifier::new(name.clone(), version.clone()))
        .collect();
    let core_resolution = index.resolve(&core_idents)?;
    if !core_resolution.missing_names.is_empty() {
        return Err(Error::internal(format!(
            "core package names absent from index at materialization: {:?}",
            core_resolution
                .missing_names
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        )));
    }

    let user_idents: Vec<PackageIdentifier> = user_packages
        .iter()
        .map(|(name, (version, _))| PackageIdentifier::new(name.clone(), version.clone()))
        .collect();
    let user_resolution = index.resolve(&user_idents)?;
    if !user_resolution.missing_names.is_empty() || !user_resolution.missing_idents.is_empty() {
        return Err(Error::internal(format!(
            "user-land packages missing from index: names={:?} idents={:?}",
            user_resolution
                .missing_names
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            user_resolution
                .missing_idents
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        )));
    }

    let mut plan = MiniPlan::new(compiler.clone());

    for (name, version) in core_packages {
        let ident = PackageIdentifier::new(name.clone(), version.clone());
        if core_resolution.missing_idents.contains(&ident) {
            plan.packages.insert(
                name.clone(),
                MiniPackageInfo {
                    version: version.clone(),
                    flags: FlagAssignment::new(),
                    package_deps: AHashSet::default(),
                    tool_deps: AHashSet::default(),
                    exes: AHashSet::default(),
                    has_library: true,
                },
            );
            continue;
        }
        let config = PackageConfig::for_materialization(FlagAssignment::new(), compiler.clone());
        let resolved = oracle.resolve(&ident, &config)?;
        let mut package_deps = resolved.package_deps();
        package_deps.remove(name);
        plan.packages.insert(
            name.clone(),
            MiniPackageInfo {
                version: version.clone(),
                flags: FlagAssignment::new(),
                package_deps,
                tool_deps: resolved.tool_deps,
                exes: resolved.exes,
                has_library: resolved.has_library,
            },
        );
    }

    for (name, (version, flag_overrides)) in user_packages {
        let ident = PackageIdentifier::new(name.clone(), version.clone());
        let config = PackageConfig::for_materialization(flag_overrides.clone(), compiler.clone());
        let resolved = oracle.resolve(&ident, &config)?;
        let mut package_deps = resolved.package_deps();
        package_deps.remove(name);
        plan.packages.insert(
            name.clone(),
            MiniPackageInfo {
                version: version.clone(),
                flags: flag_overrides.clone(),
                package_deps,
                tool_deps: resolved.tool_deps,
                exes: resolved.exes,
                has_library: resolved.has_library,
            },
        );
    }

    let missing_core_names: AHashSet<PackageName> = core_resolution
        .missing_idents
        .iter()
        .map(|ident| ident.name.clone())
        .collect();
    for name in core_packages.keys() {
        if let Some(info) = plan.packages.get_mut(name) {
            info.package_deps
                .retain(|dep| !missing_core_names.contains(dep));
        }
    }

    apply_build_plan_fixes(&mut plan);

    Ok(plan)
}

/// Materialize a custom snapshot document (§4.3, §6) into a `MiniPlan`.
///
/// A custom snapshot has no core package set of its own: every package it
/// lists is user-land, pinned at the identifier's version, with whatever
/// flag overrides the document declares. The compiler string is parsed
/// with the same `CompilerVersion` parser the rest of the pipeline uses;
/// a malformed string is `InvalidCompiler`, not an internal error, since
/// this text is author-supplied.
pub fn materialize_custom_snapshot(
    snapshot: &CustomSnapshot,
    index: &dyn PackageIndex,
    oracle: &dyn PackageDescriptionOracle,
) -> Result<MiniPlan> {
    let compiler = CompilerVersion::from_str(&snapshot.compiler)
        .map_err(|_| Error::invalid_compiler(snapshot.compiler.clone()))?;

    let user_packages: AHashMap<PackageName, (Version, FlagAssignment)> = snapshot
        .packages
        .iter()
        .map(|ident| {
            let flags = snapshot.flags.get(&ident.name).cloned().unwrap_or_default();
            (ident.name.clone(), (ident.version.clone(), flags))
        })
        .collect();

    to_mini_build_plan(compiler, &AHashMap::default(), &user_packages, index, oracle)
}

/// Materialize (or load from cache) a `MiniPlan` for one (snapshot,
/// compiler) pair, reapplying build-plan fixes on every path so cached
/// entries written before a fixes-table change still reflect it.
pub fn materialize_cached(
    cache_path: &std::path::Path,
    compiler: CompilerVersion,
    core_packages: &AHashMap<PackageName, Version>,
    user_packages: &AHashMap<PackageName, (Version, FlagAssignment)>,
    index: &dyn PackageIndex,
    oracle: &dyn PackageDescriptionOracle,
) -> Result<MiniPlan> {
    let cached: CachedMiniPlan = stackcraft_cache::tagged_decode_or_load(cache_path, || {
        let plan = to_mini_build_plan(compiler.clone(), core_packages, user_packages, index, oracle)?;
        Ok(CachedMiniPlan::from(&plan))
    })?;
    let mut plan = MiniPlan::try_from(cached)?;
    apply_build_plan_fixes(&mut plan);
    Ok(plan)
}

/// Flat, primitive-typed mirror of `MiniPlan` for the `rkyv` cache
/// boundary. `MiniPlan` itself stays free of serialization concerns
/// beyond the `serde` codecs `stackcraft-core` already carries for the
/// snapshot wire formats.
#[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug, Clone)]
#[rkyv(derive(Debug))]
struct CachedPackageInfo {
    version: String,
    flags: Vec<(String, bool)>,
    package_deps: Vec<String>,
    tool_deps: Vec<String>,
    exes: Vec<String>,
    has_library: bool,
}

#[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug, Clone)]
#[rkyv(derive(Debug))]
struct CachedMiniPlan {
    compiler_version: String,
    packages: Vec<(String, CachedPackageInfo)>,
}

impl From<&MiniPlan> for CachedMiniPlan {
    fn from(plan: &MiniPlan) -> Self {
        Self {
            compiler_version: plan.compiler_version.to_string(),
            packages: plan
                .packages
                .iter()
                .map(|(name, info)| {
                    (
                        name.to_string(),
                        CachedPackageInfo {
                            version: info.version.to_string(),
                            flags: info
                                .flags
                                .iter()
                                .map(|(k, v)| (k.to_string(), *v))
                                .collect(),
                            package_deps: info.package_deps.iter().map(ToString::to_string).collect(),
                            tool_deps: info.tool_deps.iter().map(ToString::to_string).collect(),
                            exes: info.exes.iter().map(ToString::to_string).collect(),
                            has_library: info.has_library,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl TryFrom<CachedMiniPlan> for MiniPlan {
    type Error = Error;

    fn try_from(cached: CachedMiniPlan) -> Result<Self> {
        let compiler_version = CompilerVersion::from_str(&cached.compiler_version)
            .map_err(|e| Error::cache(format!("cached compiler version invalid: {e}")))?;
        let mut plan = MiniPlan::new(compiler_version);
        for (name, info) in cached.packages {
            let version = Version::parse(&info.version)
                .ok_or_else(|| Error::cache(format!("cached version invalid: {}", info.version)))?;
            let flags: FlagAssignment = info
                .flags
                .into_iter()
                .map(|(k, v)| (FlagName::new(k), v))
                .collect();
            plan.packages.insert(
                PackageName::new_unchecked(name),
                MiniPackageInfo {
                    version,
                    flags,
                    package_deps: info
                        .package_deps
                        .into_iter()
                        .map(PackageName::new_unchecked)
                        .collect(),
                    tool_deps: info.tool_deps.into_iter().map(Into::into).collect(),
                    exes: info.exes.into_iter().map(Into::into).collect(),
                    has_library: info.has_library,
                },
            );
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ResolvedDescription;

    struct EmptyIndex;
    impl PackageIndex for EmptyIndex {
        fn resolve(&self, _idents: &[PackageIdentifier]) -> Result<IndexResolution> {
            Ok(IndexResolution::default())
        }
    }

    struct StaticOracle;
    impl PackageDescriptionOracle for StaticOracle {
        fn resolve(
            &self,
            ident: &PackageIdentifier,
            _config: &PackageConfig,
        ) -> Result<ResolvedDescription> {
            let mut dependency_ranges = AHashMap::default();
            if ident.name.as_str() == "foo" {
                // self-edge, must be discarded
                dependency_ranges.insert(PackageName::new_unchecked("foo"), stackcraft_core::VersionRange::Any);
                dependency_ranges.insert(PackageName::new_unchecked("bar"), stackcraft_core::VersionRange::Any);
            }
            Ok(ResolvedDescription {
                dependency_ranges,
                tool_deps: AHashSet::default(),
                exes: AHashSet::default(),
                has_library: true,
            })
        }
    }

    #[test]
    fn discards_self_edges_and_applies_fixes() {
        let compiler: CompilerVersion = "ghc-9.4.7".parse().unwrap();
        let mut user = AHashMap::default();
        user.insert(
            PackageName::new_unchecked("foo"),
            (Version::parse("1.0").unwrap(), FlagAssignment::new()),
        );
        user.insert(
            PackageName::new_unchecked("bar"),
            (Version::parse("2.0").unwrap(), FlagAssignment::new()),
        );
        user.insert(
            PackageName::new_unchecked("persistent-sqlite"),
            (Version::parse("2.13").unwrap(), FlagAssignment::new()),
        );
        let plan = to_mini_build_plan(
            compiler,
            &AHashMap::default(),
            &user,
            &EmptyIndex,
            &StaticOracle,
        )
        .unwrap();

        let foo = &plan.packages[&PackageName::new_unchecked("foo")];
        assert!(!foo.package_deps.contains(&PackageName::new_unchecked("foo")));
        assert!(foo.package_deps.contains(&PackageName::new_unchecked("bar")));

        let sqlite = &plan.packages[&PackageName::new_unchecked("persistent-sqlite")];
        assert_eq!(sqlite.flags.get(&FlagName::new("systemlib")), Some(false));
    }

    #[test]
    fn s6_custom_snapshot_materializes_with_empty_cores() {
        let snapshot = CustomSnapshot {
            compiler: "ghc-8.0.1".to_string(),
            packages: vec![PackageIdentifier::new(
                PackageName::new_unchecked("foo"),
                Version::parse("1.0").unwrap(),
            )],
            flags: {
                let mut flags = AHashMap::default();
                let mut foo_flags = FlagAssignment::new();
                foo_flags.insert(FlagName::new("opt"), true);
                flags.insert(PackageName::new_unchecked("foo"), foo_flags);
                flags
            },
        };

        let plan = materialize_custom_snapshot(&snapshot, &EmptyIndex, &StaticOracle).unwrap();

        assert_eq!(plan.compiler_version.to_string(), "ghc-8.0.1");
        let foo = &plan.packages[&PackageName::new_unchecked("foo")];
        assert_eq!(foo.version, Version::parse("1.0").unwrap());
        assert_eq!(foo.flags.get(&FlagName::new("opt")), Some(true));
    }

    #[test]
    fn custom_snapshot_rejects_invalid_compiler() {
        let snapshot = CustomSnapshot {
            compiler: "not-a-compiler".to_string(),
            packages: vec![],
            flags: AHashMap::default(),
        };
        let err = materialize_custom_snapshot(&snapshot, &EmptyIndex, &StaticOracle).unwrap_err();
        assert!(matches!(err, Error::InvalidCompiler { .. }));
    }

    #[test]
    fn synthesizes_missing_core_packages() {
        struct MissingCoreIndex;
        impl PackageIndex for MissingCoreIndex {
            fn resolve(&self, idents: &[PackageIdentifier]) -> Result<IndexResolution> {
                Ok(IndexResolution {
                    missing_names: AHashSet::default(),
                    missing_idents: idents.iter().cloned().collect(),
                })
            }
        }

        let compiler: CompilerVersion = "ghc-9.4.7".parse().unwrap();
        let mut core = AHashMap::default();
        core.insert(
            PackageName::new_unchecked("ghc-prim"),
            Version::parse("0.9.1").unwrap(),
        );
        let plan = to_mini_build_plan(
            compiler,
            &core,
            &AHashMap::default(),
            &MissingCoreIndex,
            &StaticOracle,
        )
        .unwrap();
        let info = &plan.packages[&PackageName::new_unchecked("ghc-prim")];
        assert!(info.has_library);
        assert!(info.package_deps.is_empty());
    }
}
