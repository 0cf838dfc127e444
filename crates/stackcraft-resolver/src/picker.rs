//! Snapshot picker (§4.9): iterates candidate snapshots and picks the one
//! that best satisfies a bundle of local packages.

use crate::bundle::{LocalPackageDescription, check_bundle_build_plan};
use crate::oracle::PackageDescriptionOracle;
use crate::types::{BuildPlanCheck, DepErrors};
use stackcraft_core::{
    AHashMap, CompilerVersion, FlagAssignment, PackageName, Result, Version, is_wired_in_package,
};

/// Classify a bundle check against `compiler`'s wired-in packages (§4.9).
/// Any error touching a wired-in package is fatal for this snapshot
/// (`Fail`) regardless of how few other errors it has.
pub fn check_snap_build_plan(
    locals: &[LocalPackageDescription],
    pool: &AHashMap<PackageName, Version>,
    compiler: &CompilerVersion,
    external_flags: Option<&AHashMap<PackageName, FlagAssignment>>,
    oracle: &dyn PackageDescriptionOracle,
) -> Result<BuildPlanCheck> {
    let (flags, errors) = check_bundle_build_plan(locals, pool, compiler, external_flags, oracle)?;

    let compiler_errors: DepErrors = errors
        .iter()
        .filter(|(name, _)| is_wired_in_package(name.as_str()))
        .map(|(name, err)| (name.clone(), err.clone()))
        .collect();
    if !compiler_errors.is_empty() {
        return Ok(BuildPlanCheck::Fail(compiler.clone(), compiler_errors));
    }
    if !errors.is_empty() {
        return Ok(BuildPlanCheck::Partial(flags, errors));
    }
    Ok(BuildPlanCheck::Ok(flags))
}

/// One candidate snapshot: its identifying label, materialized pool, and
/// compiler version.
#[derive(Debug, Clone)]
pub struct SnapshotCandidate<Id> {
    pub id: Id,
    pub pool: AHashMap<PackageName, Version>,
    pub compiler: CompilerVersion,
}

/// Pick the best candidate snapshot for `locals` (§4.9).
///
/// Returns on the first `Ok` classification. Tracks the strictly-best
/// `Partial` seen (fewer errors wins; ties favor the first seen).
/// `Fail` candidates are skipped outright: a wired-in conflict can never
/// win regardless of error count.
pub fn find_build_plan<Id: Clone>(
    candidates: &[SnapshotCandidate<Id>],
    locals: &[LocalPackageDescription],
    external_flags: Option<&AHashMap<PackageName, FlagAssignment>>,
    oracle: &dyn PackageDescriptionOracle,
) -> Result<Option<(Id, FlagAssignment)>> {
    let mut best: Option<(Id, FlagAssignment, usize)> = None;
    for candidate in candidates {
        match check_snap_build_plan(
            locals,
            &candidate.pool,
            &candidate.compiler,
            external_flags,
            oracle,
        )? {
            BuildPlanCheck::Ok(flags) => return Ok(Some((candidate.id.clone(), flags))),
            BuildPlanCheck::Partial(flags, errs) => {
                let count = errs.len();
                let better = best
                    .as_ref()
                    .is_none_or(|(_, _, best_count)| count < *best_count);
                if better {
                    best = Some((candidate.id.clone(), flags, count));
                }
            }
            BuildPlanCheck::Fail(..) => continue,
        }
    }
    Ok(best.map(|(id, flags, _)| (id, flags)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ResolvedDescription;
    use stackcraft_core::{PackageConfig, PackageIdentifier, VersionRange};

    struct FixedErrorsOracle {
        missing: Vec<&'static str>,
    }
    impl PackageDescriptionOracle for FixedErrorsOracle {
        fn resolve(
            &self,
            _ident: &PackageIdentifier,
            _config: &PackageConfig,
        ) -> Result<ResolvedDescription> {
            Ok(ResolvedDescription {
                dependency_ranges: self
                    .missing
                    .iter()
                    .map(|n| (PackageName::new_unchecked(*n), VersionRange::Any))
                    .collect(),
                tool_deps: Default::default(),
                exes: Default::default(),
                has_library: true,
            })
        }
    }

    fn local() -> LocalPackageDescription {
        LocalPackageDescription {
            identifier: PackageIdentifier::new(
                PackageName::new_unchecked("app"),
                Version::parse("1.0").unwrap(),
            ),
            flag_specs: vec![],
        }
    }

    #[test]
    fn s5_best_partial_wins_over_worse_partial_and_fail() {
        let locals = vec![local()];
        let candidates = vec![
            SnapshotCandidate {
                id: "s1",
                pool: AHashMap::default(),
                compiler: "ghc-9.4.7".parse().unwrap(),
            },
            SnapshotCandidate {
                id: "s2",
                pool: AHashMap::default(),
                compiler: "ghc-9.4.7".parse().unwrap(),
            },
            SnapshotCandidate {
                id: "s3",
                pool: AHashMap::default(),
                compiler: "ghc-9.4.7".parse().unwrap(),
            },
        ];

        // s1 fails on a wired-in package, s2 has one missing dep, s3 has none.
        let oracle_by_id = |id: &str| -> Box<dyn PackageDescriptionOracle> {
            match id {
                "s1" => Box::new(FixedErrorsOracle { missing: vec!["base"] }),
                "s2" => Box::new(FixedErrorsOracle { missing: vec!["extra"] }),
                _ => Box::new(FixedErrorsOracle { missing: vec![] }),
            }
        };

        // find_build_plan takes one oracle; exercise check_snap_build_plan
        // directly per candidate to vary the oracle, then replicate the
        // picker's own selection logic to confirm the expected winner.
        let mut best: Option<(&str, usize)> = None;
        for candidate in &candidates {
            let oracle = oracle_by_id(candidate.id);
            let check = check_snap_build_plan(
                &locals,
                &candidate.pool,
                &candidate.compiler,
                None,
                oracle.as_ref(),
            )
            .unwrap();
            match check {
                BuildPlanCheck::Ok(_) => unreachable!(),
                BuildPlanCheck::Partial(_, errs) => {
                    let count = errs.len();
                    if best.is_none_or(|(_, best_count)| count < best_count) {
                        best = Some((candidate.id, count));
                    }
                }
                BuildPlanCheck::Fail(..) => {}
            }
        }
        assert_eq!(best, Some(("s3", 0)));
    }
}
