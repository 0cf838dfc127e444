//! Bundle checker (§4.8): aggregates flag selection across multiple
//! local packages against a shared snapshot pool.

use crate::check::check_package_build_plan;
use crate::flags::{FlagSpec, select_package_build_plan};
use crate::oracle::PackageDescriptionOracle;
use crate::types::{DepErrors, combine_dep_errors};
use stackcraft_core::{
    AHashMap, AHashSet, CompilerVersion, Error, FlagAssignment, PackageIdentifier, PackageName,
    Result, Version,
};

/// One locally-built package: its self-declared identifier and the flags
/// its description exposes.
#[derive(Debug, Clone)]
pub struct LocalPackageDescription {
    pub identifier: PackageIdentifier,
    pub flag_specs: Vec<FlagSpec>,
}

/// Check a set of local packages against `pool` (§4.8).
///
/// `external_flags`, when present, forces a package's flags via
/// `check_package_build_plan` rather than searching for them. Local
/// packages satisfy each other: the pool is extended with a synthetic
/// entry per local package at its self-declared version before any
/// package is checked.
pub fn check_bundle_build_plan(
    locals: &[LocalPackageDescription],
    pool: &AHashMap<PackageName, Version>,
    compiler: &CompilerVersion,
    external_flags: Option<&AHashMap<PackageName, FlagAssignment>>,
    oracle: &dyn PackageDescriptionOracle,
) -> Result<(FlagAssignment, DepErrors)> {
    let mut seen: AHashSet<PackageName> = AHashSet::default();
    for local in locals {
        if !seen.insert(local.identifier.name.clone()) {
            return Err(Error::internal(format!(
                "duplicate local package name: {}",
                local.identifier.name
            )));
        }
    }

    let mut extended_pool = pool.clone();
    for local in locals {
        extended_pool.insert(local.identifier.name.clone(), local.identifier.version.clone());
    }

    let mut combined_flags = FlagAssignment::new();
    let mut combined_errors = DepErrors::default();
    for local in locals {
        let (flags, errors) = match external_flags.and_then(|m| m.get(&local.identifier.name)) {
            Some(forced) => {
                let errs = check_package_build_plan(
                    &local.identifier,
                    compiler,
                    &extended_pool,
                    forced,
                    oracle,
                )?;
                (forced.clone(), errs)
            }
            None => select_package_build_plan(
                &local.identifier,
                compiler,
                &extended_pool,
                &local.flag_specs,
                oracle,
            )?,
        };
        combined_flags = combined_flags.union_disjoint(flags).ok_or_else(|| {
            Error::internal(format!(
                "flag name collision combining bundle flags for {}",
                local.identifier.name
            ))
        })?;
        combined_errors = combine_dep_errors(combined_errors, errors);
    }

    Ok((combined_flags, combined_errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ResolvedDescription;
    use stackcraft_core::PackageConfig;

    struct NoDepsOracle;
    impl PackageDescriptionOracle for NoDepsOracle {
        fn resolve(
            &self,
            _ident: &PackageIdentifier,
            _config: &PackageConfig,
        ) -> Result<ResolvedDescription> {
            Ok(ResolvedDescription::default())
        }
    }

    fn local(name: &str) -> LocalPackageDescription {
        LocalPackageDescription {
            identifier: PackageIdentifier::new(
                PackageName::new_unchecked(name),
                Version::parse("1.0").unwrap(),
            ),
            flag_specs: vec![],
        }
    }

    #[test]
    fn rejects_duplicate_local_names() {
        let locals = vec![local("foo"), local("foo")];
        let err = check_bundle_build_plan(
            &locals,
            &AHashMap::default(),
            &"ghc-9.4.7".parse().unwrap(),
            None,
            &NoDepsOracle,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Internal { .. }));
    }

    #[test]
    fn locals_with_no_deps_produce_no_errors() {
        let locals = vec![local("foo"), local("bar")];
        let (flags, errors) = check_bundle_build_plan(
            &locals,
            &AHashMap::default(),
            &"ghc-9.4.7".parse().unwrap(),
            None,
            &NoDepsOracle,
        )
        .unwrap();
        assert!(flags.is_empty());
        assert!(errors.is_empty());
    }
}
