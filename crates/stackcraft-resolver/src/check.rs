//! Per-package check (§4.7): tests one flag assignment's resolved
//! dependency ranges against a version pool.

use crate::oracle::PackageDescriptionOracle;
use crate::types::{DepError, DepErrors};
use stackcraft_core::{
    AHashMap, CompilerVersion, FlagAssignment, PackageConfig, PackageIdentifier, PackageName,
    Result, Version,
};

/// Check `identifier` under `flags` against `pool` (§4.7).
///
/// Uses `PackageConfig::for_check`: tests and benchmarks count toward
/// flag-selection dep errors, unlike materialization.
pub fn check_package_build_plan(
    identifier: &PackageIdentifier,
    compiler: &CompilerVersion,
    pool: &AHashMap<PackageName, Version>,
    flags: &FlagAssignment,
    oracle: &dyn PackageDescriptionOracle,
) -> Result<DepErrors> {
    let config = PackageConfig::for_check(flags.clone(), compiler.clone());
    let resolved = oracle.resolve(identifier, &config)?;

    let mut errors = DepErrors::default();
    for (name, range) in resolved.dependency_ranges {
        if name == identifier.name {
            continue;
        }
        let needed_by = AHashMap::from_iter([(identifier.name.clone(), range.clone())]);
        match pool.get(&name) {
            None => {
                errors.insert(
                    name,
                    DepError {
                        observed: None,
                        needed_by,
                    },
                );
            }
            Some(version) if !range.within_range(version) => {
                errors.insert(
                    name,
                    DepError {
                        observed: Some(version.clone()),
                        needed_by,
                    },
                );
            }
            Some(_) => {}
        }
    }
    Ok(errors)
}
