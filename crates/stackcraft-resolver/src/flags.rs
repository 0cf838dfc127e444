//! Flag selector (§4.6): bounded search for the flag assignment that
//! yields the fewest dependency errors for one local package.

use crate::check::check_package_build_plan;
use crate::oracle::PackageDescriptionOracle;
use crate::types::DepErrors;
use stackcraft_core::{
    AHashMap, CompilerVersion, FlagAssignment, FlagName, PackageIdentifier, PackageName, Result,
    Version,
};

/// The maximum number of flag combinations the selector will evaluate for
/// a single package, regardless of how many flags it declares (property 6).
pub const MAX_FLAG_COMBINATIONS: usize = 128;

/// A package flag as declared by its description: whether the user must
/// set it explicitly (manual) and its declared default.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub name: FlagName,
    pub manual: bool,
    pub default: bool,
}

fn flag_options(spec: &FlagSpec) -> [bool; 2] {
    if spec.manual {
        [spec.default, spec.default]
    } else if spec.default {
        [true, false]
    } else {
        [false, true]
    }
}

/// Enumerate flag assignments by Cartesian product, capped at
/// `MAX_FLAG_COMBINATIONS`. Manual flags contribute a single option; the
/// first combination enumerated is always "all defaults".
#[must_use]
pub fn enumerate_flag_assignments(specs: &[FlagSpec]) -> Vec<FlagAssignment> {
    let mut combos = vec![FlagAssignment::new()];
    for spec in specs {
        let options = if spec.manual {
            &flag_options(spec)[..1]
        } else {
            &flag_options(spec)[..]
        };
        let mut next = Vec::with_capacity((combos.len() * options.len()).min(MAX_FLAG_COMBINATIONS));
        'build: for combo in &combos {
            for &value in options {
                let mut extended = combo.clone();
                extended.insert(spec.name.clone(), value);
                next.push(extended);
                if next.len() >= MAX_FLAG_COMBINATIONS {
                    break 'build;
                }
            }
        }
        combos = next;
    }
    combos
}

/// Select the best flag assignment for `identifier` against `pool`
/// (§4.6). Ties favor the earlier-enumerated combination; stops early on
/// a zero-error assignment.
pub fn select_package_build_plan(
    identifier: &PackageIdentifier,
    compiler: &CompilerVersion,
    pool: &AHashMap<PackageName, Version>,
    flag_specs: &[FlagSpec],
    oracle: &dyn PackageDescriptionOracle,
) -> Result<(FlagAssignment, DepErrors)> {
    let mut best: Option<(FlagAssignment, DepErrors)> = None;
    for combo in enumerate_flag_assignments(flag_specs) {
        let errors = check_package_build_plan(identifier, compiler, pool, &combo, oracle)?;
        if errors.is_empty() {
            return Ok((combo, errors));
        }
        let is_better = best
            .as_ref()
            .is_none_or(|(_, best_errors)| errors.len() < best_errors.len());
        if is_better {
            best = Some((combo, errors));
        }
    }
    Ok(best.unwrap_or_else(|| (FlagAssignment::new(), DepErrors::default())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ResolvedDescription;
    use stackcraft_core::PackageConfig;

    #[test]
    fn s4_two_flags_one_manual_yields_two_combinations() {
        let specs = vec![
            FlagSpec {
                name: FlagName::new("feature"),
                manual: false,
                default: true,
            },
            FlagSpec {
                name: FlagName::new("locked"),
                manual: true,
                default: false,
            },
        ];
        let combos = enumerate_flag_assignments(&specs);
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].get(&FlagName::new("feature")), Some(true));
        assert_eq!(combos[0].get(&FlagName::new("locked")), Some(false));
    }

    #[test]
    fn enumeration_is_capped_regardless_of_flag_count() {
        let specs: Vec<FlagSpec> = (0..20)
            .map(|i| FlagSpec {
                name: FlagName::new(format!("f{i}")),
                manual: false,
                default: true,
            })
            .collect();
        let combos = enumerate_flag_assignments(&specs);
        assert_eq!(combos.len(), MAX_FLAG_COMBINATIONS);
    }

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

    #[test]
    fn selector_is_idempotent() {
        let ident = PackageIdentifier::new(
            PackageName::new_unchecked("foo"),
            Version::parse("1.0").unwrap(),
        );
        let specs = vec![FlagSpec {
            name: FlagName::new("feature"),
            manual: false,
            default: true,
        }];
        let first = select_package_build_plan(
            &ident,
            &"ghc-9.4.7".parse().unwrap(),
            &AHashMap::default(),
            &specs,
            &NoDepsOracle,
        )
        .unwrap();
        let second = select_package_build_plan(
            &ident,
            &"ghc-9.4.7".parse().unwrap(),
            &AHashMap::default(),
            &specs,
            &NoDepsOracle,
        )
        .unwrap();
        assert_eq!(first.0, second.0);
    }
}
