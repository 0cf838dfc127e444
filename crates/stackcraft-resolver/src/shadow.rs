//! Shadow projector (§4.10): removes shadowed packages and anything whose
//! transitive dependency closure reaches one.

use crate::types::{MiniPackageInfo, MiniPlan};
use stackcraft_core::{AHashMap, AHashSet, Error, PackageName, Result};

/// Project `plan` through `shadowed_names` (§4.10).
///
/// Returns the retained `MiniPlan` plus a sideband map of every package
/// removed, either because it was shadowed directly or because its
/// `packageDeps` closure reaches one.
///
/// A dependency missing from the post-removal map is treated as
/// legitimately absent on this platform unless it was itself shadowed
/// (§9: a heuristic kept for behavioral compatibility, not a correctness
/// guarantee for arbitrary snapshots).
pub fn shadow_mini_build_plan(
    plan: &MiniPlan,
    shadowed_names: &AHashSet<PackageName>,
) -> Result<(MiniPlan, AHashMap<PackageName, MiniPackageInfo>)> {
    let remaining: AHashMap<PackageName, MiniPackageInfo> = plan
        .packages
        .iter()
        .filter(|(name, _)| !shadowed_names.contains(*name))
        .map(|(name, info)| (name.clone(), info.clone()))
        .collect();

    let mut memo: AHashMap<PackageName, bool> = AHashMap::default();
    let mut on_path: AHashSet<PackageName> = AHashSet::default();

    let names: Vec<PackageName> = remaining.keys().cloned().collect();
    for name in &names {
        visit(name, &remaining, shadowed_names, &mut memo, &mut on_path)?;
    }

    let mut retained = MiniPlan::new(plan.compiler_version.clone());
    let mut removed = AHashMap::default();
    for (name, info) in remaining {
        if memo.get(&name).copied().unwrap_or(false) {
            retained.packages.insert(name, info);
        } else {
            removed.insert(name, info);
        }
    }
    Ok((retained, removed))
}

fn visit(
    name: &PackageName,
    remaining: &AHashMap<PackageName, MiniPackageInfo>,
    shadowed_names: &AHashSet<PackageName>,
    memo: &mut AHashMap<PackageName, bool>,
    on_path: &mut AHashSet<PackageName>,
) -> Result<bool> {
    if let Some(&result) = memo.get(name) {
        return Ok(result);
    }
    if !on_path.insert(name.clone()) {
        return Err(Error::internal(format!(
            "cycle detected projecting shadows through {name}: the input plan is malformed"
        )));
    }

    let result = match remaining.get(name) {
        None => !shadowed_names.contains(name),
        Some(info) => {
            let mut ok = true;
            for dep in &info.package_deps {
                if !visit(dep, remaining, shadowed_names, memo, on_path)? {
                    ok = false;
                }
            }
            ok
        }
    };

    on_path.remove(name);
    memo.insert(name.clone(), result);
    Ok(result)
}
