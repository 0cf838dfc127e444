//! Synthetic `MiniPlan`s for benchmarking the resolver pipeline.

use stackcraft_core::{AHashSet, FlagAssignment, PackageName, Version};
use stackcraft_resolver::{MiniPackageInfo, MiniPlan};
use stackcraft_test_utils::generators::{generate_graph, GraphConfig};

fn leaf_info(version: &str) -> MiniPackageInfo {
    MiniPackageInfo {
        version: Version::parse(version).expect("fixture version is valid"),
        flags: FlagAssignment::new(),
        package_deps: AHashSet::default(),
        tool_deps: AHashSet::default(),
        exes: AHashSet::default(),
        has_library: true,
    }
}

/// A linear dependency chain `pkg0 <- pkg1 <- ... <- pkg{size-1}`.
#[must_use]
pub fn linear_plan(size: usize) -> MiniPlan {
    let mut plan = MiniPlan::new("ghc-9.4.7".parse().expect("valid compiler"));
    for i in 0..size {
        let name = PackageName::new_unchecked(format!("pkg{i}"));
        let mut info = leaf_info("1.0.0");
        if i > 0 {
            info.package_deps.insert(PackageName::new_unchecked(format!("pkg{}", i - 1)));
        }
        plan.packages.insert(name, info);
    }
    plan
}

/// A diamond shape: `a` and `b` both depend on `shared`, `top` depends
/// on both `a` and `b`.
#[must_use]
pub fn diamond_plan() -> MiniPlan {
    let mut plan = MiniPlan::new("ghc-9.4.7".parse().expect("valid compiler"));
    plan.packages.insert(PackageName::new_unchecked("shared"), leaf_info("1.0.0"));
    let mut a = leaf_info("1.0.0");
    a.package_deps.insert(PackageName::new_unchecked("shared"));
    plan.packages.insert(PackageName::new_unchecked("a"), a);
    let mut b = leaf_info("1.0.0");
    b.package_deps.insert(PackageName::new_unchecked("shared"));
    plan.packages.insert(PackageName::new_unchecked("b"), b);
    let mut top = leaf_info("1.0.0");
    top.package_deps.insert(PackageName::new_unchecked("a"));
    top.package_deps.insert(PackageName::new_unchecked("b"));
    plan.packages.insert(PackageName::new_unchecked("top"), top);
    plan
}

/// A random acyclic graph with `num_packages` packages and up to
/// `avg_deps` dependencies each.
#[must_use]
pub fn complex_plan(num_packages: usize, avg_deps: usize) -> MiniPlan {
    let mut rng = rand::thread_rng();
    let config = GraphConfig { package_count: num_packages, max_deps: avg_deps, exe_fraction: 0.0 };
    generate_graph(&mut rng, &config).plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_plan_has_requested_size() {
        let plan = linear_plan(10);
        assert_eq!(plan.packages.len(), 10);
    }

    #[test]
    fn diamond_plan_has_four_packages() {
        let plan = diamond_plan();
        assert_eq!(plan.packages.len(), 4);
    }
}
