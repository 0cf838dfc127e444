//! Tool map (§4.4): a reverse index from executable name to the packages
//! that provide it.

use crate::types::{MiniPlan, ToolMap};
use stackcraft_core::AHashSet;

/// Build the tool map for `plan`.
///
/// Deliberately does not add an identity entry mapping each package's own
/// name to itself: tool dependencies resolve strictly by declared
/// executable name (property 4), never by package name.
#[must_use]
pub fn get_tool_map(plan: &MiniPlan) -> ToolMap {
    let mut map: ToolMap = ToolMap::default();
    for (name, info) in &plan.packages {
        for exe in &info.exes {
            map.entry(exe.clone())
                .or_insert_with(AHashSet::default)
                .insert(name.clone());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MiniPackageInfo;
    use stackcraft_core::{FlagAssignment, PackageName, Version};

    fn plan_with(name: &str, exes: &[&str]) -> MiniPlan {
        let mut plan = MiniPlan::new("ghc-9.4.7".parse().unwrap());
        plan.packages.insert(
            PackageName::new_unchecked(name),
            MiniPackageInfo {
                version: Version::parse("1.0").unwrap(),
                flags: FlagAssignment::new(),
                package_deps: AHashSet::default(),
                tool_deps: AHashSet::default(),
                exes: exes.iter().map(|e| (*e).into()).collect(),
                has_library: true,
            },
        );
        plan
    }

    #[test]
    fn maps_executable_to_providing_package() {
        let plan = plan_with("alex", &["alex"]);
        let map = get_tool_map(&plan);
        assert_eq!(
            map.get(&"alex".into()).unwrap(),
            &AHashSet::from_iter([PackageName::new_unchecked("alex")])
        );
    }

    #[test]
    fn does_not_self_register_by_package_name() {
        let plan = plan_with("foo", &[]);
        let map = get_tool_map(&plan);
        assert!(map.get(&"foo".into()).is_none());
    }
}
