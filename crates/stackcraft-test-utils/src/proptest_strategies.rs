//! Proptest strategies for build-plan resolution types.
//!
//! Strategies compose the way the domain types do: a `version_strategy`
//! feeds `version_range_strategy`, package/flag name strategies feed the
//! `flag_assignment_strategy`, and so on up to whole `MiniPlan`s.

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use stackcraft_core::{CompilerVersion, FlagAssignment, FlagName, PackageName, SnapName, Version, VersionRange};

/// A single path segment used to build package names: ASCII lowercase
/// letters and digits only, 2-8 characters, so joining segments with
/// `-` always yields a name `PackageName::parse` accepts.
fn name_segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{1,7}"
}

/// A valid package name: 1-3 segments joined by `-`.
pub fn package_name_strategy() -> impl Strategy<Value = PackageName> {
    vec(name_segment_strategy(), 1..=3).prop_map(|segments| {
        let joined = segments.join("-");
        PackageName::parse(&joined).unwrap_or_else(|| PackageName::new_unchecked(joined))
    })
}

/// A valid flag name, drawn from the same segment alphabet.
pub fn flag_name_strategy() -> impl Strategy<Value = FlagName> {
    vec(name_segment_strategy(), 1..=2).prop_map(|segments| FlagName::new(segments.join("-")))
}

/// A dotted version with 1-4 small components.
pub fn version_strategy() -> impl Strategy<Value = Version> {
    vec(0u64..30, 1..=4).prop_map(Version::new)
}

/// A version range over the comparison constructors plus `Any`,
/// recursively composed via `Intersect`/`Union` up to a small depth.
pub fn version_range_strategy() -> impl Strategy<Value = VersionRange> {
    let leaf = prop_oneof![
        Just(VersionRange::Any),
        version_strategy().prop_map(VersionRange::ThisVersion),
        version_strategy().prop_map(VersionRange::LaterVersion),
        version_strategy().prop_map(VersionRange::LaterOrEqual),
        version_strategy().prop_map(VersionRange::EarlierVersion),
        version_strategy().prop_map(VersionRange::EarlierOrEqual),
    ];
    leaf.prop_recursive(3, 8, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| VersionRange::Intersect(Box::new(a), Box::new(b))),
            (inner.clone(), inner).prop_map(|(a, b)| VersionRange::Union(Box::new(a), Box::new(b))),
        ]
    })
}

/// A flag assignment over 0-4 distinct flags.
pub fn flag_assignment_strategy() -> impl Strategy<Value = FlagAssignment> {
    btree_map(flag_name_strategy().prop_map(|f| f.as_str().to_string()), any::<bool>(), 0..=4)
        .prop_map(|map| map.into_iter().map(|(k, v)| (FlagName::new(k), v)).collect())
}

/// A GHC compiler version, restricted to the small range curated
/// snapshots actually use.
pub fn compiler_version_strategy() -> impl Strategy<Value = CompilerVersion> {
    (8u64..10, 0u64..8, 0u64..12).prop_map(|(major, minor, patch)| {
        format!("ghc-{major}.{minor}.{patch}").parse().expect("generated compiler version is valid")
    })
}

/// A curated LTS snapshot name.
pub fn lts_snap_name_strategy() -> impl Strategy<Value = SnapName> {
    (1u32..25, 0u32..30).prop_map(|(major, minor)| SnapName::Lts { major, minor })
}

/// A nightly snapshot name, dated within a fixed recent window so the
/// generated date is always valid.
pub fn nightly_snap_name_strategy() -> impl Strategy<Value = SnapName> {
    (2020i32..2026, 1u32..13, 1u32..28).prop_map(|(y, m, d)| {
        SnapName::Nightly(chrono::NaiveDate::from_ymd_opt(y, m, d).expect("generated date is valid"))
    })
}

/// Either snapshot-name shape.
pub fn snap_name_strategy() -> impl Strategy<Value = SnapName> {
    prop_oneof![lts_snap_name_strategy(), nightly_snap_name_strategy()]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn package_names_always_parse(name in package_name_strategy()) {
            prop_assert!(PackageName::parse(name.as_str()).is_some());
        }

        #[test]
        fn version_range_within_range_never_panics(
            range in version_range_strategy(),
            v in version_strategy(),
        ) {
            let _ = range.within_range(&v);
        }

        #[test]
        fn snap_name_display_roundtrips(name in snap_name_strategy()) {
            let rendered = name.to_string();
            let parsed: SnapName = rendered.parse().expect("rendered snapshot name re-parses");
            prop_assert_eq!(parsed, name);
        }
    }
}
