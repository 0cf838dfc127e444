//! Custom assertion helpers for build-plan resolution testing.
//!
//! Domain-specific assertions over `BuildPlanCheck`, resolved install
//! plans, and flag assignments, plus a generic JSON-shape checker for
//! verifying CLI `--json` output.

use anyhow::{Result, bail};
use serde_json::Value;
use stackcraft_core::{AHashMap, FlagAssignment, FlagName, PackageName, Version};
use stackcraft_resolver::BuildPlanCheck;

/// Assert a `BuildPlanCheck` is `Ok` and return its flag assignment.
pub fn assert_build_plan_ok(check: &BuildPlanCheck) -> Result<&FlagAssignment> {
    match check {
        BuildPlanCheck::Ok(flags) => Ok(flags),
        BuildPlanCheck::Partial(_, errors) => {
            bail!("expected Ok, got Partial with {} dependency errors", errors.len())
        }
        BuildPlanCheck::Fail(compiler, errors) => {
            bail!("expected Ok, got Fail against {compiler} with {} dependency errors", errors.len())
        }
    }
}

/// Assert a `BuildPlanCheck` is `Partial` with exactly `expected_errors`
/// dependency errors.
pub fn assert_build_plan_partial(check: &BuildPlanCheck, expected_errors: usize) -> Result<()> {
    match check {
        BuildPlanCheck::Partial(_, errors) => {
            if errors.len() != expected_errors {
                bail!("expected {expected_errors} dependency errors, found {}", errors.len());
            }
            Ok(())
        }
        BuildPlanCheck::Ok(_) => bail!("expected Partial, got Ok"),
        BuildPlanCheck::Fail(..) => bail!("expected Partial, got Fail"),
    }
}

/// Assert a `BuildPlanCheck` is `Fail`.
pub fn assert_build_plan_fail(check: &BuildPlanCheck) -> Result<()> {
    match check {
        BuildPlanCheck::Fail(..) => Ok(()),
        BuildPlanCheck::Ok(_) => bail!("expected Fail, got Ok"),
        BuildPlanCheck::Partial(..) => bail!("expected Fail, got Partial"),
    }
}

/// Assert a resolved install-plan map contains `name` at exactly
/// `version`.
pub fn assert_resolved_at_version(
    resolved: &AHashMap<PackageName, (Version, FlagAssignment)>,
    name: &str,
    version: &str,
) -> Result<()> {
    let name = PackageName::parse(name).ok_or_else(|| anyhow::anyhow!("invalid package name: {name}"))?;
    let expected = Version::parse(version).ok_or_else(|| anyhow::anyhow!("invalid version: {version}"))?;
    match resolved.get(&name) {
        None => bail!("package {name} not present in resolved plan"),
        Some((actual, _)) if *actual != expected => {
            bail!("package {name} version mismatch: expected {expected}, found {actual}")
        }
        Some(_) => Ok(()),
    }
}

/// Assert a resolved install-plan map does not mention `name` at all.
pub fn assert_resolved_absent(
    resolved: &AHashMap<PackageName, (Version, FlagAssignment)>,
    name: &str,
) -> Result<()> {
    let name = PackageName::parse(name).ok_or_else(|| anyhow::anyhow!("invalid package name: {name}"))?;
    if resolved.contains_key(&name) {
        bail!("package {name} should not be in the resolved plan");
    }
    Ok(())
}

/// Assert a flag assignment sets `flag` to `expected`.
pub fn assert_flag(flags: &FlagAssignment, flag: &str, expected: bool) -> Result<()> {
    let flag_name = FlagName::new(flag);
    match flags.get(&flag_name) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => bail!("flag {flag} expected {expected}, found {actual}"),
        None => bail!("flag {flag} not present in assignment"),
    }
}

/// Check if a JSON value matches expected structure: every key in
/// `expected` must be present in `actual` with a compatible shape.
/// Used to check CLI `--json` output without pinning exact values.
pub fn check_json_shape(actual: &Value, expected: &Value) -> Result<()> {
    match (actual, expected) {
        (Value::Object(actual_obj), Value::Object(expected_obj)) => {
            for (key, expected_val) in expected_obj {
                let actual_val = actual_obj
                    .get(key)
                    .ok_or_else(|| anyhow::anyhow!("missing key: {key}"))?;
                check_json_shape(actual_val, expected_val)
                    .map_err(|e| anyhow::anyhow!("mismatch at key {key}: {e}"))?;
            }
        }
        (Value::Array(_), Value::Array(_)) => {}
        (Value::String(_), Value::String(_)) => {}
        (Value::Number(_), Value::Number(_)) => {}
        (Value::Bool(_), Value::Bool(_)) => {}
        (Value::Null, Value::Null) => {}
        _ => bail!("type mismatch: expected {expected:?}, got {actual:?}"),
    }

    Ok(())
}

/// Macro for asserting JSON structure matches expected shape.
#[macro_export]
macro_rules! assert_json_shape {
    ($value:expr, $expected:tt) => {{
        let expected: serde_json::Value = serde_json::json!($expected);
        $crate::assertions::check_json_shape(&$value, &expected)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackcraft_resolver::DepError;

    #[test]
    fn ok_check_yields_flags() {
        let mut flags = FlagAssignment::new();
        flags.insert(FlagName::new("systemlib"), false);
        let check = BuildPlanCheck::Ok(flags);
        let flags = assert_build_plan_ok(&check).unwrap();
        assert_flag(flags, "systemlib", false).unwrap();
    }

    #[test]
    fn fail_check_rejects_ok_assertion() {
        let errors = AHashMap::default();
        let check = BuildPlanCheck::Fail("ghc-9.4.7".parse().unwrap(), errors);
        assert!(assert_build_plan_ok(&check).is_err());
        assert_build_plan_fail(&check).unwrap();
    }

    #[test]
    fn partial_check_counts_errors() {
        let mut needed_by = AHashMap::default();
        needed_by.insert(PackageName::new_unchecked("foo"), stackcraft_core::VersionRange::Any);
        let mut errors: stackcraft_resolver::DepErrors = AHashMap::default();
        errors.insert(PackageName::new_unchecked("bar"), DepError { observed: None, needed_by });
        let check = BuildPlanCheck::Partial(FlagAssignment::new(), errors);
        assert_build_plan_partial(&check, 1).unwrap();
        assert!(assert_build_plan_partial(&check, 2).is_err());
    }

    #[test]
    fn resolved_version_assertions() {
        let mut resolved = AHashMap::default();
        resolved.insert(
            PackageName::new_unchecked("aeson"),
            (Version::parse("2.1.2.1").unwrap(), FlagAssignment::new()),
        );
        assert_resolved_at_version(&resolved, "aeson", "2.1.2.1").unwrap();
        assert!(assert_resolved_at_version(&resolved, "aeson", "1.0.0").is_err());
        assert_resolved_absent(&resolved, "text").unwrap();
    }

    #[test]
    fn check_json_shape_ignores_unlisted_keys() {
        let actual = serde_json::json!({"name": "aeson", "version": "2.1.2.1"});
        let expected = serde_json::json!({"name": ""});
        assert!(check_json_shape(&actual, &expected).is_ok());
    }
}
