//! Core identifiers and version algebra for build-plan resolution.
//!
//! This module defines the data model shared by every other crate in the
//! workspace: dotted package versions, opaque package/flag names, compiler
//! versions, snapshot names and the version-range predicate used by the
//! flag selector and bundle checker.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A dotted package version (e.g. `4.17.2`, `0.6.0.1`).
///
/// Unlike semver, component count is unbounded and there is no
/// pre-release/build-metadata distinction. Trailing zero components
/// compare equal to their shorter form (`1.0` == `1.0.0`), matching the
/// convention curated snapshots use when pinning package versions.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version {
    components: Arc<[u64]>,
}

impl Version {
    /// Build a version directly from components.
    #[must_use]
    pub fn new(components: impl Into<Vec<u64>>) -> Self {
        Self {
            components: components.into().into(),
        }
    }

    /// Parse a dotted version string.
    ///
    /// Returns `None` if any component is empty or not a valid `u64`, or if
    /// the string has no components at all.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let components: Option<Vec<u64>> = s.split('.').map(|part| part.parse().ok()).collect();
        let components = components?;
        if components.is_empty() {
            return None;
        }
        Some(Self::new(components))
    }

    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Components with trailing zeros stripped, for equality/ordering.
    fn normalized(&self) -> &[u64] {
        let mut end = self.components.len();
        while end > 1 && self.components[end - 1] == 0 {
            end -= 1;
        }
        &self.components[..end]
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.normalized();
        let b = other.normalized();
        for i in 0..a.len().max(b.len()) {
            let av = a.get(i).copied().unwrap_or(0);
            let bv = b.get(i).copied().unwrap_or(0);
            match av.cmp(&bv) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid version: {s:?}"))
    }
}

/// An opaque, validated package name.
///
/// Package names are a single token (no vendor/namespace component):
/// non-empty, ASCII alphanumeric plus `-`, never starting or ending with
/// `-`, and never containing `--`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(Arc<str>);

impl PackageName {
    /// Parse and validate a package name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return None;
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return None;
        }
        Some(Self(Arc::from(s)))
    }

    /// Construct without validation, for names already known to be valid
    /// (e.g. synthesized core-package identifiers).
    #[must_use]
    pub fn new_unchecked(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A package name paired with a concrete version.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PackageIdentifier {
    pub name: PackageName,
    pub version: Version,
}

impl PackageIdentifier {
    #[must_use]
    pub fn new(name: PackageName, version: Version) -> Self {
        Self { name, version }
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// A package flag name, e.g. `system-libyaml`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagName(Arc<str>);

impl FlagName {
    #[must_use]
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FlagName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A flag-name to boolean assignment for one package.
///
/// Kept as a `BTreeMap`-backed newtype so iteration order (and therefore
/// serialized/rendered form) is deterministic, which matters when the
/// flag selector compares assignments for idempotence.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagAssignment(std::collections::BTreeMap<FlagName, bool>);

impl FlagAssignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: FlagName, value: bool) -> Option<bool> {
        self.0.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &FlagName) -> Option<bool> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FlagName, &bool)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Merge two assignments covering disjoint packages into one set of
    /// flags. Returns `None` if a flag name is present in both (the
    /// bundle checker treats that as a programmer error: flags are scoped
    /// per package and should never collide).
    #[must_use]
    pub fn union_disjoint(mut self, other: Self) -> Option<Self> {
        for (name, value) in other.0 {
            if self.0.insert(name, value).is_some() {
                return None;
            }
        }
        Some(self)
    }
}

impl FromIterator<(FlagName, bool)> for FlagAssignment {
    fn from_iter<T: IntoIterator<Item = (FlagName, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A predicate over versions, supporting intersection and union.
///
/// Mirrors Cabal's `VersionRange` algebra. The flag selector's
/// `DepError.neededBy` accumulates these by intersection as more
/// requirers are discovered for the same package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VersionRange {
    Any,
    ThisVersion(Version),
    LaterVersion(Version),
    LaterOrEqual(Version),
    EarlierVersion(Version),
    EarlierOrEqual(Version),
    Intersect(Box<VersionRange>, Box<VersionRange>),
    Union(Box<VersionRange>, Box<VersionRange>),
}

impl VersionRange {
    #[must_use]
    pub fn within_range(&self, v: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::ThisVersion(r) => v == r,
            Self::LaterVersion(r) => v > r,
            Self::LaterOrEqual(r) => v >= r,
            Self::EarlierVersion(r) => v < r,
            Self::EarlierOrEqual(r) => v <= r,
            Self::Intersect(a, b) => a.within_range(v) && b.within_range(v),
            Self::Union(a, b) => a.within_range(v) || b.within_range(v),
        }
    }

    /// Intersect two ranges. `Any` is the identity.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        match (self, other) {
            (Self::Any, r) | (r, Self::Any) => r,
            (a, b) => Self::Intersect(Box::new(a), Box::new(b)),
        }
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::Union(Box::new(self), Box::new(other))
    }

    /// Parse a simple Cabal-style range: `*`, `==v`, `>v`, `>=v`, `<v`,
    /// `<=v`, or `&&`/`||`-joined combinations of the above (e.g.
    /// `>=1.2 && <2`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Some((lhs, rhs)) = split_top_level(s, "||") {
            return Some(Self::parse(lhs)?.union(Self::parse(rhs)?));
        }
        if let Some((lhs, rhs)) = split_top_level(s, "&&") {
            return Some(Self::parse(lhs)?.intersect(Self::parse(rhs)?));
        }
        let s = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')).unwrap_or(s).trim();
        if s == "*" {
            return Some(Self::Any);
        }
        for (prefix, ctor) in [
            ("==", Self::ThisVersion as fn(Version) -> Self),
            (">=", Self::LaterOrEqual as fn(Version) -> Self),
            ("<=", Self::EarlierOrEqual as fn(Version) -> Self),
            (">", Self::LaterVersion as fn(Version) -> Self),
            ("<", Self::EarlierVersion as fn(Version) -> Self),
        ] {
            if let Some(rest) = s.strip_prefix(prefix) {
                return Version::parse(rest.trim()).map(ctor);
            }
        }
        Version::parse(s).map(Self::ThisVersion)
    }
}

fn split_top_level<'a>(s: &'a str, op: &str) -> Option<(&'a str, &'a str)> {
    let mut depth = 0i32;
    let bytes = s.as_bytes();
    let mut i = 0;
    while i + op.len() <= bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if depth == 0 && &s[i..i + op.len()] == op => {
                return Some((&s[..i], &s[i + op.len()..]));
            }
            _ => {}
        }
        i += 1;
    }
    None
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::ThisVersion(v) => write!(f, "=={v}"),
            Self::LaterVersion(v) => write!(f, ">{v}"),
            Self::LaterOrEqual(v) => write!(f, ">={v}"),
            Self::EarlierVersion(v) => write!(f, "<{v}"),
            Self::EarlierOrEqual(v) => write!(f, "<={v}"),
            Self::Intersect(a, b) => write!(f, "{a} && {b}"),
            Self::Union(a, b) => write!(f, "{a} || {b}"),
        }
    }
}

/// A curated snapshot name: a resolver (LTS) major/minor pair, or a
/// nightly dated build.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SnapName {
    Lts { major: u32, minor: u32 },
    Nightly(chrono::NaiveDate),
}

impl SnapName {
    /// The upstream repository flavor a snapshot document is fetched
    /// from (see spec §6's download URL pattern).
    #[must_use]
    pub fn flavor(&self) -> &'static str {
        match self {
            Self::Lts { .. } => "lts-haskell",
            Self::Nightly(_) => "stackage-nightly",
        }
    }
}

impl fmt::Display for SnapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lts { major, minor } => write!(f, "lts-{major}.{minor}"),
            Self::Nightly(date) => write!(f, "nightly-{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for SnapName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("nightly-") {
            let date = chrono::NaiveDate::parse_from_str(rest, "%Y-%m-%d")
                .map_err(|e| format!("invalid nightly date {rest:?}: {e}"))?;
            return Ok(Self::Nightly(date));
        }
        if let Some(rest) = s.strip_prefix("lts-") {
            let (major, minor) = rest
                .split_once('.')
                .ok_or_else(|| format!("invalid lts snapshot name: {s:?}"))?;
            let major = major
                .parse()
                .map_err(|_| format!("invalid lts major version: {major:?}"))?;
            let minor = minor
                .parse()
                .map_err(|_| format!("invalid lts minor version: {minor:?}"))?;
            return Ok(Self::Lts { major, minor });
        }
        Err(format!("unrecognized snapshot name: {s:?}"))
    }
}

/// A compiler family and version. Only GHC is modeled today, but the
/// tagged-union shape leaves room for others without touching call sites.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum CompilerVersion {
    Ghc(semver::Version),
}

impl CompilerVersion {
    #[must_use]
    pub fn which_compiler(&self) -> &'static str {
        match self {
            Self::Ghc(_) => "ghc",
        }
    }
}

impl fmt::Display for CompilerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ghc(v) => write!(f, "ghc-{v}"),
        }
    }
}

impl FromStr for CompilerVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("ghc-")
            .ok_or_else(|| format!("unsupported compiler: {s:?}"))?;
        let version = semver::Version::parse(rest)
            .or_else(|_| semver::Version::parse(&format!("{rest}.0")))
            .map_err(|e| format!("invalid compiler version {rest:?}: {e}"))?;
        Ok(Self::Ghc(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_trailing_zero_equivalence() {
        assert_eq!(Version::parse("1.0").unwrap(), Version::parse("1.0.0").unwrap());
        assert!(Version::parse("1.1").unwrap() > Version::parse("1.0.9").unwrap());
    }

    #[test]
    fn version_rejects_garbage() {
        assert!(Version::parse("").is_none());
        assert!(Version::parse("1.x").is_none());
    }

    #[test]
    fn package_name_validation() {
        assert!(PackageName::parse("aeson").is_some());
        assert!(PackageName::parse("http-client").is_some());
        assert!(PackageName::parse("-bad").is_none());
        assert!(PackageName::parse("bad-").is_none());
        assert!(PackageName::parse("ba--d").is_none());
        assert!(PackageName::parse("").is_none());
    }

    #[test]
    fn version_range_within_range() {
        let r = VersionRange::parse(">=1.2 && <2").unwrap();
        assert!(r.within_range(&Version::parse("1.2.0").unwrap()));
        assert!(r.within_range(&Version::parse("1.9.9").unwrap()));
        assert!(!r.within_range(&Version::parse("2.0.0").unwrap()));
        assert!(!r.within_range(&Version::parse("1.1.9").unwrap()));
    }

    #[test]
    fn snap_name_roundtrip() {
        assert_eq!(
            "lts-20.14".parse::<SnapName>().unwrap().to_string(),
            "lts-20.14"
        );
        assert_eq!(
            "nightly-2024-03-05".parse::<SnapName>().unwrap().to_string(),
            "nightly-2024-03-05"
        );
        assert!("lts-bogus".parse::<SnapName>().is_err());
    }

    #[test]
    fn compiler_version_roundtrip() {
        let c: CompilerVersion = "ghc-9.4.7".parse().unwrap();
        assert_eq!(c.which_compiler(), "ghc");
        assert_eq!(c.to_string(), "ghc-9.4.7");
    }

    #[test]
    fn flag_assignment_union_disjoint_rejects_overlap() {
        let mut a = FlagAssignment::new();
        a.insert(FlagName::new("x"), true);
        let mut b = FlagAssignment::new();
        b.insert(FlagName::new("x"), false);
        assert!(a.union_disjoint(b).is_none());
    }
}
