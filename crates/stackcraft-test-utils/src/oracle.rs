//! Static, in-memory stand-ins for [`stackcraft_resolver::PackageIndex`]
//! and [`stackcraft_resolver::PackageDescriptionOracle`], for exercising
//! the materializer and resolver without a real Cabal-file fetcher.

use stackcraft_core::{AHashMap, AHashSet, PackageConfig, PackageIdentifier, PackageName, Result, VersionRange};
use stackcraft_resolver::{IndexResolution, PackageDescriptionOracle, PackageIndex, ResolvedDescription};

/// A package index backed by a fixed identifier set: every identifier
/// inserted is known, everything else is reported missing.
#[derive(Debug, Default)]
pub struct StaticIndex {
    known: AHashSet<PackageIdentifier>,
}

impl StaticIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, ident: PackageIdentifier) -> Self {
        self.known.insert(ident);
        self
    }
}

impl PackageIndex for StaticIndex {
    fn resolve(&self, idents: &[PackageIdentifier]) -> Result<IndexResolution> {
        let mut missing_idents = AHashSet::default();
        for ident in idents {
            if !self.known.contains(ident) {
                missing_idents.insert(ident.clone());
            }
        }
        Ok(IndexResolution { missing_names: AHashSet::default(), missing_idents })
    }
}

/// A package-description oracle backed by a fixed table keyed by
/// package name: every version of a given name resolves to the same
/// declared surface. Names absent from the table resolve to an empty,
/// library-only description, so unconfigured identifiers behave like
/// leaves rather than failing resolution outright.
#[derive(Debug, Default)]
pub struct StaticOracle {
    entries: AHashMap<PackageName, ResolvedDescription>,
}

impl StaticOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deps(mut self, name: &str, deps: &[&str]) -> Self {
        let dependency_ranges = deps
            .iter()
            .map(|d| (PackageName::new_unchecked(*d), VersionRange::Any))
            .collect();
        self.entries.insert(
            PackageName::new_unchecked(name),
            ResolvedDescription { dependency_ranges, has_library: true, ..ResolvedDescription::default() },
        );
        self
    }

    #[must_use]
    pub fn with_description(mut self, name: &str, description: ResolvedDescription) -> Self {
        self.entries.insert(PackageName::new_unchecked(name), description);
        self
    }
}

impl PackageDescriptionOracle for StaticOracle {
    fn resolve(&self, ident: &PackageIdentifier, _config: &PackageConfig) -> Result<ResolvedDescription> {
        Ok(self.entries.get(&ident.name).cloned().unwrap_or_else(|| ResolvedDescription {
            has_library: true,
            ..ResolvedDescription::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackcraft_core::{FlagAssignment, Version};

    fn config() -> PackageConfig {
        PackageConfig::for_materialization(FlagAssignment::new(), "ghc-9.4.7".parse().unwrap())
    }

    #[test]
    fn static_oracle_reports_declared_deps() {
        let oracle = StaticOracle::new().with_deps("app", &["mid"]);
        let ident = PackageIdentifier::new(PackageName::new_unchecked("app"), Version::parse("1.0").unwrap());
        let resolved = oracle.resolve(&ident, &config()).unwrap();
        assert!(resolved.package_deps().contains(&PackageName::new_unchecked("mid")));
    }

    #[test]
    fn static_oracle_defaults_unknown_names_to_library_only() {
        let oracle = StaticOracle::new();
        let ident = PackageIdentifier::new(PackageName::new_unchecked("unlisted"), Version::parse("1.0").unwrap());
        let resolved = oracle.resolve(&ident, &config()).unwrap();
        assert!(resolved.has_library);
        assert!(resolved.package_deps().is_empty());
    }

    #[test]
    fn static_index_reports_missing_idents() {
        let known = PackageIdentifier::new(PackageName::new_unchecked("foo"), Version::parse("1.0").unwrap());
        let index = StaticIndex::new().with(known.clone());
        let unknown = PackageIdentifier::new(PackageName::new_unchecked("bar"), Version::parse("1.0").unwrap());
        let resolution = index.resolve(&[known.clone(), unknown.clone()]).unwrap();
        assert!(!resolution.missing_idents.contains(&known));
        assert!(resolution.missing_idents.contains(&unknown));
    }
}
