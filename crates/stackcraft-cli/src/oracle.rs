//! Minimal stand-ins for the package index and package-description
//! oracle.
//!
//! A real index (mapping identifiers to Cabal-file bytes) and a real
//! oracle (parsing those bytes into a [`stackcraft_resolver::ResolvedDescription`])
//! are external collaborators this workspace does not implement. These
//! no-op stand-ins let the CLI drive materialization and resolution
//! end to end against a live snapshot: every identifier is treated as
//! known, with no declared dependencies, tools, or flags.

use stackcraft_core::{PackageConfig, PackageIdentifier, Result};
use stackcraft_resolver::{IndexResolution, PackageDescriptionOracle, PackageIndex, ResolvedDescription};

pub struct NoopIndex;

impl PackageIndex for NoopIndex {
    fn resolve(&self, _idents: &[PackageIdentifier]) -> Result<IndexResolution> {
        Ok(IndexResolution::default())
    }
}

pub struct NoopOracle;

impl PackageDescriptionOracle for NoopOracle {
    fn resolve(&self, _ident: &PackageIdentifier, _config: &PackageConfig) -> Result<ResolvedDescription> {
        Ok(ResolvedDescription {
            has_library: true,
            ..ResolvedDescription::default()
        })
    }
}
