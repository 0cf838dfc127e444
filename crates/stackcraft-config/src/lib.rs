//! Config environment: the external interface (§6) the resolution core
//! reads `platform`, `stackRoot`, per-snapshot cache paths, and
//! package-cache directories from.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod env;

pub use env::EnvVar;

use stackcraft_core::{Platform, SnapName};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves paths the rest of the workspace needs without hardcoding
/// platform-specific directory layout: the stack root, per-snapshot
/// binary-cache paths, and the set of configured package-index cache
/// directories.
#[derive(Debug, Clone)]
pub struct ConfigEnv {
    platform: Platform,
    stack_root: PathBuf,
    /// `bcStackYaml` — path to the project's `stack.yaml`, if resolved
    /// against a project directory.
    stack_yaml: Option<PathBuf>,
    /// `bcPackageCaches` — configured package-index cache directories,
    /// consulted for "best known version" suggestions on unknown
    /// packages (§7).
    package_caches: Vec<PathBuf>,
}

impl ConfigEnv {
    /// Build a config environment, honoring `STACKCRAFT_ROOT` and
    /// `STACKCRAFT_SNAPSHOTS_DIR` overrides and otherwise falling back to
    /// the platform's standard data directory.
    ///
    /// # Errors
    /// Returns an error if no platform data directory could be
    /// determined and no override was supplied.
    pub fn discover() -> stackcraft_core::Result<Self> {
        let stack_root = EnvVar::Root.as_path().map_or_else(
            || {
                directories::ProjectDirs::from("", "", "stackcraft")
                    .map(|dirs| dirs.data_dir().to_path_buf())
                    .ok_or_else(|| {
                        stackcraft_core::Error::config(
                            "could not determine a data directory for this platform",
                            None,
                        )
                    })
            },
            Ok,
        )?;
        debug!(root = %stack_root.display(), "resolved stack root");

        Ok(Self {
            platform: Platform::current(),
            stack_root,
            stack_yaml: None,
            package_caches: Vec::new(),
        })
    }

    /// Build a config environment rooted at an explicit directory, for
    /// tests and the CLI's `--stack-root` override.
    #[must_use]
    pub fn at_root(stack_root: impl Into<PathBuf>) -> Self {
        Self {
            platform: Platform::current(),
            stack_root: stack_root.into(),
            stack_yaml: None,
            package_caches: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stack_yaml(mut self, path: impl Into<PathBuf>) -> Self {
        self.stack_yaml = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_package_caches(mut self, caches: Vec<PathBuf>) -> Self {
        self.package_caches = caches;
        self
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn stack_root(&self) -> &Path {
        &self.stack_root
    }

    /// `bcStackYaml`.
    #[must_use]
    pub fn stack_yaml(&self) -> Option<&Path> {
        self.stack_yaml.as_deref()
    }

    /// `bcPackageCaches`.
    #[must_use]
    pub fn package_caches(&self) -> &[PathBuf] {
        &self.package_caches
    }

    /// Directory holding downloaded/cached raw snapshot documents.
    #[must_use]
    pub fn snapshots_dir(&self) -> PathBuf {
        EnvVar::SnapshotsDir
            .as_path()
            .unwrap_or_else(|| self.stack_root.join("snapshots"))
    }

    /// The raw snapshot document path for `name` within `snapshots_dir`.
    #[must_use]
    pub fn snapshot_file_path(&self, name: &SnapName) -> PathBuf {
        self.snapshots_dir().join(format!("{name}.yaml"))
    }

    /// `configMiniBuildPlanCache(name)` — the versioned binary cache
    /// envelope path for a materialized `MiniPlan`, keyed by
    /// `(snapshot, compiler)`.
    #[must_use]
    pub fn mini_build_plan_cache_path(
        &self,
        name: &SnapName,
        compiler: &stackcraft_core::CompilerVersion,
    ) -> PathBuf {
        self.stack_root
            .join("build-plan-cache")
            .join(compiler.to_string())
            .join(format!("{name}.bin"))
    }

    /// Cache path for a custom snapshot, content-addressed by the hash
    /// of its source document (§5).
    #[must_use]
    pub fn custom_snapshot_cache_path(&self, hash: &stackcraft_core::ContentHash) -> PathBuf {
        stackcraft_cache::content_addressed_path(
            &self.stack_root.join("custom-snapshots"),
            hash,
        )
    }
}
