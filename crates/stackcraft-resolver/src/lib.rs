//! Build-plan resolution: turns a raw snapshot plus a set of local
//! packages into an installable plan.
//!
//! Pipeline, in the order a caller typically drives it:
//! - [`materializer`] turns a snapshot's core/user package lists into a
//!   [`types::MiniPlan`] via a [`materializer::PackageIndex`] and
//!   [`oracle::PackageDescriptionOracle`].
//! - [`toolmap`] builds the executable-name reverse index the target
//!   resolver needs to expand tool dependencies.
//! - [`target`] computes the transitive closure over a target set,
//!   reporting shadowed and unknown packages.
//! - [`flags`] and [`check`] select a per-package flag assignment by
//!   bounded search against a version pool.
//! - [`bundle`] aggregates flag selection across a set of local packages.
//! - [`picker`] classifies and ranks candidate snapshots for a bundle.
//! - [`shadow`] projects a `MiniPlan` through a shadowed-name set.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod check;
pub mod flags;
pub mod materializer;
pub mod oracle;
pub mod picker;
pub mod shadow;
pub mod target;
pub mod toolmap;
pub mod types;

pub use bundle::{LocalPackageDescription, check_bundle_build_plan};
pub use check::check_package_build_plan;
pub use flags::{FlagSpec, MAX_FLAG_COMBINATIONS, enumerate_flag_assignments, select_package_build_plan};
pub use materializer::{
    IndexResolution, PackageIndex, materialize_cached, materialize_custom_snapshot, to_mini_build_plan,
};
pub use oracle::{PackageDescriptionOracle, ResolvedDescription};
pub use picker::{SnapshotCandidate, check_snap_build_plan, find_build_plan};
pub use shadow::shadow_mini_build_plan;
pub use target::{ResolveState, get_deps, resolve_build_plan};
pub use toolmap::get_tool_map;
pub use types::{
    BuildPlanCheck, DepError, DepErrors, ExeName, MiniPackageInfo, MiniPlan, ToolMap, ToolName,
    combine_dep_errors,
};
