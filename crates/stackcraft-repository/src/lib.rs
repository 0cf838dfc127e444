//! Snapshot index client and snapshot loader (§4.1, §4.2): the workspace's
//! only outbound network boundary.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
mod index;
mod loader;
mod types;

pub use client::{HttpClient, ReqwestHttpClient, StatusCheck};
pub use index::{SnapshotIndexClient, Snapshots};
pub use loader::SnapshotLoader;
pub use types::{BuildPlan, BuildPlanPackage, CustomSnapshot, PackageConstraints, SystemInfo};
