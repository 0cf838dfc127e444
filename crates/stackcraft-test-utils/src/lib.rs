//! Testing utilities for the stackcraft workspace.
//!
//! This crate provides test helpers, fixtures, generators, and assertions
//! for testing the materializer, target resolver, flag selector, and
//! snapshot picker.
//!
//! # Modules
//!
//! - [`fixtures`]: Pre-built snapshot documents and `MiniPlan`s
//! - [`generators`]: Random data generators for property-based testing
//! - [`assertions`]: Custom assertion helpers for build-plan checks
//! - [`mock_server`]: HTTP mock server for the snapshot-document endpoint
//! - [`oracle`]: `StaticIndex`/`StaticOracle` test doubles for the
//!   package index and package-description oracle
//! - [`proptest_strategies`]: Proptest strategies for stackcraft types
//!
//! # Example
//!
//! ```rust,no_run
//! use stackcraft_test_utils::fixtures::Fixtures;
//! use stackcraft_test_utils::oracle::{StaticIndex, StaticOracle};
//!
//! let plan = Fixtures::linear_mini_plan();
//! let oracle = StaticOracle::new().with_deps("mid", &["leaf"]);
//! let _ = (plan, oracle, StaticIndex::new());
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod assertions;
pub mod fixtures;
pub mod generators;
pub mod mock_server;
pub mod oracle;
pub mod proptest_strategies;

/// Re-export commonly used testing utilities.
pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::fixtures::Fixtures;
    pub use crate::generators::*;
    pub use crate::mock_server::MockSnapshotHost;
    pub use crate::oracle::{StaticIndex, StaticOracle};

    // Re-export common testing crates
    pub use insta::{assert_json_snapshot, assert_snapshot};
    pub use pretty_assertions::{assert_eq, assert_ne};
    pub use proptest::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let plan = fixtures::Fixtures::linear_mini_plan();
        assert!(!plan.packages.is_empty());
    }
}
