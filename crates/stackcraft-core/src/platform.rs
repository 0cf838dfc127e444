//! Compiler-wired-in packages and the build platform triple.

use crate::version::{CompilerVersion, FlagAssignment};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of packages the compiler treats as part of itself.
///
/// Consulted by the snapshot picker (§4.9) to classify a dep-error as
/// `Fail` rather than `Partial`: a snapshot that conflicts with a
/// wired-in package can never be selected, no matter how it compares on
/// other dep errors.
const WIRED_IN_PACKAGES: &[&str] = &[
    "ghc",
    "ghc-prim",
    "ghc-bignum",
    "ghc-boot",
    "ghc-boot-th",
    "ghc-internal",
    "integer-gmp",
    "base",
    "rts",
    "template-haskell",
];

/// Returns `true` when `name` is a compiler-wired-in package.
#[must_use]
pub fn is_wired_in_package(name: &str) -> bool {
    WIRED_IN_PACKAGES.contains(&name)
}

/// Operating system family.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        };
        write!(f, "{s}")
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        };
        write!(f, "{s}")
    }
}

/// The OS/architecture pair package-description resolution conditions on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// The platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        let os = if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            Os::Linux
        };
        let arch = if cfg!(target_arch = "aarch64") {
            Arch::Aarch64
        } else {
            Arch::X86_64
        };
        Self { os, arch }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

/// Configuration handed to the package-description oracle when resolving
/// a package's conditional dependency/executable declarations.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    pub enable_tests: bool,
    pub enable_benchmarks: bool,
    pub flags: FlagAssignment,
    pub compiler: CompilerVersion,
    pub platform: Platform,
}

impl PackageConfig {
    /// The configuration materialization uses: no tests, no benchmarks
    /// (§4.3 step 3).
    #[must_use]
    pub fn for_materialization(flags: FlagAssignment, compiler: CompilerVersion) -> Self {
        Self {
            enable_tests: false,
            enable_benchmarks: false,
            flags,
            compiler,
            platform: Platform::current(),
        }
    }

    /// The configuration the per-package checker uses: tests and
    /// benchmarks count toward flag-selection dep errors (§4.7).
    #[must_use]
    pub fn for_check(flags: FlagAssignment, compiler: CompilerVersion) -> Self {
        Self {
            enable_tests: true,
            enable_benchmarks: true,
            flags,
            compiler,
            platform: Platform::current(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_wired_in_packages() {
        assert!(is_wired_in_package("base"));
        assert!(is_wired_in_package("ghc-prim"));
        assert!(!is_wired_in_package("aeson"));
    }

    #[test]
    fn platform_display() {
        let p = Platform {
            os: Os::Linux,
            arch: Arch::X86_64,
        };
        assert_eq!(p.to_string(), "x86_64-linux");
    }
}
