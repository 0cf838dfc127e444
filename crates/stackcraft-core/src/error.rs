//! Error types for build-plan resolution.
//!
//! Each error carries:
//! - A coded `ErrorCode` for easy reference and searching
//! - A clear message
//! - Suggestions for how to fix the issue, rendered via `display_with_suggestions`

use crate::version::{PackageName, SnapName, Version};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for resolution-core errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Snapshot errors (E01xx)
    /// Snapshot document could not be found (404 on download).
    E0101,
    /// Snapshot directory entry disagreed with its key's classification.
    E0102,

    // Resolution errors (E02xx)
    /// Target resolution found unknown and/or shadowed packages.
    E0201,

    // Decode errors (E03xx)
    /// Custom snapshot compiler string failed to parse.
    E0301,
    /// JSON decode error.
    E0302,
    /// YAML decode error.
    E0303,

    // IO errors (E04xx)
    /// File not found.
    E0401,
    /// Permission denied.
    E0402,
    /// Other I/O failure.
    E0403,

    // Cache errors (E05xx)
    /// Binary cache envelope corrupted or schema mismatch.
    E0501,

    // Network errors (E06xx)
    /// Network request failed.
    E0601,

    // Config errors (E07xx)
    /// Invalid or missing configuration.
    E0701,

    // Internal invariants (E08xx) — programmer errors, not expected to be recovered
    /// Duplicate local package name, cycle in a `MiniPlan`, or nonempty
    /// `missingNames` after core resolution.
    E0801,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0201 => "E0201",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0401 => "E0401",
            Self::E0402 => "E0402",
            Self::E0403 => "E0403",
            Self::E0501 => "E0501",
            Self::E0601 => "E0601",
            Self::E0701 => "E0701",
            Self::E0801 => "E0801",
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::E0101 => "Snapshot not found",
            Self::E0102 => "Invalid snapshot directory",
            Self::E0201 => "Unknown or shadowed packages",
            Self::E0301 => "Invalid compiler version",
            Self::E0302 => "JSON decode error",
            Self::E0303 => "YAML decode error",
            Self::E0401 => "File not found",
            Self::E0402 => "Permission denied",
            Self::E0403 => "I/O error",
            Self::E0501 => "Cache error",
            Self::E0601 => "Network error",
            Self::E0701 => "Configuration error",
            Self::E0801 => "Internal invariant violated",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wrapper to make `ErrorCode` usable as a `#[source]`.
#[derive(Debug)]
pub struct ErrorCodeSource(pub ErrorCode);

impl fmt::Display for ErrorCodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

impl std::error::Error for ErrorCodeSource {}

/// A package the target resolver could not find in the materialized plan.
#[derive(Debug, Clone)]
pub struct UnknownPackage {
    pub name: PackageName,
    /// Best-known version across configured package indexes, if any.
    pub best_known_version: Option<Version>,
    pub requirers: Vec<PackageName>,
}

/// A shadowed package and the requirer chain that led to it.
#[derive(Debug, Clone)]
pub struct ShadowedPackage {
    pub name: PackageName,
    pub requirers: Vec<PackageName>,
}

/// The error type shared across the workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// 404 (or equivalent) fetching a snapshot document.
    #[error("[{code}] snapshot '{name}' not found")]
    SnapshotNotFound {
        #[source]
        code: ErrorCodeSource,
        name: SnapName,
        suggestions: Vec<String>,
    },

    /// Snapshot directory key/value classification mismatch.
    #[error("[{code}] snapshot directory entry {key:?} does not match its key's classification")]
    InvalidSnapshotDirectory {
        #[source]
        code: ErrorCodeSource,
        key: String,
        suggestions: Vec<String>,
    },

    /// Target resolution failed due to unknown and/or shadowed packages.
    #[error("[{code}] {} unknown, {} shadowed package(s)", unknown.len(), shadowed.len())]
    UnknownPackages {
        #[source]
        code: ErrorCodeSource,
        stack_yaml_path: Option<PathBuf>,
        unknown: Vec<UnknownPackage>,
        shadowed: Vec<ShadowedPackage>,
        suggestions: Vec<String>,
    },

    /// Custom snapshot `compiler:` field failed to parse.
    #[error("[{code}] invalid compiler version: {text}")]
    InvalidCompiler {
        #[source]
        code: ErrorCodeSource,
        text: String,
        suggestions: Vec<String>,
    },

    /// I/O error with path context.
    #[error("[{code}] io error at {path}: {message}")]
    Io {
        #[source]
        code: ErrorCodeSource,
        path: PathBuf,
        message: String,
        suggestions: Vec<String>,
    },

    /// JSON decode error (snapshot directory document).
    #[error("[E0302] json error: {0}")]
    Json(#[from] sonic_rs::Error),

    /// YAML decode error (snapshot / custom-snapshot document).
    #[error("[E0303] yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Binary cache envelope error.
    #[error("[{code}] cache error: {message}")]
    Cache {
        #[source]
        code: ErrorCodeSource,
        message: String,
        suggestions: Vec<String>,
    },

    /// Network error (other than a 404 already mapped to `SnapshotNotFound`).
    #[error("[{code}] network error: {message}")]
    Network {
        #[source]
        code: ErrorCodeSource,
        message: String,
        url: Option<String>,
        suggestions: Vec<String>,
    },

    /// Configuration error.
    #[error("[{code}] config error: {message}")]
    Config {
        #[source]
        code: ErrorCodeSource,
        message: String,
        key: Option<String>,
        suggestions: Vec<String>,
    },

    /// Programmer error: duplicate local package name, cycle in a
    /// `MiniPlan`, or nonempty `missingNames` after core resolution.
    /// Not expected to be recovered.
    #[error("[{code}] internal invariant violated: {message}")]
    Internal {
        #[source]
        code: ErrorCodeSource,
        message: String,
    },
}

impl Error {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::SnapshotNotFound { code, .. }
            | Self::InvalidSnapshotDirectory { code, .. }
            | Self::UnknownPackages { code, .. }
            | Self::InvalidCompiler { code, .. }
            | Self::Io { code, .. }
            | Self::Cache { code, .. }
            | Self::Network { code, .. }
            | Self::Config { code, .. }
            | Self::Internal { code, .. } => code.0,
            Self::Json(_) => ErrorCode::E0302,
            Self::Yaml(_) => ErrorCode::E0303,
        }
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::SnapshotNotFound { suggestions, .. }
            | Self::InvalidSnapshotDirectory { suggestions, .. }
            | Self::UnknownPackages { suggestions, .. }
            | Self::InvalidCompiler { suggestions, .. }
            | Self::Io { suggestions, .. }
            | Self::Cache { suggestions, .. }
            | Self::Network { suggestions, .. }
            | Self::Config { suggestions, .. } => suggestions,
            Self::Json(_) | Self::Yaml(_) | Self::Internal { .. } => &[],
        }
    }

    #[must_use]
    pub fn snapshot_not_found(name: SnapName) -> Self {
        Self::SnapshotNotFound {
            code: ErrorCodeSource(ErrorCode::E0101),
            suggestions: vec![
                format!("Check the snapshot directory for a valid name near {name}"),
                "Snapshot names look like lts-20.14 or nightly-2024-03-05".to_string(),
            ],
            name,
        }
    }

    #[must_use]
    pub fn invalid_snapshot_directory(key: impl Into<String>) -> Self {
        Self::InvalidSnapshotDirectory {
            code: ErrorCodeSource(ErrorCode::E0102),
            key: key.into(),
            suggestions: vec![
                "The snapshot directory document is malformed upstream".to_string(),
            ],
        }
    }

    #[must_use]
    pub fn unknown_packages(
        stack_yaml_path: Option<PathBuf>,
        unknown: Vec<UnknownPackage>,
        shadowed: Vec<ShadowedPackage>,
    ) -> Self {
        let mut suggestions = Vec::new();
        let mut with_version = Vec::new();
        let mut without_version = Vec::new();
        for u in &unknown {
            match &u.best_known_version {
                Some(v) => with_version.push(format!("{}-{v}", u.name)),
                None => without_version.push(u.name.to_string()),
            }
        }
        if !with_version.is_empty() {
            suggestions.push(format!("Add to extra-deps: {}", with_version.join(", ")));
        }
        if !without_version.is_empty() {
            suggestions.push(format!(
                "No known version for: {}",
                without_version.join(", ")
            ));
        }
        for s in &shadowed {
            suggestions.push(format!(
                "{} is shadowed by a local package and masked for {}",
                s.name,
                s.requirers
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        Self::UnknownPackages {
            code: ErrorCodeSource(ErrorCode::E0201),
            stack_yaml_path,
            unknown,
            shadowed,
            suggestions,
        }
    }

    #[must_use]
    pub fn invalid_compiler(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::InvalidCompiler {
            code: ErrorCodeSource(ErrorCode::E0301),
            suggestions: vec![format!(
                "Compiler versions look like ghc-9.4.7, got {text:?}"
            )],
            text,
        }
    }

    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let (code, suggestions) = match err.kind() {
            std::io::ErrorKind::NotFound => (
                ErrorCode::E0401,
                vec![format!("Check if the path exists: {}", path.display())],
            ),
            std::io::ErrorKind::PermissionDenied => (
                ErrorCode::E0402,
                vec![format!("Check permissions on: {}", path.display())],
            ),
            _ => (
                ErrorCode::E0403,
                vec![format!("Check the file: {}", path.display())],
            ),
        };
        Self::Io {
            code: ErrorCodeSource(code),
            path,
            message: err.to_string(),
            suggestions,
        }
    }

    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            code: ErrorCodeSource(ErrorCode::E0501),
            message: message.into(),
            suggestions: vec!["Delete the cache entry and retry to force a rebuild".to_string()],
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>, url: Option<String>) -> Self {
        let message = message.into();
        let mut suggestions = vec!["Check your internet connection".to_string()];
        if let Some(ref u) = url {
            suggestions.push(format!("Try accessing {u} directly"));
        }
        Self::Network {
            code: ErrorCodeSource(ErrorCode::E0601),
            message,
            url,
            suggestions,
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>, key: Option<String>) -> Self {
        Self::Config {
            code: ErrorCodeSource(ErrorCode::E0701),
            message: message.into(),
            key,
            suggestions: vec!["Check your configuration file for errors".to_string()],
        }
    }

    /// Signal a programmer error: duplicate local package name, a cycle
    /// discovered in an already-materialized `MiniPlan`, or a nonempty
    /// `missingNames` set after resolving core packages.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCodeSource(ErrorCode::E0801),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn display_with_suggestions(&self) -> String {
        let mut output = format!("{self}");
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\n\nSuggestions:");
            for suggestion in suggestions {
                output.push_str(&format!("\n  - {suggestion}"));
            }
        }
        output
    }
}

/// Result type used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
