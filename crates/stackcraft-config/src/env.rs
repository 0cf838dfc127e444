//! Well-known environment variables recognized by the config environment.

use std::path::PathBuf;

/// Environment variables the config environment consults before falling
/// back to platform defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvVar {
    /// `STACKCRAFT_ROOT` — overrides the stack root directory.
    Root,
    /// `STACKCRAFT_SNAPSHOTS_DIR` — overrides the local snapshots directory.
    SnapshotsDir,
}

impl EnvVar {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "STACKCRAFT_ROOT",
            Self::SnapshotsDir => "STACKCRAFT_SNAPSHOTS_DIR",
        }
    }

    #[must_use]
    pub fn as_path(self) -> Option<PathBuf> {
        std::env::var(self.as_str()).ok().map(PathBuf::from)
    }
}
