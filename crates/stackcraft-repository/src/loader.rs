//! Snapshot loader (§4.2): resolves a `SnapName` to its `BuildPlan`,
//! preferring a locally cached document and falling back to a download
//! from the upstream snapshot repository.

use crate::client::HttpClient;
use crate::types::BuildPlan;
use stackcraft_config::ConfigEnv;
use stackcraft_core::{Error, Result, SnapName};
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct SnapshotLoader<H> {
    client: Arc<H>,
    config: ConfigEnv,
}

impl<H: HttpClient> SnapshotLoader<H> {
    #[must_use]
    pub fn new(client: Arc<H>, config: ConfigEnv) -> Self {
        Self { client, config }
    }

    /// Load and decode the snapshot document for `name`.
    ///
    /// Tries the locally cached copy first; a file that's present but
    /// fails to decode falls through to the download path exactly like a
    /// cache miss, rather than surfacing the decode error. On a miss,
    /// downloads from
    /// `https://raw.githubusercontent.com/fpco/<flavor>/master/<name>.yaml`
    /// and writes it into the local snapshot directory before decoding.
    /// A 404 is mapped to `Error::snapshot_not_found`; any other decode
    /// failure from the freshly downloaded file is surfaced unchanged.
    pub async fn load_build_plan(&self, name: &SnapName) -> Result<BuildPlan> {
        let path = self.config.snapshot_file_path(name);
        if let Ok(text) = std::fs::read_to_string(&path) {
            match stackcraft_core::from_yaml(&text) {
                Ok(plan) => {
                    debug!(snapshot = %name, path = %path.display(), "loaded snapshot from local cache");
                    return Ok(plan);
                }
                Err(e) => {
                    debug!(snapshot = %name, path = %path.display(), error = %e, "local snapshot cache failed to decode, falling back to download");
                }
            }
        }

        let url = Url::parse(&format!(
            "https://raw.githubusercontent.com/fpco/{}/master/{name}.yaml",
            name.flavor(),
        ))
        .map_err(|e| Error::network(e.to_string(), None))?;

        let name_for_check = name.clone();
        self.client
            .download(&url, &path, &move |status| {
                (status == reqwest::StatusCode::NOT_FOUND)
                    .then(|| Error::snapshot_not_found(name_for_check.clone()))
            })
            .await?;

        let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        debug!(snapshot = %name, url = %url, "downloaded snapshot");
        stackcraft_core::from_yaml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StatusCheck;
    use async_trait::async_trait;
    use std::path::Path;

    struct LocalOnlyClient;

    #[async_trait]
    impl HttpClient for LocalOnlyClient {
        async fn download(&self, _url: &Url, _dest: &Path, _check_status: &StatusCheck<'_>) -> Result<()> {
            panic!("local cache hit should not reach the network")
        }

        async fn get_text(&self, _url: &Url) -> Result<String> {
            panic!("not exercised by these tests")
        }
    }

    #[tokio::test]
    async fn prefers_local_cache_over_network() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigEnv::at_root(dir.path());
        let name = SnapName::Lts { major: 20, minor: 14 };
        std::fs::create_dir_all(config.snapshots_dir()).unwrap();
        std::fs::write(
            config.snapshot_file_path(&name),
            "system-info:\n  compiler-version: !Ghc 9.4.7\n  core-packages: {}\npackages: {}\n",
        )
        .unwrap();

        let loader = SnapshotLoader::new(Arc::new(LocalOnlyClient), config);
        let plan = loader.load_build_plan(&name).await.unwrap();
        assert!(plan.packages.is_empty());
    }
}
