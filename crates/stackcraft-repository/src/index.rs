//! Snapshot index client (§4.1): downloads and parses the snapshot
//! directory document, a flat JSON object mapping resolver names to the
//! latest snapshot in that line.

use crate::client::HttpClient;
use serde::{Deserialize, Serialize};
use stackcraft_core::{AHashMap, Error, Result};
use std::sync::Arc;
use url::Url;

/// The latest snapshot known per resolver line, as published by the
/// snapshot directory document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshots {
    /// `nightly` entry, if present.
    pub nightly: Option<chrono::NaiveDate>,
    /// `lts-<major>` entries, mapping major version to latest known minor.
    pub lts: AHashMap<u32, u32>,
}

impl Snapshots {
    /// The most recent LTS snapshot across all known major lines, if any.
    #[must_use]
    pub fn latest_lts(&self) -> Option<(u32, u32)> {
        self.lts.iter().map(|(&major, &minor)| (major, minor)).max()
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotIndexClient<H> {
    client: Arc<H>,
    directory_url: Url,
}

impl<H: HttpClient> SnapshotIndexClient<H> {
    #[must_use]
    pub fn new(client: Arc<H>, directory_url: Url) -> Self {
        Self {
            client,
            directory_url,
        }
    }

    /// Fetch and parse the snapshot directory document.
    ///
    /// Each `lts-<major>` key must carry an `lts-<minor-source>.<minor>`
    /// value (a value that isn't `lts`-flavored at all is an
    /// `InvalidSnapshotDirectory` error; the minor-source major need not
    /// match the key's major); the `nightly` key must carry a
    /// `nightly-<date>` value. Unrecognized keys are ignored, matching
    /// upstream's practice of adding directory entries ahead of client
    /// support for them.
    pub async fn get_snapshots(&self) -> Result<Snapshots> {
        let text = self.client.get_text(&self.directory_url).await?;
        let raw: AHashMap<String, String> = stackcraft_core::from_json(text.as_bytes())?;

        let mut snapshots = Snapshots::default();
        for (key, value) in raw {
            if key == "nightly" {
                let Some(rest) = value.strip_prefix("nightly-") else {
                    return Err(Error::invalid_snapshot_directory(key));
                };
                let date = chrono::NaiveDate::parse_from_str(rest, "%Y-%m-%d")
                    .map_err(|_| Error::invalid_snapshot_directory(key.clone()))?;
                snapshots.nightly = Some(date);
                continue;
            }
            if let Some(major_str) = key.strip_prefix("lts-") {
                let major: u32 = major_str
                    .parse()
                    .map_err(|_| Error::invalid_snapshot_directory(key.clone()))?;
                let Some(value_rest) = value.strip_prefix("lts-") else {
                    return Err(Error::invalid_snapshot_directory(key));
                };
                let Some((_, minor_str)) = value_rest.split_once('.') else {
                    return Err(Error::invalid_snapshot_directory(key));
                };
                let minor: u32 = minor_str
                    .parse()
                    .map_err(|_| Error::invalid_snapshot_directory(key.clone()))?;
                snapshots.lts.insert(major, minor);
            }
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use stackcraft_core::Error as CoreError;

    struct FakeClient(String);

    #[async_trait]
    impl HttpClient for FakeClient {
        async fn download(
            &self,
            _url: &Url,
            _dest: &std::path::Path,
            _check_status: &crate::client::StatusCheck<'_>,
        ) -> Result<()> {
            unimplemented!("not exercised by these tests")
        }

        async fn get_text(&self, _url: &Url) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn url() -> Url {
        Url::parse("https://example.test/snapshots.json").unwrap()
    }

    #[tokio::test]
    async fn parses_nightly_and_lts_entries() {
        let body = r#"{"nightly":"nightly-2024-03-05","lts-20":"lts-20.14","lts-18":"lts-18.28"}"#;
        let client = SnapshotIndexClient::new(Arc::new(FakeClient(body.to_string())), url());
        let snapshots = client.get_snapshots().await.unwrap();
        assert_eq!(
            snapshots.nightly,
            Some(chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
        assert_eq!(snapshots.lts.get(&20), Some(&14));
        assert_eq!(snapshots.latest_lts(), Some((20, 14)));
    }

    #[tokio::test]
    async fn accepts_lts_entry_with_mismatched_major() {
        let body = r#"{"lts-20":"lts-19.1"}"#;
        let client = SnapshotIndexClient::new(Arc::new(FakeClient(body.to_string())), url());
        let snapshots = client.get_snapshots().await.unwrap();
        assert_eq!(snapshots.lts.get(&20), Some(&1));
    }

    #[tokio::test]
    async fn rejects_non_lts_value_for_lts_key() {
        let body = r#"{"lts-20":"nightly-2024-03-05"}"#;
        let client = SnapshotIndexClient::new(Arc::new(FakeClient(body.to_string())), url());
        let err = client.get_snapshots().await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidSnapshotDirectory { .. }));
    }

    #[tokio::test]
    async fn ignores_unrecognized_keys() {
        let body = r#"{"nightly":"nightly-2024-03-05","future-format":"whatever"}"#;
        let client = SnapshotIndexClient::new(Arc::new(FakeClient(body.to_string())), url());
        let snapshots = client.get_snapshots().await.unwrap();
        assert!(snapshots.lts.is_empty());
    }
}
