//! The HTTP client used by the snapshot index client and snapshot loader.
//!
//! Kept deliberately small: a single `download` entry point that writes the
//! response body to a destination path, plus a status-check hook so callers
//! can translate an HTTP status into a domain error (e.g. 404 into
//! `Error::snapshot_not_found`) before the generic network-error path kicks
//! in.

use async_trait::async_trait;
use reqwest::StatusCode;
use stackcraft_core::{Error, Result};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// A hook invoked with the response status before the body is read.
/// Returning `Some(err)` aborts the download with that error; `None`
/// continues normally (treating non-2xx-but-unmapped statuses as a
/// generic network error).
pub type StatusCheck<'a> = dyn Fn(StatusCode) -> Option<Error> + Send + Sync + 'a;

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch `url` and write its body to `dest`, creating parent
    /// directories as needed. `check_status` runs before the body is
    /// streamed, letting the caller map specific statuses to domain
    /// errors.
    async fn download(&self, url: &Url, dest: &Path, check_status: &StatusCheck<'_>)
    -> Result<()>;

    /// Fetch `url` and return its body as text, for small documents
    /// (the snapshot directory) that don't need to hit disk.
    async fn get_text(&self, url: &Url) -> Result<String>;
}

/// `reqwest`-backed client with a small fixed retry budget for transient
/// transport failures. No per-host rate limiting: the snapshot index and
/// raw snapshot documents are fetched at most a handful of times per run.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    max_retries: u32,
}

impl ReqwestHttpClient {
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stackcraft/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("default reqwest client config is valid");
        Self {
            client,
            max_retries: 3,
        }
    }

    async fn send_with_retries(&self, url: &Url) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url.clone()).send().await {
                Ok(resp) => return Ok(resp),
                Err(err)
                    if attempt < self.max_retries && (err.is_timeout() || err.is_connect()) =>
                {
                    warn!(%url, attempt, "transient error fetching url, retrying");
                    tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
                }
                Err(err) => return Err(Error::network(err.to_string(), Some(url.to_string()))),
            }
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn download(
        &self,
        url: &Url,
        dest: &Path,
        check_status: &StatusCheck<'_>,
    ) -> Result<()> {
        let resp = self.send_with_retries(url).await?;
        if let Some(err) = check_status(resp.status()) {
            return Err(err);
        }
        if !resp.status().is_success() {
            return Err(Error::network(
                format!("unexpected status {}", resp.status()),
                Some(url.to_string()),
            ));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::network(e.to_string(), Some(url.to_string())))?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let tmp = dest.with_extension("tmp");
        std::fs::write(&tmp, &bytes).map_err(|e| Error::io(&tmp, e))?;
        std::fs::rename(&tmp, dest).map_err(|e| Error::io(dest, e))?;
        debug!(%url, dest = %dest.display(), bytes = bytes.len(), "downloaded");
        Ok(())
    }

    async fn get_text(&self, url: &Url) -> Result<String> {
        let resp = self.send_with_retries(url).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::network("not found", Some(url.to_string())));
        }
        if !resp.status().is_success() {
            return Err(Error::network(
                format!("unexpected status {}", resp.status()),
                Some(url.to_string()),
            ));
        }
        resp.text()
            .await
            .map_err(|e| Error::network(e.to_string(), Some(url.to_string())))
    }
}
