//! HTTP mock server utilities for testing snapshot-document fetching.
//!
//! Mirrors the real layout `SnapshotLoader` downloads from:
//! `/fpco/{flavor}/master/{name}.yaml`.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock snapshot host for testing `SnapshotLoader` without the network.
#[derive(Debug)]
pub struct MockSnapshotHost {
    server: MockServer,
}

impl MockSnapshotHost {
    /// Start a new mock snapshot host.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Register a snapshot document at `/fpco/{flavor}/master/{name}.yaml`.
    pub async fn register_snapshot(&self, flavor: &str, name: &str, yaml: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/fpco/{flavor}/master/{name}.yaml")))
            .respond_with(ResponseTemplate::new(200).set_body_string(yaml.to_string()))
            .mount(&self.server)
            .await;
    }

    /// Register a 404 for a snapshot name absent from this host.
    pub async fn register_not_found(&self, flavor: &str, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/fpco/{flavor}/master/{name}.yaml")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;
    }

    /// Register a transient server error, for retry-path tests.
    pub async fn register_server_error(&self, flavor: &str, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/fpco/{flavor}/master/{name}.yaml")))
            .respond_with(ResponseTemplate::new(503))
            .mount(&self.server)
            .await;
    }

    /// Number of requests this server has received so far.
    pub async fn received_requests(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixtures;

    #[tokio::test]
    async fn serves_registered_snapshot() {
        let mock = MockSnapshotHost::start().await;
        mock.register_snapshot("lts-haskell", "lts-20.14", &Fixtures::small_snapshot_yaml())
            .await;

        let resp = reqwest::get(format!("{}/fpco/lts-haskell/master/lts-20.14.yaml", mock.url()))
            .await
            .unwrap();
        assert!(resp.status().is_success());
        let body = resp.text().await.unwrap();
        assert!(body.contains("aeson"));
    }

    #[tokio::test]
    async fn missing_snapshot_is_404() {
        let mock = MockSnapshotHost::start().await;
        mock.register_not_found("lts-haskell", "lts-999.0").await;

        let resp = reqwest::get(format!("{}/fpco/lts-haskell/master/lts-999.0.yaml", mock.url()))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }
}
