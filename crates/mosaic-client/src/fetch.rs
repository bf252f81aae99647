use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{ClientError, Fragment};

#[async_trait]
/// Trait contract for `FragmentFetcher` behavior.
pub trait FragmentFetcher: Send + Sync {
    /// Retrieves the fragment stored under `id`, if the service holds one.
    ///
    /// Every failure mode collapses to `None`: missing fragment, non-success
    /// status, malformed body, connect error, timeout. A failed probe never
    /// aborts the surrounding search, and this call mutates no shared state.
    async fn fetch(&self, id: u64) -> Option<Fragment>;
}

#[derive(Debug, Clone)]
/// Public struct `HttpFetcher` used across Mosaic components.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Builds a fetcher with a pooled connection per the given concurrency
    /// and a fixed per-request timeout. Configuration problems are rejected
    /// here, before any request is issued.
    pub fn new(
        base_url: &str,
        request_timeout_ms: u64,
        max_connections: usize,
    ) -> Result<Self, ClientError> {
        let trimmed = base_url.trim_end_matches('/');
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .pool_max_idle_per_host(max_connections.max(1))
            .build()?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    fn fragment_url(&self, id: u64) -> String {
        format!("{}/fragment?id={id}", self.base_url)
    }
}

#[async_trait]
impl FragmentFetcher for HttpFetcher {
    async fn fetch(&self, id: u64) -> Option<Fragment> {
        let response = match self.client.get(self.fragment_url(id)).send().await {
            Ok(response) => response,
            Err(error) => {
                debug!(id, %error, "fragment request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(id, status = status.as_u16(), "no fragment at identifier");
            return None;
        }

        match response.json::<Fragment>().await {
            Ok(fragment) => Some(fragment),
            Err(error) => {
                debug!(id, %error, "fragment body failed to deserialize");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HttpFetcher;
    use crate::ClientError;

    #[test]
    fn builds_fragment_url_without_doubled_slashes() {
        let fetcher =
            HttpFetcher::new("http://localhost:8888/", 5_000, 30).expect("fetcher builds");
        assert_eq!(fetcher.fragment_url(7), "http://localhost:8888/fragment?id=7");
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let error = HttpFetcher::new("localhost:8888", 5_000, 30)
            .expect_err("scheme-less base URL should be rejected");
        assert!(matches!(error, ClientError::InvalidBaseUrl(_)));
    }
}
