use std::sync::Arc;
use std::time::Duration;

use mockall::automock;
use tracing::debug;

use crate::server::error::{AppResult, Error};

/// per-request transport timeout, upstream portals can be slow but not this slow
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub type DynFetchService = Arc<dyn FetchServiceTrait + Send + Sync>;

#[automock]
#[async_trait::async_trait]
pub trait FetchServiceTrait {
    /// fetch a body decoded as text, optionally skipping certificate validation
    async fn fetch_text(&self, url: &str, relax_tls: bool) -> AppResult<String>;

    /// fetch a body as raw bytes (compressed payloads)
    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>>;

    /// GET with query parameters, upstream body decoded as json
    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> AppResult<serde_json::Value>;
}

pub struct ReqwestFetchService {
    client: reqwest::Client,
    // self-signed certificates are the norm on iptv portals
    insecure_client: reqwest::Client,
}

impl ReqwestFetchService {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let insecure_client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            insecure_client,
        }
    }

    fn pick_client(&self, relax_tls: bool) -> &reqwest::Client {
        if relax_tls {
            &self.insecure_client
        } else {
            &self.client
        }
    }

    fn ensure_success(response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Upstream {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Error: not found")
                    .to_string(),
            })
        }
    }
}

impl Default for ReqwestFetchService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FetchServiceTrait for ReqwestFetchService {
    async fn fetch_text(&self, url: &str, relax_tls: bool) -> AppResult<String> {
        debug!("fetching text from {} (relax_tls: {})", url, relax_tls);

        let response = self
            .pick_client(relax_tls)
            .get(url)
            .send()
            .await
            .map_err(|e| {
                debug!("transport failure for {}: {}", url, e);
                Error::FetchFailed
            })?;

        let response = Self::ensure_success(response)?;
        response.text().await.map_err(|_| Error::FetchFailed)
    }

    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        debug!("fetching bytes from {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            debug!("transport failure for {}: {}", url, e);
            Error::FetchFailed
        })?;

        let response = Self::ensure_success(response)?;
        let bytes = response.bytes().await.map_err(|_| Error::FetchFailed)?;
        Ok(bytes.to_vec())
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> AppResult<serde_json::Value> {
        debug!("forwarding GET to {} with {} params", url, query.len());

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                debug!("transport failure for {}: {}", url, e);
                Error::FetchFailed
            })?;

        let response = Self::ensure_success(response)?;
        response.json().await.map_err(|_| Error::FetchFailed)
    }
}
