//! HTTP client wrapper
//!
//! Requests are made once. Audio that fails to load is skipped by the
//! engine, so nothing here retries.

use crate::error::{NetworkError, NetworkResult};
use futures::StreamExt;
use reqwest::{Client as ReqwestClient, Response};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Honor proxy settings from the environment
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("Tilawah/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
            use_system_proxy: true,
        }
    }
}

/// HTTP client shared by the warmer and the preview sink
#[derive(Clone)]
pub struct Client {
    inner: ReqwestClient,
    config: ClientConfig,
}

impl Client {
    /// Creates a new client with default configuration
    pub fn new() -> NetworkResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> NetworkResult<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let inner = builder.build().map_err(NetworkError::Http)?;
        Ok(Self { inner, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs a GET request, failing on a non-success status
    pub async fn get(&self, url: &str) -> NetworkResult<Response> {
        let response = self.inner.get(Self::parse(url)?).send().await?;
        Self::check_status(url, response)
    }

    /// Performs a HEAD request, failing on a non-success status
    pub async fn head(&self, url: &str) -> NetworkResult<Response> {
        let response = self.inner.head(Self::parse(url)?).send().await?;
        Self::check_status(url, response)
    }

    /// Checks that a resource can be loaded without downloading it
    pub async fn probe(&self, url: &str) -> NetworkResult<()> {
        self.head(url).await?;
        Ok(())
    }

    /// Downloads a resource and discards it, returning its size
    ///
    /// Used to pull audio into intermediate caches ahead of playback.
    pub async fn fetch_discard(&self, url: &str) -> NetworkResult<u64> {
        let response = self.get(url).await?;
        let mut stream = response.bytes_stream();
        let mut total = 0u64;

        while let Some(chunk) = stream.next().await {
            total += chunk?.len() as u64;
        }
        Ok(total)
    }

    /// Checks if a URL is accessible
    pub async fn is_accessible(&self, url: &str) -> bool {
        self.probe(url).await.is_ok()
    }

    fn parse(url: &str) -> NetworkResult<reqwest::Url> {
        reqwest::Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", url, e)))
    }

    fn check_status(url: &str, response: Response) -> NetworkResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}
