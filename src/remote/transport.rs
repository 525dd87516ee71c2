//! HTTP transport for the remote fetchers

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::error::{FetchError, Result, excerpt};

/// Network seam used by every fetcher. Implementations return the response
/// body of a successful GET and a [`FetchError`] for anything else.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("atcoder-cli/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// reqwest-backed transport. Requests are made once; failures are reported,
/// never retried.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!(url, "Sending request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: if e.is_timeout() {
                    "connection timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: format!("failed to read body: {}", e),
        })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                excerpt: excerpt(&body),
            });
        }

        debug!(url, size = body.len(), "Request completed");
        Ok(body)
    }
}
