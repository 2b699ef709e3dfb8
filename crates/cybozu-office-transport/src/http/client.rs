//! Reqwest-backed adapter
//!
//! Implements [`HttpAdapter`] with a reqwest client configured for the office
//! endpoint: redirects are never followed and every status is handed back.

use crate::error::{Result, TransportError};
use crate::traits::{HttpAdapter, HttpRequest, HttpResponse};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;

/// Default HTTP adapter
///
/// Handles the low-level exchange with:
/// - Redirects disabled (a login `302` carries the session cookie)
/// - Connection pooling
/// - Timeout handling
/// - Optional acceptance of self-signed certificates
#[derive(Debug, Clone)]
pub struct ReqwestAdapter {
    client: Arc<ReqwestClient>,
    timeout: Duration,
}

impl ReqwestAdapter {
    /// Create a new adapter with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(AdapterConfig::default())
    }

    /// Create a new adapter with custom configuration
    pub fn with_config(config: AdapterConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .redirect(Policy::none())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            timeout: config.timeout,
        })
    }

    /// The per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpAdapter for ReqwestAdapter {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut req = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, headers, body))
    }

    fn adapter_name(&self) -> &'static str {
        "reqwest"
    }
}

/// Low-level HTTP client configuration
#[derive(Clone, Debug)]
pub struct AdapterConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Accept invalid TLS certificates (self-signed intranet installs)
    pub accept_invalid_certs: bool,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            accept_invalid_certs: false,
            user_agent: format!("cybozu-office-rust/{}", crate::VERSION),
        }
    }
}
