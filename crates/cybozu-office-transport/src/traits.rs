//! Adapter trait and the request/response values it exchanges
//!
//! An [`HttpAdapter`] performs exactly one HTTP exchange. It must not follow
//! redirects and must not judge status codes: the session transport needs to
//! see a login `302` and its `Set-Cookie` headers untouched.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::fmt;
use url::Url;

/// HTTP request specification
///
/// Represents one request to be sent through an [`HttpAdapter`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET or POST for this endpoint)
    pub method: Method,

    /// Fully built request URL, query string included
    pub url: Url,

    /// Request headers
    pub headers: HeaderMap,

    /// Request body (optional)
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Add a header to the request
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value contains invalid characters.
    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        let name = key.parse::<HeaderName>().map_err(|e| {
            crate::error::TransportError::InvalidHeader(format!("'{}': {}", key, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            crate::error::TransportError::InvalidHeader(format!("value for '{}': {}", key, e))
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Set the request body
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The request body as text, for inspection in logs and tests.
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Look up a query parameter of the request URL.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Look up a form field of a url-encoded request body.
    pub fn form_param(&self, key: &str) -> Option<String> {
        let body = self.body.as_deref()?;
        url::form_urlencoded::parse(body)
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// HTTP response
///
/// Headers are kept as a [`HeaderMap`] so repeated headers such as
/// `Set-Cookie` survive intact.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: StatusCode,

    /// Response headers
    pub headers: HeaderMap,

    /// Raw response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the first value of a header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get every value of a repeated header, in arrival order
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// The body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A pluggable HTTP exchange.
///
/// The default implementation is [`crate::http::ReqwestAdapter`]. Tests and
/// embedders can supply their own to script upstream behaviour.
#[async_trait]
pub trait HttpAdapter: Send + Sync + fmt::Debug {
    /// Send one request and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O level failures (connect, timeout, ...).
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Get the adapter name for debugging/logging.
    fn adapter_name(&self) -> &'static str;
}
