//! Structured logging for requests and session lifecycle
//!
//! Every exchange with the endpoint is logged through this layer. Cookie
//! values, CSRF tickets and passwords never reach a log line; only the
//! `page` parameter, sizes and timings do.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What a request was for, as far as the logs are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPurpose {
    /// The login submission
    Login,
    /// Fetching the CSRF bootstrap page
    CsrfTicket,
    /// A caller's request
    Call,
}

impl RequestPurpose {
    /// Short label used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::CsrfTicket => "csrf",
            Self::Call => "call",
        }
    }
}

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST)
    pub method: String,
    /// `page` parameter of the request, if any
    pub page: Option<String>,
    /// Why the request was sent
    pub purpose: RequestPurpose,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, purpose: RequestPurpose) -> Self {
        Self {
            method: method.into(),
            page: None,
            purpose,
            body_size: None,
        }
    }

    /// Set the page name
    pub fn with_page(mut self, page: Option<&str>) -> Self {
        self.page = page.map(str::to_string);
        self
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log request being sent
    pub fn log_request(&self) {
        debug!(
            method = %self.method,
            page = self.page.as_deref().unwrap_or("-"),
            purpose = self.purpose.as_str(),
            body_size = self.body_size,
            "Sending office request"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Response body size in bytes
    pub body_size: usize,
    /// Time elapsed for the exchange
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, body_size: usize, elapsed: Duration) -> Self {
        Self {
            status,
            body_size,
            elapsed,
        }
    }

    /// Log successful response
    pub fn log_success(&self, request: &RequestMetadata) {
        debug!(
            method = %request.method,
            page = request.page.as_deref().unwrap_or("-"),
            purpose = request.purpose.as_str(),
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            body_size = self.body_size,
            "Office request succeeded"
        );
    }

    /// Log failed response
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            method = %request.method,
            page = request.page.as_deref().unwrap_or("-"),
            purpose = request.purpose.as_str(),
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            error = %error,
            "Office request failed"
        );
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Log a login attempt
pub fn log_login_started(identity_kind: &str) {
    info!(identity = identity_kind, "Logging in to office");
}

/// Log that a new session was established
pub fn log_session_established() {
    info!("Office session established");
}

/// Log that a CSRF ticket was acquired for the current session
pub fn log_csrf_acquired() {
    debug!("CSRF ticket acquired");
}

/// Log a downloaded file being decoded
pub fn log_file_decoded(encoding: &str, body_size: usize) {
    debug!(encoding, body_size, "Decoding downloaded file");
}

/// Log a transparent re-authentication
pub fn log_session_refresh() {
    info!("Session expired, logging in again and retrying once");
}

/// Log that a concurrent caller already refreshed the session
pub fn log_session_already_refreshed() {
    debug!("Session was refreshed by a concurrent call, retrying with it");
}
