//! Transport error types

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while talking to the office endpoint.
///
/// The first three variants form the "office error" family: conditions the
/// upstream system reported, or that made the session unusable. Everything
/// else is a low-level failure of the HTTP exchange itself.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The upstream reported an application error via `X-Cybozu-Error`.
    ///
    /// The value is the opaque error code, carried without interpretation.
    #[error("{0}")]
    Application(String),

    /// A login looked successful but no usable session cookie came back.
    #[error("{0}")]
    SessionCookie(String),

    /// The CSRF bootstrap page did not contain a ticket.
    #[error("Failed to extract CSRF ticket")]
    CsrfTicket,

    /// The response status was neither 200 nor 302.
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out
    #[error("Timeout")]
    Timeout,

    /// Any other failure reported by the HTTP client
    #[error("HTTP error: {0}")]
    Http(String),

    /// The configured base URL (or a derived request URL) is invalid
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header could not be built from the given name or value
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The transport was configured incompletely
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TransportError {
    /// Whether this error belongs to the office error family.
    ///
    /// These are the errors callers see as "the SDK exception": upstream
    /// application errors and session bootstrap failures.
    pub fn is_office_error(&self) -> bool {
        matches!(
            self,
            Self::Application(_) | Self::SessionCookie(_) | Self::CsrfTicket
        )
    }

    /// The upstream error code, if this is an application error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Application(code) => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
