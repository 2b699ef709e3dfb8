//! Error types for the Cybozu Office SDK
//!
//! Transport failures are carried unchanged in [`Error::Transport`]; the SDK
//! only adds the failures that belong to page clients (scraping, invalid
//! options, missing configuration).

use cybozu_office_transport::TransportError;
use thiserror::Error;

/// Result type alias for operations that can fail with an SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Cybozu Office SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised by the session transport.
    ///
    /// Upstream application errors and session bootstrap failures live here
    /// (see [`Error::is_office_error`]).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A page was fetched but its markup could not be scraped.
    #[error("Failed to parse page: {0}")]
    Parse(String),

    /// Invalid request options.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// Context description
        context: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Whether this is an office error: an upstream application error or a
    /// failure to establish the session.
    pub fn is_office_error(&self) -> bool {
        match self {
            Error::Transport(err) => err.is_office_error(),
            _ => false,
        }
    }

    /// The upstream error code (`X-Cybozu-Error`), if any.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Error::Transport(err) => err.error_code(),
            _ => None,
        }
    }

    /// Add context to an error.
    pub fn context<C>(self, context: C) -> Self
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        Error::WithContext {
            context: context.to_string(),
            source: Box::new(self),
        }
    }

    /// Describe a failed page operation.
    ///
    /// Office errors are returned untouched so callers can still match on
    /// the upstream code; anything else is wrapped with `operation`.
    pub(crate) fn in_operation(self, operation: &'static str) -> Self {
        if self.is_office_error() {
            self
        } else {
            self.context(operation)
        }
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Error::InvalidRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_office_errors_pass_through_operation_context() {
        let err = Error::from(TransportError::Application("10101".to_string()))
            .in_operation("Failed to get group members");

        assert!(err.is_office_error());
        assert_eq!(err.error_code(), Some("10101"));
        assert_eq!(err.to_string(), "10101");
    }

    #[test]
    fn test_other_errors_get_operation_context() {
        let err = Error::Parse("no table".to_string()).in_operation("Failed to get messages");

        assert!(!err.is_office_error());
        assert_eq!(err.to_string(), "Failed to get messages: Failed to parse page: no table");
        assert!(matches!(err, Error::WithContext { .. }));
    }

    #[test]
    fn test_transport_io_error_is_not_office_error() {
        let err = Error::from(TransportError::Timeout).in_operation("Failed to download file");
        assert!(!err.is_office_error());
        assert_eq!(err.error_code(), None);
        assert_eq!(err.to_string(), "Failed to download file: Timeout");
    }

    #[test]
    fn test_uninitialized_builder_field() {
        let err: Error = derive_builder::UninitializedFieldError::new("subject").into();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(err.to_string().contains("subject"));
    }
}
