//! Session-aware HTTP transport for Cybozu Office 10
//!
//! Every page of the office groupware is reached through one CGI endpoint
//! (`.../ag.cgi?page=...`). This crate owns the plumbing page clients share:
//! login, the `AGSESSID` session cookie, the per-session CSRF ticket,
//! upstream error headers and the one-shot re-login when a session expires.
//!
//! # Architecture
//!
//! - **[`HttpAdapter`]**: one raw HTTP exchange, no redirects followed
//! - **[`ReqwestAdapter`]**: the default adapter
//! - **[`Transport`]**: the session state machine callers use
//! - **[`FormParams`]**: ordered form/query parameters with repeated keys
//!
//! # Usage
//!
//! ```rust,no_run
//! use cybozu_office_transport::{FormParams, GetOptions, Transport};
//!
//! # async fn example() -> cybozu_office_transport::Result<()> {
//! let transport = Transport::builder()
//!     .base_url("https://office.example.com/scripts/office10/ag.cgi")
//!     .id("17", "password")
//!     .build()?;
//!
//! let html = transport
//!     .get(GetOptions::query(FormParams::new().with("page", "MyFolderIndex")))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod form;
pub mod http;
pub mod observability;
pub mod session;
pub mod traits;
pub mod transport;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use form::FormParams;
pub use http::{AdapterConfig, ReqwestAdapter};
pub use session::{Credentials, LoginIdentity, SessionCredentials};
pub use traits::{HttpAdapter, HttpRequest, HttpResponse};
pub use transport::{
    DEFAULT_CSRF_PAGE, Encoding, FORM_CONTENT_TYPE, GetOptions, ResponseType, Transport,
    TransportBuilder,
};

/// Crate version, used in the default `User-Agent`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
