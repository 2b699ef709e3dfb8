//! # Cybozu Office SDK
//!
//! Unofficial Rust client for the Cybozu Office 10 groupware, supporting:
//! - Personal folder messages (send, edit, delete, move)
//! - Message comments, reactions and receivers
//! - Folder listings and the user directory
//! - File downloads, including Shift_JIS encoded files
//! - Bulletin board comments
//!
//! Session handling (login, CSRF tickets, re-login on expiry) is done by
//! [`transport::Transport`]; page clients only build forms and scrape pages.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cybozu_office::{Client, types::{MessageSendOptions, SortOrder}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .base_url("https://office.example.com/scripts/office10/ag.cgi")
//!         .account("takahashi")
//!         .password("password")
//!         .build()?;
//!
//!     client
//!         .messages()
//!         .send(
//!             MessageSendOptions::builder()
//!                 .subject("Hello")
//!                 .data("From Rust")
//!                 .uid_list(vec![17u64])
//!                 .build()?,
//!         )
//!         .await?;
//!
//!     if let Some(inbox) = client.folders().inbox(SortOrder::Descending).await? {
//!         for message in inbox {
//!             println!("{}", message.subject);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use cybozu_office_transport::FormParams;

/// The session transport this SDK is built on.
pub use cybozu_office_transport as transport;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod types;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use cybozu_office::prelude::*;
/// ```
pub mod prelude {

    pub use crate::{
        Client, ClientConfig, Error, FormParams, Result,
        types::{
            BulletinComment, Comment, FileDownloadOptions, FolderId, FolderMessage,
            MessageModifyOptions, MessageRef, MessageSendOptions, ReactionOptions, SortOrder,
            UserInfo,
        },
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sender group name used when a form does not name one.
pub const DEFAULT_GROUP_NAME: &str = "サイボウズ Bot";

/// `EditMode` value for plain-text bodies.
pub const EDIT_MODE_TEXT: u8 = 0;
