//! Message (personal folder) types

use cybozu_office_transport::FormParams;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Identifies one message: its database id (`DBID`) and document id (`MID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    /// Database id (`mDBID` in links, `DBID` in forms)
    pub db_id: u64,
    /// Document id (`mDID` in links, `MID` in forms)
    pub doc_id: u64,
}

impl MessageRef {
    /// Create a new message reference.
    pub fn new(db_id: u64, doc_id: u64) -> Self {
        Self { db_id, doc_id }
    }
}

/// Options for sending a new message.
///
/// # Example
///
/// ```rust
/// use cybozu_office::types::MessageSendOptions;
///
/// let options = MessageSendOptions::builder()
///     .subject("Weekly report")
///     .data("See attached.")
///     .uid_list(vec![17u64, 27])
///     .build()
///     .unwrap();
/// assert_eq!(options.editable_by_receivers, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(error = "crate::Error"))]
pub struct MessageSendOptions {
    /// Subject line
    pub subject: String,

    /// Body text
    pub data: String,

    /// Receiver user ids
    pub uid_list: Vec<u64>,

    /// Sender group name shown to receivers
    #[builder(default, setter(strip_option, into))]
    pub group: Option<String>,

    /// Whether receivers may edit the message (1) or not (0)
    #[builder(default = "1")]
    pub editable_by_receivers: u8,

    /// Ask receivers to confirm reading (1) or not (0)
    #[builder(default = "0")]
    pub use_confirm: u8,

    /// Allow one-click replies (1) or not (0)
    #[builder(default = "1")]
    pub simple_reply_enable: u8,
}

impl MessageSendOptions {
    /// Create a builder for constructing send options.
    pub fn builder() -> MessageSendOptionsBuilder {
        MessageSendOptionsBuilder::default()
    }
}

/// Options for editing an existing message.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(error = "crate::Error"))]
pub struct MessageModifyOptions {
    /// Message to edit
    pub message: MessageRef,

    /// New subject line
    pub subject: String,

    /// New body text
    pub data: String,

    /// Sender group name shown to receivers
    #[builder(default, setter(strip_option, into))]
    pub group: Option<String>,

    /// Whether receivers may edit the message (1) or not (0)
    #[builder(default = "1")]
    pub editable_by_receivers: u8,

    /// Ask receivers to confirm reading (1) or not (0)
    #[builder(default = "0")]
    pub use_confirm: u8,

    /// Allow one-click replies (1) or not (0)
    #[builder(default = "1")]
    pub simple_reply_enable: u8,
}

impl MessageModifyOptions {
    /// Create a builder for constructing modify options.
    pub fn builder() -> MessageModifyOptionsBuilder {
        MessageModifyOptionsBuilder::default()
    }
}

/// A comment ("follow") on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id (`FRID`)
    pub follow_id: u64,
    /// Display name of the author
    pub user_name: String,
    /// First attached file, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

/// A file attached to a comment, as linked from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name, decoded from the link's last path segment
    pub file: String,
    /// Decoded query pairs of the download link (`page=FileDownload`, `id`, ...)
    pub query: Vec<(String, String)>,
}

impl Attachment {
    /// Value of one query parameter of the download link.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The link's query, ready to pass to a file download.
    pub fn download_query(&self) -> FormParams {
        self.query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Reaction toggled on a comment through `AjaxSimpleReply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOptions {
    /// Message the comment belongs to
    pub message: MessageRef,
    /// Comment id
    pub follow_id: u64,
    /// Reaction mark (`Value`); the upstream default when absent
    pub mark: Option<String>,
    /// Remove the reaction instead of adding it
    pub cancel: bool,
}

impl ReactionOptions {
    /// Add the default reaction to a comment.
    pub fn new(message: MessageRef, follow_id: u64) -> Self {
        Self {
            message,
            follow_id,
            mark: None,
            cancel: false,
        }
    }

    /// Use a specific reaction mark.
    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.mark = Some(mark.into());
        self
    }

    /// Remove the reaction instead.
    pub fn cancel(mut self) -> Self {
        self.cancel = true;
        self
    }
}
