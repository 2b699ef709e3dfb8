//! Personal folder types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Folder to list (`FID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderId {
    /// Received messages
    Inbox,
    /// Sent messages
    Sent,
    /// Drafts
    Unsent,
    /// A user-created folder
    Id(u64),
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderId::Inbox => f.write_str("inbox"),
            FolderId::Sent => f.write_str("sent"),
            FolderId::Unsent => f.write_str("unsent"),
            FolderId::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Listing order (`rv`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first (`rv=0`)
    #[default]
    Descending,
    /// Oldest first (`rv=1`)
    Ascending,
}

impl SortOrder {
    pub(crate) fn as_param(&self) -> u8 {
        match self {
            SortOrder::Descending => 0,
            SortOrder::Ascending => 1,
        }
    }
}

/// One row of a folder listing.
///
/// Ids are `None` when the row's link does not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMessage {
    /// Database id (`mDBID`)
    pub db_id: Option<u64>,
    /// Document id (`mDID`)
    pub doc_id: Option<u64>,
    /// Subject as shown in the listing
    pub subject: String,
}
