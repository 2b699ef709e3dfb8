//! Personal folder listings

use std::sync::{Arc, LazyLock};

use cybozu_office_transport::{FormParams, GetOptions, Transport};
use regex::Regex;
use tracing::debug;

use crate::{
    error::{Error, Result},
    types::{FolderId, FolderMessage, SortOrder},
};

const PAGE_PREFIX: &str = "MyFolder";

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)MyFolderMessageView(.*?)profileImage").expect("folder row pattern")
});

static DB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mDBID=(\d+)").expect("mDBID pattern"));

static DOC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mDID=(\d+)").expect("mDID pattern"));

static SUBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)clip8x16\.png" align=absmiddle>(.*?)</a>"#).expect("subject pattern")
});

/// Folders resource.
///
/// Lists the messages of the personal folders. Every listing returns
/// `Ok(None)` when the page shows no message rows at all.
#[derive(Clone)]
pub struct Folders {
    transport: Arc<Transport>,
}

impl Folders {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Messages in the inbox.
    pub async fn inbox(&self, order: SortOrder) -> Result<Option<Vec<FolderMessage>>> {
        self.list(FolderId::Inbox, order).await
    }

    /// Messages in the sent box.
    pub async fn sent(&self, order: SortOrder) -> Result<Option<Vec<FolderMessage>>> {
        self.list(FolderId::Sent, order).await
    }

    /// Drafts.
    pub async fn unsent(&self, order: SortOrder) -> Result<Option<Vec<FolderMessage>>> {
        self.list(FolderId::Unsent, order).await
    }

    /// Messages in a user-created folder.
    pub async fn by_id(&self, folder_id: u64, order: SortOrder) -> Result<Option<Vec<FolderMessage>>> {
        self.list(FolderId::Id(folder_id), order).await
    }

    /// Messages in any folder.
    pub async fn list(&self, folder: FolderId, order: SortOrder) -> Result<Option<Vec<FolderMessage>>> {
        let query = FormParams::new()
            .with("page", format!("{}Index", PAGE_PREFIX))
            .with("FID", folder)
            .with("rv", order.as_param());

        let html = self
            .transport
            .get(GetOptions::query(query))
            .await
            .map_err(|e| Error::from(e).in_operation("Failed to get messages"))?;

        let messages = parse_folder_messages(&html);
        debug!(
            folder = %folder,
            count = messages.as_ref().map_or(0, Vec::len),
            "Parsed folder listing"
        );
        Ok(messages)
    }
}

/// Cut the listing into `MyFolderMessageView ... profileImage` rows.
pub(crate) fn parse_folder_messages(html: &str) -> Option<Vec<FolderMessage>> {
    let messages: Vec<FolderMessage> = ROW_RE
        .captures_iter(html)
        .map(|row| {
            let row = &row[1];
            FolderMessage {
                db_id: capture_number(&DB_ID_RE, row),
                doc_id: capture_number(&DOC_ID_RE, row),
                subject: SUBJECT_RE
                    .captures(row)
                    .map(|caps| caps[1].to_string())
                    .unwrap_or_default(),
            }
        })
        .collect();

    (!messages.is_empty()).then_some(messages)
}

fn capture_number(pattern: &Regex, text: &str) -> Option<u64> {
    pattern.captures(text).and_then(|caps| caps[1].parse().ok())
}
