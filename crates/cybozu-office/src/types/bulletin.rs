//! Bulletin board types

/// A comment to post on a bulletin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletinComment {
    /// Bulletin id (`BID` in the bulletin URL)
    pub bid: String,
    /// Comment text
    pub data: String,
    /// Sender group name; the SDK default when absent
    pub group: Option<String>,
}

impl BulletinComment {
    /// Create a comment with the default group name.
    pub fn new(bid: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            bid: bid.into(),
            data: data.into(),
            group: None,
        }
    }

    /// Post under a specific group name.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}
