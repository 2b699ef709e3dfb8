//! Bulletin boards

use std::sync::Arc;

use cybozu_office_transport::{FormParams, Transport};

use crate::{
    DEFAULT_GROUP_NAME, EDIT_MODE_TEXT, error::Result, types::BulletinComment,
};

const PAGE_PREFIX: &str = "Bulletin";

/// Bulletins resource.
#[derive(Clone)]
pub struct Bulletins {
    transport: Arc<Transport>,
}

impl Bulletins {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Post a comment on a bulletin.
    pub async fn add_comment(&self, comment: BulletinComment) -> Result<()> {
        self.transport.post(comment_form(&comment)).await?;
        Ok(())
    }
}

fn comment_form(comment: &BulletinComment) -> FormParams {
    FormParams::new()
        .with("page", format!("Ajax{}FollowAdd", PAGE_PREFIX))
        .with("EditMode", EDIT_MODE_TEXT)
        .with("Group", comment.group.as_deref().unwrap_or(DEFAULT_GROUP_NAME))
        .with("Data", &comment.data)
        .with("BID", &comment.bid)
}
