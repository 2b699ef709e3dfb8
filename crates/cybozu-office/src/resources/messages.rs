//! Personal folder messages

use std::sync::{Arc, LazyLock};

use cybozu_office_transport::{FormParams, GetOptions, Transport};
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::selector;
use crate::{
    DEFAULT_GROUP_NAME, EDIT_MODE_TEXT,
    error::Result,
    types::{
        Attachment, Comment, MessageModifyOptions, MessageRef, MessageSendOptions,
        ReactionOptions, UserInfo,
    },
};

const PAGE_PREFIX: &str = "MyFolderMessage";

/// Label of the confirm button on edit forms.
const SUBMIT_MODIFY: &str = "変更する";

/// Label of the confirm button on the delete form.
const SUBMIT_DELETE: &str = "移動する";

static FOLLOW_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)follow-root-([0-9]+)").expect("follow id pattern"));

/// Messages resource.
///
/// Sends, edits and deletes messages in the personal folder, and manages
/// their comments and receivers.
#[derive(Clone)]
pub struct Messages {
    transport: Arc<Transport>,
}

impl Messages {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Send a new message.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use cybozu_office::{Client, types::MessageSendOptions};
    /// # async fn example(client: Client) -> cybozu_office::Result<()> {
    /// let options = MessageSendOptions::builder()
    ///     .subject("Weekly report")
    ///     .data("Numbers are in.")
    ///     .uid_list(vec![17u64, 27])
    ///     .build()?;
    ///
    /// client.messages().send(options).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(&self, options: MessageSendOptions) -> Result<()> {
        self.post(send_form(&options)).await
    }

    /// Edit the subject and body of a message.
    pub async fn modify(&self, options: MessageModifyOptions) -> Result<()> {
        self.post(modify_form(&options)).await
    }

    /// Move a message to the trash.
    pub async fn delete(&self, message: MessageRef) -> Result<()> {
        let form = FormParams::new()
            .with("page", format!("{}Delete", PAGE_PREFIX))
            .with("DBID", message.db_id)
            .with("MID", message.doc_id)
            .with("Remove", 1)
            .with("Yes", SUBMIT_DELETE);
        self.post(form).await
    }

    /// Move a message into another folder (`PID`).
    pub async fn move_to(&self, message: MessageRef, folder_id: u64) -> Result<()> {
        let form = FormParams::new()
            .with("page", format!("{}View", PAGE_PREFIX))
            .with("Cancel", 0)
            .with("FRID", 0)
            .with("DBID", message.db_id)
            .with("MID", message.doc_id)
            .with("PID", folder_id);
        self.post(form).await
    }

    /// List the comments on a message.
    ///
    /// `h_id` selects a page of older comments, as the upstream navigation does.
    pub async fn comments(&self, message: MessageRef, h_id: Option<u64>) -> Result<Vec<Comment>> {
        let query = FormParams::new()
            .with("page", format!("Ajax{}FollowNavi", PAGE_PREFIX))
            .with("DBID", message.db_id)
            .with("MID", message.doc_id)
            .with_opt("hid", h_id);

        let html = self.transport.get(GetOptions::query(query)).await?;
        parse_comments(&html)
    }

    /// Post a comment on a message.
    pub async fn send_comment(
        &self,
        message: MessageRef,
        data: &str,
        group: Option<&str>,
    ) -> Result<()> {
        let form = FormParams::new()
            .with("page", format!("Ajax{}FollowAdd", PAGE_PREFIX))
            .with("EditMode", EDIT_MODE_TEXT)
            .with("Group", group.unwrap_or(DEFAULT_GROUP_NAME))
            .with("Data", data)
            .with("DBID", message.db_id)
            .with("MID", message.doc_id);
        self.post(form).await
    }

    /// Delete a comment.
    pub async fn delete_comment(&self, message: MessageRef, follow_id: u64) -> Result<()> {
        let form = FormParams::new()
            .with("page", format!("Ajax{}FollowDelete", PAGE_PREFIX))
            .with("FRID", follow_id)
            .with("DBID", message.db_id)
            .with("MID", message.doc_id);
        self.post(form).await
    }

    /// Add or remove a reaction on a comment.
    pub async fn toggle_reaction(&self, options: ReactionOptions) -> Result<()> {
        let form = FormParams::new()
            .with("page", "AjaxSimpleReply")
            .with("Cancel", u8::from(options.cancel))
            .with("FRID", options.follow_id)
            .with("DBID", options.message.db_id)
            .with("MID", options.message.doc_id)
            .with_opt("Value", options.mark.as_deref());
        self.post(form).await
    }

    /// List the receivers of a message.
    ///
    /// `e_id` is the editing session id shown in the receiver edit link.
    pub async fn receivers(&self, message: MessageRef, e_id: u64) -> Result<Vec<UserInfo>> {
        let query = FormParams::new()
            .with("page", format!("{}ReceiverAdd", PAGE_PREFIX))
            .with("DBID", message.db_id)
            .with("MID", message.doc_id)
            .with("eID", e_id);

        let html = self.transport.get(GetOptions::query(query)).await?;
        parse_receivers(&html)
    }

    /// Replace the receivers of a message.
    pub async fn modify_receivers(
        &self,
        message: MessageRef,
        e_id: u64,
        uid_list: &[u64],
    ) -> Result<()> {
        let form = FormParams::new()
            .with("page", format!("{}ReceiverAdd", PAGE_PREFIX))
            .with_all("UID", uid_list)
            .with("DBID", message.db_id)
            .with("MID", message.doc_id)
            .with("EID", e_id)
            .with("Submit", SUBMIT_MODIFY);
        self.post(form).await
    }

    async fn post(&self, form: FormParams) -> Result<()> {
        self.transport.post(form).await?;
        Ok(())
    }
}

fn send_form(options: &MessageSendOptions) -> FormParams {
    FormParams::new()
        .with("page", format!("{}Send", PAGE_PREFIX))
        .with("Subject", &options.subject)
        .with("Group", options.group.as_deref().unwrap_or(DEFAULT_GROUP_NAME))
        .with("Data", &options.data)
        .with("EditableByReceivers", options.editable_by_receivers)
        .with("UseConfirm", options.use_confirm)
        .with("SimpleReplyEnable", options.simple_reply_enable)
        .with_all("UID", &options.uid_list)
}

fn modify_form(options: &MessageModifyOptions) -> FormParams {
    FormParams::new()
        .with("page", format!("{}Modify", PAGE_PREFIX))
        .with("EditMode", EDIT_MODE_TEXT)
        .with("Cancel", 0)
        .with("FRID", 0)
        .with("Subject", &options.subject)
        .with("Group", options.group.as_deref().unwrap_or(DEFAULT_GROUP_NAME))
        .with("Data", &options.data)
        .with("EditableByReceivers", options.editable_by_receivers)
        .with("UseConfirm", options.use_confirm)
        .with("SimpleReplyEnable", options.simple_reply_enable)
        .with("DBID", options.message.db_id)
        .with("MID", options.message.doc_id)
        .with("Submit", SUBMIT_MODIFY)
}

/// Scrape the comment list (`#Follows > div`).
///
/// Blocks without a `follow-root-<n>` id are skipped.
pub(crate) fn parse_comments(html: &str) -> Result<Vec<Comment>> {
    let document = Html::parse_document(html);
    let follows = selector("#Follows > div")?;
    let user_name = selector(".vr_followUserName")?;
    let attachment_link = selector(".vr_viewContentsAttach td:first-child a")?;

    let comments: Vec<Comment> = document
        .select(&follows)
        .filter_map(|follow| {
            let follow_id = follow
                .value()
                .id()
                .and_then(|id| FOLLOW_ID_RE.captures(id))
                .and_then(|caps| caps[1].parse().ok())?;

            let attachment = follow
                .select(&attachment_link)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(parse_attachment);

            Some(Comment {
                follow_id,
                user_name: collect_text(follow.select(&user_name)),
                attachment,
            })
        })
        .collect();

    debug!(count = comments.len(), "Parsed message comments");
    Ok(comments)
}

/// Split an attachment link (`ag.cgi/<file>?<query>`) into file and query.
///
/// The file segment is decoded; the transport encodes it again on download.
fn parse_attachment(href: &str) -> Attachment {
    let (path, query) = href.split_once('?').unwrap_or((href, ""));
    let file = path.rsplit_once('/').map(|(_, file)| file).unwrap_or("");

    Attachment {
        file: percent_decode_str(file).decode_utf8_lossy().into_owned(),
        query: FormParams::parse(&query.replace("&amp;", "&"))
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    }
}

/// Scrape the receiver picker (`select[name="UID"] > option`), skipping `0`.
pub(crate) fn parse_receivers(html: &str) -> Result<Vec<UserInfo>> {
    let document = Html::parse_document(html);
    let options = selector(r#"select[name="UID"] > option"#)?;

    let receivers: Vec<UserInfo> = document
        .select(&options)
        .filter_map(|option| {
            let uid: u64 = option.value().attr("value")?.trim().parse().ok()?;
            (uid != 0).then(|| UserInfo::new(uid, collect_text([option])))
        })
        .collect();

    debug!(count = receivers.len(), "Parsed message receivers");
    Ok(receivers)
}

fn collect_text<'a>(elements: impl IntoIterator<Item = ElementRef<'a>>) -> String {
    elements
        .into_iter()
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}
