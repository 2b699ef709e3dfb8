//! User directory

use std::sync::{Arc, LazyLock};

use cybozu_office_transport::{FormParams, GetOptions, Transport};
use regex::Regex;
use scraper::Html;
use tracing::debug;

use super::selector;
use crate::{
    error::{Error, Result},
    types::UserInfo,
};

const PAGE_PREFIX: &str = "UserList";

static UID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)uid=([0-9]+)").expect("uid pattern"));

/// Users resource.
#[derive(Clone)]
pub struct Users {
    transport: Arc<Transport>,
}

impl Users {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// List the members of a group (`GID`).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use cybozu_office::Client;
    /// # async fn example(client: Client) -> cybozu_office::Result<()> {
    /// for member in client.users().group_members(13).await? {
    ///     println!("{} {}", member.uid, member.user_name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn group_members(&self, group_id: u64) -> Result<Vec<UserInfo>> {
        let query = FormParams::new()
            .with("page", format!("{}Index", PAGE_PREFIX))
            .with("GID", group_id);

        let html = self
            .transport
            .get(GetOptions::query(query))
            .await
            .map_err(|e| Error::from(e).in_operation("Failed to get group members"))?;

        parse_user_list(&html).map_err(|e| e.in_operation("Failed to get group members"))
    }
}

/// Scrape `table.dataList` rows: the first cell links to the user (`uid=<n>`).
pub(crate) fn parse_user_list(html: &str) -> Result<Vec<UserInfo>> {
    let document = Html::parse_document(html);
    let links = selector("table.dataList tr > td:nth-child(1) a")?;

    let users: Vec<UserInfo> = document
        .select(&links)
        .filter_map(|link| {
            let uid: u64 = UID_RE
                .captures(link.value().attr("href")?)
                .and_then(|caps| caps[1].parse().ok())?;
            let name = link.text().collect::<String>();
            (uid != 0).then(|| UserInfo::new(uid, name.trim()))
        })
        .collect();

    debug!(count = users.len(), "Parsed user list");
    Ok(users)
}
