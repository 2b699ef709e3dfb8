//! File downloads

use std::sync::Arc;

use cybozu_office_transport::{GetOptions, Transport};

use crate::{
    error::{Error, Result},
    types::FileDownloadOptions,
};

/// Files resource.
#[derive(Clone)]
pub struct Files {
    transport: Arc<Transport>,
}

impl Files {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Download a file and return its decoded, trimmed contents.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use cybozu_office::{Client, FormParams, transport::Encoding, types::FileDownloadOptions};
    /// # async fn example(client: Client) -> cybozu_office::Result<()> {
    /// let query = FormParams::new()
    ///     .with("page", "FileDownload")
    ///     .with("id", 1712074);
    /// let csv = client
    ///     .files()
    ///     .download(FileDownloadOptions::new("members.csv", query).with_encoding(Encoding::ShiftJis))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download(&self, options: FileDownloadOptions) -> Result<String> {
        let FileDownloadOptions {
            path,
            query,
            encoding,
        } = options;

        self.transport
            .get(GetOptions::file(path, query, encoding))
            .await
            .map_err(|e| Error::from(e).in_operation("Failed to download file"))
    }
}
