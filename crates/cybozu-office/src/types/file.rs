//! File download types

use cybozu_office_transport::{Encoding, FormParams};

/// Options for downloading a stored file.
///
/// The upstream serves downloads at `ag.cgi/<file name>?page=FileDownload&...`.
#[derive(Debug, Clone)]
pub struct FileDownloadOptions {
    /// File name path segment
    pub path: String,
    /// Download query (`page`, `id`, `mDBID`, ...)
    pub query: FormParams,
    /// Encoding of the file contents
    pub encoding: Encoding,
}

impl FileDownloadOptions {
    /// Download `path` with the given query, decoding as UTF-8.
    pub fn new(path: impl Into<String>, query: FormParams) -> Self {
        Self {
            path: path.into(),
            query,
            encoding: Encoding::Utf8,
        }
    }

    /// Decode the contents with another encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}
