//! Ordered form parameters
//!
//! The endpoint takes every input as `key=value` pairs, either in the query
//! string of a GET or in the url-encoded body of a POST. List-valued fields
//! are sent by repeating the key once per element (`UID=1&UID=2`), so the
//! parameters are kept as an ordered list of pairs rather than a map.

use std::fmt;
use url::form_urlencoded;

/// An ordered list of form fields.
///
/// # Example
///
/// ```rust
/// use cybozu_office_transport::FormParams;
///
/// let params = FormParams::new()
///     .with("page", "MyFolderMessageSend")
///     .with_all("UID", [17, 27]);
///
/// assert_eq!(params.encode(), "page=MyFolderMessageSend&UID=17&UID=27");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one scalar field.
    pub fn push(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Append one field per element, repeating the key.
    pub fn push_all<I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        for value in values {
            self.push(key, value);
        }
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.push(key, value);
        self
    }

    /// Builder form of [`push_all`](Self::push_all).
    pub fn with_all<I>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.push_all(key, values);
        self
    }

    /// Builder form that appends the field only when a value is present.
    pub fn with_opt<V: fmt::Display>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value recorded for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Whether no field has been added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs (repeated keys count once per element).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Parse a url-encoded string back into ordered pairs.
    ///
    /// Used for query strings scraped out of page links.
    pub fn parse(encoded: &str) -> Self {
        let pairs = form_urlencoded::parse(encoded.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }
}

impl<K, V> FromIterator<(K, V)> for FormParams
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FormParams
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Extend<(String, String)> for FormParams {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.pairs.extend(iter);
    }
}
