//! User directory types

use serde::{Deserialize, Serialize};

/// A user as listed in the directory or a receiver list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User id (`UID`)
    pub uid: u64,
    /// Display name
    pub user_name: String,
}

impl UserInfo {
    /// Create a new user entry.
    pub fn new(uid: u64, user_name: impl Into<String>) -> Self {
        Self {
            uid,
            user_name: user_name.into(),
        }
    }
}
