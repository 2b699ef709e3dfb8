//! Page clients
//!
//! Each resource wraps one area of the groupware. They all talk through the
//! client's shared [`Transport`](cybozu_office_transport::Transport).

pub mod bulletins;
pub mod files;
pub mod folders;
pub mod messages;
pub mod users;

pub use bulletins::Bulletins;
pub use files::Files;
pub use folders::Folders;
pub use messages::Messages;
pub use users::Users;

use crate::error::{Error, Result};
use scraper::Selector;

/// Compile a CSS selector, reporting failures as parse errors.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse(format!("invalid selector '{}': {}", css, e)))
}
