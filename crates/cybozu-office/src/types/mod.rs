//! Request options and scraped models for the page clients

pub mod bulletin;
pub mod file;
pub mod folder;
pub mod message;
pub mod user;

pub use bulletin::BulletinComment;
pub use file::FileDownloadOptions;
pub use folder::{FolderId, FolderMessage, SortOrder};
pub use message::{
    Attachment, Comment, MessageModifyOptions, MessageModifyOptionsBuilder, MessageRef,
    MessageSendOptions, MessageSendOptionsBuilder, ReactionOptions,
};
pub use user::UserInfo;
