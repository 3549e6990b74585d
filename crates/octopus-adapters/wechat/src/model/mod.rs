//! Provider data model.

pub mod contact;
pub mod descriptor;
pub mod message;

pub use contact::{Contact, FILE_HELPER, find_by_id, find_by_user_name};
pub use descriptor::{Card, MediaData, RevokeDescriptor};
pub use message::{AppMsgType, MsgType, WechatMessage};
