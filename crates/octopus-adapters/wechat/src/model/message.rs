//! Provider message types.
//!
//! Messages arrive from the web chat client with PascalCase keys and numeric
//! type codes:
//!
//! ```json
//! {"MsgId": "5517", "MsgType": 1, "AppMsgType": 0, "Content": "hello",
//!  "FromUserName": "@a1", "ToUserName": "@b2", "CreateTime": 1700000000}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of session-scoped group usernames.
pub const GROUP_PREFIX: &str = "@@";

// =============================================================================
// Message Type
// =============================================================================

/// Top-level message type (`MsgType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum MsgType {
    Text,
    Image,
    Voice,
    Verify,
    PossibleFriend,
    ShareCard,
    Video,
    Emoticon,
    Location,
    App,
    Voip,
    StatusNotify,
    VoipNotify,
    VoipInvite,
    MicroVideo,
    SysNotice,
    Sys,
    Recalled,
    Other(i32),
}

impl MsgType {
    /// Returns the wire code.
    pub fn code(self) -> i32 {
        match self {
            Self::Text => 1,
            Self::Image => 3,
            Self::Voice => 34,
            Self::Verify => 37,
            Self::PossibleFriend => 40,
            Self::ShareCard => 42,
            Self::Video => 43,
            Self::Emoticon => 47,
            Self::Location => 48,
            Self::App => 49,
            Self::Voip => 50,
            Self::StatusNotify => 51,
            Self::VoipNotify => 52,
            Self::VoipInvite => 53,
            Self::MicroVideo => 62,
            Self::SysNotice => 9999,
            Self::Sys => 10000,
            Self::Recalled => 10002,
            Self::Other(code) => code,
        }
    }

    /// Returns the symbolic name, e.g. `MsgTypeVoip`.
    pub fn name(self) -> String {
        let name = match self {
            Self::Text => "MsgTypeText",
            Self::Image => "MsgTypeImage",
            Self::Voice => "MsgTypeVoice",
            Self::Verify => "MsgTypeVerify",
            Self::PossibleFriend => "MsgTypePossibleFriend",
            Self::ShareCard => "MsgTypeShareCard",
            Self::Video => "MsgTypeVideo",
            Self::Emoticon => "MsgTypeEmoticon",
            Self::Location => "MsgTypeLocation",
            Self::App => "MsgTypeApp",
            Self::Voip => "MsgTypeVoip",
            Self::StatusNotify => "MsgTypeStatusNotify",
            Self::VoipNotify => "MsgTypeVoipNotify",
            Self::VoipInvite => "MsgTypeVoipInvite",
            Self::MicroVideo => "MsgTypeMicroVideo",
            Self::SysNotice => "MsgTypeSysNotice",
            Self::Sys => "MsgTypeSys",
            Self::Recalled => "MsgTypeRecalled",
            Self::Other(code) => return format!("MsgType({code})"),
        };
        name.to_string()
    }
}

impl From<i32> for MsgType {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::Text,
            3 => Self::Image,
            34 => Self::Voice,
            37 => Self::Verify,
            40 => Self::PossibleFriend,
            42 => Self::ShareCard,
            43 => Self::Video,
            47 => Self::Emoticon,
            48 => Self::Location,
            49 => Self::App,
            50 => Self::Voip,
            51 => Self::StatusNotify,
            52 => Self::VoipNotify,
            53 => Self::VoipInvite,
            62 => Self::MicroVideo,
            9999 => Self::SysNotice,
            10000 => Self::Sys,
            10002 => Self::Recalled,
            other => Self::Other(other),
        }
    }
}

impl From<MsgType> for i32 {
    fn from(value: MsgType) -> Self {
        value.code()
    }
}

impl Default for MsgType {
    fn default() -> Self {
        Self::Other(0)
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

// =============================================================================
// App Message Type
// =============================================================================

/// Sub-type of [`MsgType::App`] messages (`AppMsgType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum AppMsgType {
    /// Plain link card.
    Link,
    Image,
    Audio,
    Video,
    Url,
    /// File attachment.
    Attach,
    Open,
    /// Custom sticker.
    Emoji,
    /// Forwarded chat history.
    Forward,
    MiniProgram,
    /// Channels video post.
    FinderFeed,
    Quote,
    /// Channels live stream.
    FinderLive,
    Transfer,
    RedEnvelope,
    Other(i32),
}

impl AppMsgType {
    /// Returns the wire code.
    pub fn code(self) -> i32 {
        match self {
            Self::Link => 1,
            Self::Image => 2,
            Self::Audio => 3,
            Self::Video => 4,
            Self::Url => 5,
            Self::Attach => 6,
            Self::Open => 7,
            Self::Emoji => 8,
            Self::Forward => 19,
            Self::MiniProgram => 33,
            Self::FinderFeed => 51,
            Self::Quote => 57,
            Self::FinderLive => 63,
            Self::Transfer => 2000,
            Self::RedEnvelope => 2001,
            Self::Other(code) => code,
        }
    }
}

impl From<i32> for AppMsgType {
    fn from(code: i32) -> Self {
        match code {
            1 => Self::Link,
            2 => Self::Image,
            3 => Self::Audio,
            4 => Self::Video,
            5 => Self::Url,
            6 => Self::Attach,
            7 => Self::Open,
            8 => Self::Emoji,
            19 => Self::Forward,
            33 => Self::MiniProgram,
            51 => Self::FinderFeed,
            57 => Self::Quote,
            63 => Self::FinderLive,
            2000 => Self::Transfer,
            2001 => Self::RedEnvelope,
            other => Self::Other(other),
        }
    }
}

impl From<AppMsgType> for i32 {
    fn from(value: AppMsgType) -> Self {
        value.code()
    }
}

impl Default for AppMsgType {
    fn default() -> Self {
        Self::Other(0)
    }
}

// =============================================================================
// Message
// =============================================================================

/// A message received from the provider session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WechatMessage {
    pub msg_id: String,
    pub msg_type: MsgType,
    pub app_msg_type: AppMsgType,
    pub content: String,
    pub from_user_name: String,
    pub to_user_name: String,
    /// Seconds since the Unix epoch.
    pub create_time: i64,
    pub file_name: String,
    pub media_id: String,
}

impl WechatMessage {
    /// Returns true if the message carries a downloadable file.
    pub fn has_file(&self) -> bool {
        match self.msg_type {
            MsgType::Image
            | MsgType::Voice
            | MsgType::Video
            | MsgType::MicroVideo
            | MsgType::Emoticon => true,
            MsgType::App => self.app_msg_type == AppMsgType::Attach,
            _ => false,
        }
    }

    /// Returns true if `self_user_name` authored the message.
    pub fn is_send_by(&self, self_user_name: &str) -> bool {
        !self_user_name.is_empty() && self.from_user_name == self_user_name
    }

    /// Returns true if the message belongs to a group conversation.
    pub fn is_send_by_group(&self, self_user_name: &str) -> bool {
        self.from_user_name.starts_with(GROUP_PREFIX)
            || (self.is_send_by(self_user_name) && self.to_user_name.starts_with(GROUP_PREFIX))
    }
}
