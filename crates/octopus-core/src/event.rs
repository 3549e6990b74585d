//! The canonical event envelope.
//!
//! Every limb converts its provider messages into [`CanonicalEvent`]s and
//! accepts [`CanonicalEvent`]s back as outbound commands.
//!
//! # Wire Shape
//!
//! ```text
//! {
//!   "vendor":    { "type": "wechat", "uid": "..." },
//!   "id":        "...",
//!   "timestamp": 1700000000,
//!   "type":      "photo",
//!   "content":   "...",            (omitted when empty)
//!   "data":      [ { blob }, ... ], (kind dependent, omitted when absent)
//!   "from":      { user },
//!   "chat":      { chat },
//!   "reply":     { "id": "..." }    (revoke only)
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Vendor
// ============================================================================

/// Identifies the provider and the authenticated account behind an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    /// Fixed provider identifier (e.g. `"wechat"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Account id of the authenticated session.
    pub uid: String,
}

impl Vendor {
    /// Creates a vendor descriptor.
    pub fn new(kind: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uid: uid.into(),
        }
    }
}

// ============================================================================
// EventKind
// ============================================================================

/// Canonical event kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Plain text (also used for degraded media placeholders).
    #[default]
    Text,
    /// One or more images.
    Photo,
    /// Voice clip.
    Audio,
    /// Video clip.
    Video,
    /// Generic file attachment.
    File,
    /// Shared link / rich card.
    App,
    /// Voice or video call notice.
    Voip,
    /// A previously sent message was revoked.
    Revoke,
    /// Roster snapshot.
    Sync,
}

impl EventKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Photo => "photo",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::File => "file",
            Self::App => "app",
            Self::Voip => "voip",
            Self::Revoke => "revoke",
            Self::Sync => "sync",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payload Types
// ============================================================================

/// A retrieved binary attachment.
///
/// Resolvers never produce a blob with an empty `binary`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// Display filename (derived or random).
    #[serde(default)]
    pub name: String,
    /// Content type; may be empty when it was not determined.
    #[serde(default)]
    pub mime: String,
    /// Raw bytes, base64 encoded on the wire.
    #[serde(with = "base64_bytes")]
    pub binary: Vec<u8>,
}

impl Blob {
    /// Creates a blob.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, binary: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            binary,
        }
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.binary.len())
            .finish()
    }
}

/// Normalized shared link / card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Publisher or app name.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
}

/// Chat kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    #[default]
    Private,
    Group,
}

/// A private or group conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Provider-native id, stable per contact or group.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    /// Best available display name.
    #[serde(default)]
    pub title: String,
}

impl Chat {
    /// Creates a private chat entry.
    pub fn private(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ChatKind::Private,
            title: title.into(),
        }
    }

    /// Creates a group chat entry.
    pub fn group(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ChatKind::Group,
            title: title.into(),
        }
    }
}

/// The originator of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    /// Nickname.
    #[serde(default)]
    pub username: String,
    /// Display or remark name, falling back to the nickname.
    #[serde(default)]
    pub remark: String,
}

/// Reference to the message a revoke event retracts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyInfo {
    pub id: String,
}

/// Kind dependent event payload.
///
/// The owning event's [`EventKind`] selects the variant when decoding, see
/// [`EventData::decode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventData {
    /// Photo payload: ordered images.
    Blobs(Vec<Blob>),
    /// Sync payload: ordered chats.
    Chats(Vec<Chat>),
    /// Audio, video and file payload.
    Blob(Blob),
    /// App card payload.
    App(AppCard),
}

impl EventData {
    /// Decodes the payload expected for `kind`.
    ///
    /// Photos accept a list or a single image. Kinds without a payload reject
    /// any data.
    pub fn decode(kind: EventKind, raw: serde_json::Value) -> serde_json::Result<Self> {
        use serde::de::Error;

        match kind {
            EventKind::Photo if raw.is_array() => serde_json::from_value(raw).map(Self::Blobs),
            EventKind::Photo | EventKind::Audio | EventKind::Video | EventKind::File => {
                serde_json::from_value(raw).map(Self::Blob)
            }
            EventKind::App => serde_json::from_value(raw).map(Self::App),
            EventKind::Sync => serde_json::from_value(raw).map(Self::Chats),
            EventKind::Text | EventKind::Voip | EventKind::Revoke => Err(
                serde_json::Error::custom(format!("{kind} event carries no data")),
            ),
        }
    }
}

// ============================================================================
// CanonicalEvent
// ============================================================================

/// The vendor-neutral envelope exchanged with the Octopus bus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalEvent {
    pub vendor: Vendor,
    /// Provider message id (inbound) or target-assigned id (acknowledgement).
    #[serde(default)]
    pub id: String,
    /// Seconds or milliseconds since epoch, as supplied by the producer.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Human readable text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EventData>,
    #[serde(default)]
    pub from: User,
    #[serde(default)]
    pub chat: Chat,
    /// Set only for revoke events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyInfo>,
}

impl CanonicalEvent {
    /// Creates an empty text event stamped with vendor, id and timestamp.
    pub fn new(vendor: Vendor, id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            vendor,
            id: id.into(),
            timestamp,
            ..Default::default()
        }
    }

    /// Turns the event into a text event with the given content.
    pub fn set_text(&mut self, content: impl Into<String>) {
        self.kind = EventKind::Text;
        self.content = content.into();
        self.data = None;
    }

    /// Turns the event into a photo event carrying the given images.
    pub fn set_photos(&mut self, blobs: Vec<Blob>) {
        self.kind = EventKind::Photo;
        self.content.clear();
        self.data = Some(EventData::Blobs(blobs));
    }

    /// Turns the event into a single-attachment event of `kind`.
    pub fn set_blob(&mut self, kind: EventKind, blob: Blob) {
        self.kind = kind;
        self.data = Some(EventData::Blob(blob));
    }

    /// Turns the event into an app card event.
    pub fn set_app(&mut self, card: AppCard) {
        self.kind = EventKind::App;
        self.data = Some(EventData::App(card));
    }

    /// Returns the images of a photo payload.
    pub fn blobs(&self) -> Option<&[Blob]> {
        match &self.data {
            Some(EventData::Blobs(blobs)) => Some(blobs),
            _ => None,
        }
    }

    /// Returns the attachment of a single-blob payload.
    pub fn blob(&self) -> Option<&Blob> {
        match &self.data {
            Some(EventData::Blob(blob)) => Some(blob),
            _ => None,
        }
    }

    /// Returns the app card payload.
    pub fn app(&self) -> Option<&AppCard> {
        match &self.data {
            Some(EventData::App(card)) => Some(card),
            _ => None,
        }
    }

    /// Returns the chats of a sync payload.
    pub fn chats(&self) -> Option<&[Chat]> {
        match &self.data {
            Some(EventData::Chats(chats)) => Some(chats),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for CanonicalEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            vendor: Vendor,
            #[serde(default)]
            id: String,
            #[serde(default)]
            timestamp: i64,
            #[serde(rename = "type")]
            kind: EventKind,
            #[serde(default)]
            content: String,
            #[serde(default)]
            data: Option<serde_json::Value>,
            #[serde(default)]
            from: User,
            #[serde(default)]
            chat: Chat,
            #[serde(default)]
            reply: Option<ReplyInfo>,
        }

        let wire = Wire::deserialize(deserializer)?;
        let data = wire
            .data
            .map(|raw| EventData::decode(wire.kind, raw))
            .transpose()
            .map_err(serde::de::Error::custom)?;

        Ok(Self {
            vendor: wire.vendor,
            id: wire.id,
            timestamp: wire.timestamp,
            kind: wire.kind,
            content: wire.content,
            data,
            from: wire.from,
            chat: wire.chat,
            reply: wire.reply,
        })
    }
}

/// Acknowledgement returned for a delivered outbound event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Id assigned by the provider to the sent message.
    pub id: String,
    /// Unix seconds at which the send completed.
    pub timestamp: i64,
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_photo_event_wire_shape() {
        let mut event = CanonicalEvent::new(Vendor::new("wechat", "u1"), "42", 1_700_000_000);
        event.set_photos(vec![Blob::new("a.png", "image/png", vec![1, 2, 3])]);
        event.chat = Chat::group("g1", "Group");

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "photo");
        assert_eq!(value["vendor"]["type"], "wechat");
        assert_eq!(value["data"][0]["binary"], "AQID");
        assert_eq!(value["chat"]["type"], "group");
        assert!(value.get("content").is_none());
        assert!(value.get("reply").is_none());
    }

    #[test]
    fn test_outbound_event_deserializes_payloads() {
        let file: CanonicalEvent = serde_json::from_value(json!({
            "vendor": { "type": "wechat", "uid": "u1" },
            "type": "file",
            "chat": { "id": "c1", "type": "private" },
            "data": { "name": "a.txt", "mime": "text/plain", "binary": "aGk=" }
        }))
        .unwrap();
        assert_eq!(file.kind, EventKind::File);
        assert_eq!(file.blob().unwrap().binary, b"hi");

        let app: CanonicalEvent = serde_json::from_value(json!({
            "vendor": { "type": "wechat", "uid": "u1" },
            "type": "app",
            "data": { "title": "t", "url": "https://example.com" }
        }))
        .unwrap();
        assert_eq!(app.app().unwrap().url, "https://example.com");

        let bare: CanonicalEvent = serde_json::from_value(json!({
            "vendor": { "type": "wechat", "uid": "u1" },
            "type": "video"
        }))
        .unwrap();
        assert!(bare.blob().is_none());
    }

    #[test]
    fn test_payload_is_decoded_by_type() {
        let corrupt = serde_json::from_value::<CanonicalEvent>(json!({
            "vendor": { "type": "wechat", "uid": "u1" },
            "type": "file",
            "data": { "name": "a.txt", "binary": "!!not base64!!" }
        }));
        assert!(corrupt.is_err());

        let text_with_data = serde_json::from_value::<CanonicalEvent>(json!({
            "vendor": { "type": "wechat", "uid": "u1" },
            "type": "text",
            "data": { "title": "t" }
        }));
        assert!(text_with_data.is_err());

        let photo: CanonicalEvent = serde_json::from_value(json!({
            "vendor": { "type": "wechat", "uid": "u1" },
            "type": "photo",
            "data": { "name": "a.png", "binary": "AQID" }
        }))
        .unwrap();
        assert_eq!(photo.blob().unwrap().binary, vec![1, 2, 3]);

        let sync: CanonicalEvent = serde_json::from_value(json!({
            "vendor": { "type": "wechat", "uid": "u1" },
            "type": "sync",
            "data": [{ "id": "c1", "type": "group", "title": "G" }]
        }))
        .unwrap();
        assert_eq!(sync.chats().unwrap()[0].kind, ChatKind::Group);
    }

    #[test]
    fn test_set_text_clears_payload() {
        let mut event = CanonicalEvent::default();
        event.set_blob(EventKind::Audio, Blob::new("v.mp3", "audio/mpeg", vec![0]));
        event.set_text("[placeholder]");
        assert_eq!(event.kind, EventKind::Text);
        assert!(event.data.is_none());
    }
}
