//! Inbound classification.
//!
//! Every provider message is mapped to at most one [`CanonicalEvent`]:
//!
//! | `MsgType` | Event | On failure |
//! |-----------|-------|------------|
//! | text, location, sys | text | |
//! | image | photo | image placeholder |
//! | emoticon | photo | sticker placeholder |
//! | voice | audio | voice placeholder |
//! | video | video | video placeholder |
//! | share card | app | dropped |
//! | voip, voip notify, voip invite | voip | |
//! | recalled | revoke | dropped |
//! | app | see [`Classifier::classify_app`] | |
//! | status notify, anything else | dropped | |
//!
//! Download failures degrade to a placeholder text event so the user still
//! learns that something arrived.

use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use octopus_core::{
    AppCard, Blob, CanonicalEvent, Chat, EventKind, ReplyInfo, TransportError, TransportResult,
    User, Vendor,
};
use octopus_transport::{AttachmentResolver, fetch_attachment};

use crate::app::decode_app_card;
use crate::model::{
    AppMsgType, Card, Contact, FILE_HELPER, MediaData, MsgType, RevokeDescriptor, WechatMessage,
    find_by_user_name,
};
use crate::session::ChatSession;
use crate::sticker::fetch_sticker;

/// Text sent in place of content that could not be retrieved or decoded.
pub mod placeholder {
    pub const IMAGE: &str = "[图片下载失败]";
    pub const STICKER: &str = "[表情下载失败]";
    pub const VOICE: &str = "[语音下载失败]";
    pub const VIDEO: &str = "[视频下载失败]";
    pub const FILE: &str = "[文件下载失败]";
    pub const APP: &str = "[应用解析失败]";
}

/// Converts provider messages into canonical events.
pub struct Classifier {
    session: Arc<dyn ChatSession>,
    resolver: AttachmentResolver,
    me: Contact,
    vendor: Vendor,
}

impl Classifier {
    /// Creates a classifier for the account `me`.
    pub fn new(
        session: Arc<dyn ChatSession>,
        resolver: AttachmentResolver,
        me: Contact,
        vendor: Vendor,
    ) -> Self {
        Self {
            session,
            resolver,
            me,
            vendor,
        }
    }

    /// Classifies one message. `None` means the message is dropped.
    #[instrument(
        name = "classify",
        skip_all,
        fields(msg_id = %msg.msg_id, msg_type = %msg.msg_type)
    )]
    pub async fn classify(&self, msg: &WechatMessage) -> Option<CanonicalEvent> {
        if msg.msg_type == MsgType::StatusNotify {
            trace!(msg_id = %msg.msg_id, "Ignoring status notify");
            return None;
        }

        let attachment = if msg.has_file() {
            Some(self.download(msg).await)
        } else {
            None
        };

        let mut event = CanonicalEvent::new(self.vendor.clone(), &msg.msg_id, msg.create_time);
        match msg.msg_type {
            MsgType::Text | MsgType::Location | MsgType::Sys => event.set_text(&msg.content),
            MsgType::Image => attach(&mut event, attachment, EventKind::Photo, placeholder::IMAGE),
            MsgType::Emoticon => {
                attach(&mut event, attachment, EventKind::Photo, placeholder::STICKER)
            }
            MsgType::Voice => attach(&mut event, attachment, EventKind::Audio, placeholder::VOICE),
            MsgType::Video => attach(&mut event, attachment, EventKind::Video, placeholder::VIDEO),
            MsgType::ShareCard => match Card::parse(&msg.content) {
                Ok(card) => event.set_app(AppCard {
                    title: String::new(),
                    description: card.nick_name.clone(),
                    source: card.nick_name,
                    url: card.big_head_img_url,
                }),
                Err(e) => {
                    warn!(msg_id = %msg.msg_id, error = %e, "Failed to parse share card");
                    return None;
                }
            },
            MsgType::Voip | MsgType::VoipNotify | MsgType::VoipInvite => {
                event.kind = EventKind::Voip;
                event.content = msg.msg_type.name();
            }
            MsgType::Recalled => match RevokeDescriptor::parse(&msg.content) {
                Ok(revoke) => {
                    event.kind = EventKind::Revoke;
                    event.content = revoke.replace_msg;
                    event.reply = Some(ReplyInfo {
                        id: revoke.msg_id.to_string(),
                    });
                }
                Err(e) => {
                    warn!(msg_id = %msg.msg_id, error = %e, "Failed to parse revoke message");
                    return None;
                }
            },
            MsgType::App => {
                if !self.classify_app(&mut event, msg, attachment).await {
                    return None;
                }
            }
            other => {
                warn!(msg_id = %msg.msg_id, msg_type = %other, "Message type not supported");
                return None;
            }
        }

        let (from, chat) = self.route(msg).await?;
        event.from = from;
        event.chat = chat;

        debug!(
            id = %event.id,
            kind = %event.kind,
            chat = %event.chat.id,
            "Classified message"
        );
        Some(event)
    }

    /// Fills an app message payload. Returns false if the event is dropped.
    ///
    /// | `AppMsgType` | Event | On failure |
    /// |--------------|-------|------------|
    /// | attach | file (eager download) | file placeholder |
    /// | emoji | photo (sticker CDN) | sticker placeholder |
    /// | link, channels video, channels live | app | parse placeholder |
    /// | other | app (generic media data) | dropped |
    async fn classify_app(
        &self,
        event: &mut CanonicalEvent,
        msg: &WechatMessage,
        attachment: Option<TransportResult<Blob>>,
    ) -> bool {
        match msg.app_msg_type {
            AppMsgType::Attach => attach(event, attachment, EventKind::File, placeholder::FILE),
            AppMsgType::Emoji => match fetch_sticker(&self.resolver, &msg.content).await {
                Ok(blob) => event.set_photos(vec![blob]),
                Err(e) => {
                    warn!(msg_id = %msg.msg_id, error = %e, "Failed to download sticker");
                    event.set_text(placeholder::STICKER);
                }
            },
            AppMsgType::Link | AppMsgType::FinderFeed | AppMsgType::FinderLive => {
                match decode_app_card(&msg.content, msg.app_msg_type) {
                    Ok(card) => event.set_app(card),
                    Err(e) => {
                        warn!(msg_id = %msg.msg_id, error = %e, "Failed to parse app message");
                        event.set_text(placeholder::APP);
                    }
                }
            }
            _ => match MediaData::parse(&msg.content) {
                Ok(media) => event.set_app(AppCard {
                    title: media.title,
                    description: media.description,
                    source: media.app_name,
                    url: media.url,
                }),
                Err(e) => {
                    warn!(msg_id = %msg.msg_id, error = %e, "Failed to parse media message");
                    return false;
                }
            },
        }
        true
    }

    async fn download(&self, msg: &WechatMessage) -> TransportResult<Blob> {
        let response = self
            .session
            .get_file(msg)
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        fetch_attachment(response).await
    }

    /// Resolves author and conversation. `None` drops the event.
    async fn route(&self, msg: &WechatMessage) -> Option<(User, Chat)> {
        let group = msg.is_send_by_group(&self.me.user_name);

        if msg.is_send_by(&self.me.user_name) {
            let target = if msg.to_user_name == FILE_HELPER {
                self.session.file_helper()
            } else {
                let members = match self.session.members().await {
                    Ok(members) => members,
                    Err(e) => {
                        warn!(error = %e, "Failed to get members");
                        return None;
                    }
                };
                let Some(target) = find_by_user_name(&members, &msg.to_user_name) else {
                    warn!(to = %msg.to_user_name, "Failed to find chat of sent message");
                    return None;
                };
                target.clone()
            };
            return Some((self.me.to_self_user(), chat_of(&target, group)));
        }

        let counterpart = match self.session.sender(msg).await {
            Ok(contact) => contact,
            Err(e) => {
                warn!(from = %msg.from_user_name, error = %e, "Failed to get sender");
                return None;
            }
        };
        let author = if group {
            match self.session.sender_in_group(msg).await {
                Ok(contact) => contact,
                Err(e) => {
                    warn!(from = %msg.from_user_name, error = %e, "Failed to get sender in group");
                    return None;
                }
            }
        } else {
            counterpart.clone()
        };

        let chat = if group {
            Chat::group(&counterpart.id, counterpart.group_title())
        } else {
            Chat::private(&counterpart.id, author.remark())
        };
        Some((author.to_user(), chat))
    }
}

/// Chat of a message sent by the account itself.
fn chat_of(contact: &Contact, group: bool) -> Chat {
    if group {
        Chat::group(&contact.id, contact.group_title())
    } else {
        Chat::private(&contact.id, contact.title())
    }
}

fn attach(
    event: &mut CanonicalEvent,
    attachment: Option<TransportResult<Blob>>,
    kind: EventKind,
    fallback: &str,
) {
    match attachment {
        Some(Ok(blob)) if kind == EventKind::Photo => event.set_photos(vec![blob]),
        Some(Ok(blob)) => event.set_blob(kind, blob),
        Some(Err(e)) => {
            warn!(id = %event.id, error = %e, "Failed to download attachment");
            event.set_text(fallback);
        }
        None => event.set_text(fallback),
    }
}

#[cfg(test)]
mod tests {
    use octopus_core::{ChatKind, EventData};
    use octopus_transport::HttpClientConfig;

    use super::*;
    use crate::testing::{MockSession, contact, group, record_spans};

    const PNG: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R',
    ];

    fn session() -> MockSession {
        let mut session = MockSession::new();
        let mut alice = contact("alice", "Alice");
        alice.remark_name = "Ali".into();
        session.friends = vec![alice];
        session.groups = vec![group("room", "Room")];
        let mut bob = contact("bob", "Bob");
        bob.display_name = "Bobby".into();
        session.group_members = vec![bob];
        session
    }

    fn classifier(session: MockSession) -> Classifier {
        let me = session.me.clone();
        Classifier::new(
            Arc::new(session),
            AttachmentResolver::new(&HttpClientConfig::default()).unwrap(),
            me,
            Vendor::new("wechat", "self"),
        )
    }

    fn from_alice(msg_type: MsgType, content: &str) -> WechatMessage {
        WechatMessage {
            msg_id: "m1".into(),
            msg_type,
            content: content.into(),
            from_user_name: "@alice".into(),
            to_user_name: "@self".into(),
            create_time: 1_700_000_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_private_text() {
        let event = classifier(session())
            .classify(&from_alice(MsgType::Text, "hello"))
            .await
            .unwrap();

        assert_eq!(event.kind, EventKind::Text);
        assert_eq!(event.content, "hello");
        assert_eq!(event.id, "m1");
        assert_eq!(event.timestamp, 1_700_000_000);
        assert_eq!(event.vendor, Vendor::new("wechat", "self"));
        assert_eq!(event.chat, Chat::private("alice", "Ali"));
        assert_eq!(event.from.id, "alice");
        assert_eq!(event.from.username, "Alice");
        assert_eq!(event.from.remark, "Ali");
    }

    #[tokio::test]
    async fn test_private_chat_title_prefers_display_name() {
        let mut session = session();
        session.friends[0].display_name = "Alice (work)".into();
        let event = classifier(session)
            .classify(&from_alice(MsgType::Text, "hello"))
            .await
            .unwrap();

        assert_eq!(event.chat, Chat::private("alice", "Alice (work)"));
        assert_eq!(event.from.remark, "Alice (work)");
    }

    #[tokio::test]
    async fn test_private_chat_title_falls_back_to_nickname() {
        let mut session = session();
        session.friends[0].remark_name.clear();
        let event = classifier(session)
            .classify(&from_alice(MsgType::Text, "hello"))
            .await
            .unwrap();

        assert_eq!(event.chat.title, "Alice");
    }

    #[tokio::test]
    async fn test_group_message_uses_group_member_as_author() {
        let msg = WechatMessage {
            from_user_name: "@@room".into(),
            content: "@bob:\nhi all".into(),
            ..from_alice(MsgType::Text, "")
        };
        let event = classifier(session()).classify(&msg).await.unwrap();

        assert_eq!(event.chat.kind, ChatKind::Group);
        assert_eq!(event.chat.id, "room");
        assert_eq!(event.chat.title, "Room");
        assert_eq!(event.from.id, "bob");
        assert_eq!(event.from.remark, "Bobby");
    }

    #[tokio::test]
    async fn test_self_sent_message() {
        let msg = WechatMessage {
            from_user_name: "@self".into(),
            to_user_name: "@alice".into(),
            ..from_alice(MsgType::Text, "sent from phone")
        };
        let event = classifier(session()).classify(&msg).await.unwrap();

        assert_eq!(event.from.id, "self");
        assert_eq!(event.from.username, "Me");
        assert_eq!(event.from.remark, "Me");
        assert_eq!(event.chat, Chat::private("alice", "Ali"));
    }

    #[tokio::test]
    async fn test_self_sent_group_message() {
        let msg = WechatMessage {
            from_user_name: "@self".into(),
            to_user_name: "@@room".into(),
            ..from_alice(MsgType::Text, "hi room")
        };
        let event = classifier(session()).classify(&msg).await.unwrap();

        assert_eq!(event.from.id, "self");
        assert_eq!(event.chat, Chat::group("room", "Room"));
        assert_eq!(event.content, "hi room");
    }

    #[tokio::test]
    async fn test_unknown_sender_is_dropped() {
        let msg = WechatMessage {
            from_user_name: "@stranger".into(),
            ..from_alice(MsgType::Text, "hi")
        };
        assert!(classifier(session()).classify(&msg).await.is_none());
    }

    #[tokio::test]
    async fn test_status_notify_and_unknown_types_are_dropped() {
        let classifier = classifier(session());
        assert!(classifier
            .classify(&from_alice(MsgType::StatusNotify, ""))
            .await
            .is_none());
        assert!(classifier
            .classify(&from_alice(MsgType::Verify, ""))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_location_and_sys_pass_through_as_text() {
        let classifier = classifier(session());
        let location = classifier
            .classify(&from_alice(MsgType::Location, "Somewhere:\n<br/>/cgi-bin/map"))
            .await
            .unwrap();
        assert_eq!(location.kind, EventKind::Text);
        assert_eq!(location.content, "Somewhere:\n<br/>/cgi-bin/map");

        let sys = classifier
            .classify(&from_alice(MsgType::Sys, "You were added"))
            .await
            .unwrap();
        assert_eq!(sys.kind, EventKind::Text);
    }

    #[tokio::test]
    async fn test_voip_uses_symbolic_name() {
        let classifier = classifier(session());
        let cases = [
            (MsgType::Voip, "MsgTypeVoip"),
            (MsgType::VoipNotify, "MsgTypeVoipNotify"),
            (MsgType::VoipInvite, "MsgTypeVoipInvite"),
        ];
        for (msg_type, expected) in cases {
            let event = classifier
                .classify(&from_alice(msg_type, "<voipmsg/>"))
                .await
                .unwrap();
            assert_eq!(event.kind, EventKind::Voip);
            assert_eq!(event.content, expected);
        }
    }

    #[tokio::test]
    async fn test_image_download() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/img")
            .with_status(200)
            .with_body(PNG)
            .create_async()
            .await;

        let mut session = session();
        session
            .files
            .insert("m1".into(), format!("{}/img", server.url()));
        let event = classifier(session)
            .classify(&from_alice(MsgType::Image, ""))
            .await
            .unwrap();

        assert_eq!(event.kind, EventKind::Photo);
        let blobs = event.blobs().unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].mime, "image/png");
        assert_eq!(blobs[0].binary, PNG);
    }

    #[tokio::test]
    async fn test_emoticon_download_becomes_photo() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/emoticon")
            .with_status(200)
            .with_body(PNG)
            .create_async()
            .await;

        let mut session = session();
        session
            .files
            .insert("m1".into(), format!("{}/emoticon", server.url()));
        let event = classifier(session)
            .classify(&from_alice(MsgType::Emoticon, ""))
            .await
            .unwrap();

        assert_eq!(event.kind, EventKind::Photo);
        let blobs = event.blobs().unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].binary, PNG);
    }

    #[tokio::test]
    async fn test_micro_video_is_fetched_then_dropped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/micro")
            .with_status(200)
            .with_body("video bytes")
            .expect(1)
            .create_async()
            .await;

        let mut session = session();
        session
            .files
            .insert("m1".into(), format!("{}/micro", server.url()));
        let event = classifier(session)
            .classify(&from_alice(MsgType::MicroVideo, ""))
            .await;

        assert!(event.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_classify_opens_a_span() {
        let (_guard, spans) = record_spans();
        classifier(session())
            .classify(&from_alice(MsgType::Text, "hello"))
            .await
            .unwrap();
        assert!(spans.lock().contains(&"classify"));
    }

    #[tokio::test]
    async fn test_image_server_error_degrades_to_placeholder() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/img")
            .with_status(500)
            .create_async()
            .await;

        let mut session = session();
        session
            .files
            .insert("m1".into(), format!("{}/img", server.url()));
        let event = classifier(session)
            .classify(&from_alice(MsgType::Image, ""))
            .await
            .unwrap();

        assert_eq!(event.kind, EventKind::Text);
        assert_eq!(event.content, placeholder::IMAGE);
        assert!(event.data.is_none());
        assert_eq!(event.chat.id, "alice");
    }

    #[tokio::test]
    async fn test_every_media_branch_has_its_placeholder() {
        let classifier = classifier(session());
        let cases = [
            (MsgType::Image, placeholder::IMAGE),
            (MsgType::Emoticon, placeholder::STICKER),
            (MsgType::Voice, placeholder::VOICE),
            (MsgType::Video, placeholder::VIDEO),
        ];
        for (msg_type, expected) in cases {
            let event = classifier
                .classify(&from_alice(msg_type, ""))
                .await
                .unwrap();
            assert_eq!(event.kind, EventKind::Text, "{msg_type}");
            assert_eq!(event.content, expected, "{msg_type}");
        }

        let attach = WechatMessage {
            app_msg_type: AppMsgType::Attach,
            ..from_alice(MsgType::App, "<msg><appmsg><title>a.pdf</title></appmsg></msg>")
        };
        let event = classifier.classify(&attach).await.unwrap();
        assert_eq!(event.content, placeholder::FILE);

        let sticker = WechatMessage {
            app_msg_type: AppMsgType::Emoji,
            ..from_alice(MsgType::App, "<msg><emoji/></msg>")
        };
        let event = classifier.classify(&sticker).await.unwrap();
        assert_eq!(event.content, placeholder::STICKER);

        let link = WechatMessage {
            app_msg_type: AppMsgType::FinderLive,
            ..from_alice(MsgType::App, "<msg><appmsg/></msg>")
        };
        let event = classifier.classify(&link).await.unwrap();
        assert_eq!(event.content, placeholder::APP);
    }

    #[tokio::test]
    async fn test_voice_and_file_downloads() {
        let mut server = mockito::Server::new_async().await;
        let _voice = server
            .mock("GET", "/voice")
            .with_status(200)
            .with_header("content-disposition", "audio/mpeg")
            .with_body("ID3 voice")
            .create_async()
            .await;
        let _file = server
            .mock("GET", "/file")
            .with_status(200)
            .with_header("content-disposition", "attachment; filename=report.pdf")
            .with_body("%PDF-1.4 body")
            .create_async()
            .await;

        let mut session = session();
        session
            .files
            .insert("voice".into(), format!("{}/voice", server.url()));
        session
            .files
            .insert("file".into(), format!("{}/file", server.url()));
        let classifier = classifier(session);

        let voice = WechatMessage {
            msg_id: "voice".into(),
            ..from_alice(MsgType::Voice, "")
        };
        let event = classifier.classify(&voice).await.unwrap();
        assert_eq!(event.kind, EventKind::Audio);
        assert_eq!(event.blob().unwrap().mime, "audio/mpeg");

        let file = WechatMessage {
            msg_id: "file".into(),
            app_msg_type: AppMsgType::Attach,
            ..from_alice(MsgType::App, "")
        };
        let event = classifier.classify(&file).await.unwrap();
        assert_eq!(event.kind, EventKind::File);
        assert_eq!(event.blob().unwrap().name, "report.pdf");
    }

    #[tokio::test]
    async fn test_share_card() {
        let content = r#"<?xml version="1.0"?>
<msg bigheadimgurl="https://head/big" username="wxid_c" nickname="Carol"/>"#;
        let event = classifier(session())
            .classify(&from_alice(MsgType::ShareCard, content))
            .await
            .unwrap();

        assert_eq!(
            event.app().unwrap(),
            &AppCard {
                title: String::new(),
                description: "Carol".into(),
                source: "Carol".into(),
                url: "https://head/big".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_broken_share_card_is_dropped() {
        let event = classifier(session())
            .classify(&from_alice(MsgType::ShareCard, "<msg"))
            .await;
        assert!(event.is_none());
    }

    #[tokio::test]
    async fn test_revoke() {
        let content = "<sysmsg type=\"revokemsg\"><revokemsg><session>@alice</session>\
            <msgid>123</msgid><replacemsg>\"Alice\" recalled a message</replacemsg>\
            </revokemsg></sysmsg>";
        let event = classifier(session())
            .classify(&from_alice(MsgType::Recalled, content))
            .await
            .unwrap();

        assert_eq!(event.kind, EventKind::Revoke);
        assert_eq!(event.reply, Some(ReplyInfo { id: "123".into() }));
        assert_eq!(event.content, "\"Alice\" recalled a message");
    }

    #[tokio::test]
    async fn test_link_app_message_keeps_title_in_description() {
        let msg = WechatMessage {
            app_msg_type: AppMsgType::Link,
            ..from_alice(
                MsgType::App,
                "<msg><appmsg><title>Check this out</title></appmsg></msg>",
            )
        };
        let event = classifier(session()).classify(&msg).await.unwrap();

        assert_eq!(event.kind, EventKind::App);
        let card = event.app().unwrap();
        assert_eq!(card.title, "");
        assert_eq!(card.description, "Check this out");
    }

    #[tokio::test]
    async fn test_other_app_types_use_media_data() {
        let msg = WechatMessage {
            app_msg_type: AppMsgType::Url,
            ..from_alice(
                MsgType::App,
                "<msg><appmsg><title>News</title><des>Story</des><url>https://n</url>\
                 </appmsg><appinfo><appname>Reader</appname></appinfo></msg>",
            )
        };
        let event = classifier(session()).classify(&msg).await.unwrap();
        assert_eq!(
            event.data,
            Some(EventData::App(AppCard {
                title: "News".into(),
                description: "Story".into(),
                source: "Reader".into(),
                url: "https://n".into(),
            }))
        );

        let broken = WechatMessage {
            app_msg_type: AppMsgType::Url,
            ..from_alice(MsgType::App, "not xml")
        };
        assert!(classifier(session()).classify(&broken).await.is_none());
    }

    #[tokio::test]
    async fn test_sticker_app_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/emoji")
            .with_status(200)
            .with_body("GIF89a")
            .create_async()
            .await;

        let msg = WechatMessage {
            app_msg_type: AppMsgType::Emoji,
            ..from_alice(
                MsgType::App,
                &format!(r#"<msg><emoji cdnurl="{}/emoji" aeskey="k1"/></msg>"#, server.url()),
            )
        };
        let event = classifier(session()).classify(&msg).await.unwrap();

        assert_eq!(event.kind, EventKind::Photo);
        let blobs = event.blobs().unwrap();
        assert_eq!(blobs[0].name, "k1");
        assert_eq!(blobs[0].mime, "");
    }
}
