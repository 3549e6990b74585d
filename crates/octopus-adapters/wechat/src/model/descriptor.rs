//! Typed views over the XML carried by share-card, recall and media
//! messages.

use crate::xml::{self, DocumentError, DocumentResult};

/// A shared contact card (`MsgType` 42).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub user_name: String,
    pub nick_name: String,
    pub alias: String,
    pub big_head_img_url: String,
}

impl Card {
    /// Reads the `<msg .../>` attributes of a share card.
    pub fn parse(content: &str) -> DocumentResult<Self> {
        let text = xml::source(content);
        let doc = xml::parse(&text)?;
        let msg = xml::find_path(&doc, &["msg"]).ok_or(DocumentError::MissingNode("msg"))?;
        let attr = |name: &str| msg.attribute(name).unwrap_or_default().to_string();

        Ok(Self {
            user_name: attr("username"),
            nick_name: attr("nickname"),
            alias: attr("alias"),
            big_head_img_url: attr("bigheadimgurl"),
        })
    }
}

/// A recall notice (`MsgType` 10002).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevokeDescriptor {
    /// Id of the recalled message.
    pub msg_id: i64,
    pub old_msg_id: String,
    pub session: String,
    /// Human-readable notice, e.g. `"Alice" recalled a message`.
    pub replace_msg: String,
}

impl RevokeDescriptor {
    /// Reads `<sysmsg type="revokemsg"><revokemsg>...`.
    pub fn parse(content: &str) -> DocumentResult<Self> {
        let text = xml::source(content);
        let doc = xml::parse(&text)?;
        let field = |name: &str| xml::text_or_empty(&doc, &["sysmsg", "revokemsg", name]);

        let raw_id = xml::text_at(&doc, &["sysmsg", "revokemsg", "msgid"])
            .ok_or(DocumentError::MissingNode("msgid"))?;
        let msg_id = raw_id
            .trim()
            .parse()
            .map_err(|_| DocumentError::InvalidValue {
                field: "msgid",
                value: raw_id.clone(),
            })?;

        Ok(Self {
            msg_id,
            old_msg_id: field("oldmsgid"),
            session: field("session"),
            replace_msg: field("replacemsg"),
        })
    }
}

/// Generic app payload used for sub-types without a dedicated decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaData {
    pub title: String,
    pub description: String,
    pub url: String,
    pub app_name: String,
}

impl MediaData {
    pub fn parse(content: &str) -> DocumentResult<Self> {
        let text = xml::source(content);
        let doc = xml::parse(&text)?;
        xml::find_path(&doc, &["msg", "appmsg"]).ok_or(DocumentError::MissingNode("appmsg"))?;

        Ok(Self {
            title: xml::text_or_empty(&doc, &["msg", "appmsg", "title"]),
            description: xml::text_or_empty(&doc, &["msg", "appmsg", "des"]),
            url: xml::text_or_empty(&doc, &["msg", "appmsg", "url"]),
            app_name: xml::text_or_empty(&doc, &["msg", "appinfo", "appname"]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card() {
        let content = r#"<?xml version="1.0"?>
<msg bigheadimgurl="https://head/big" smallheadimgurl="https://head/small" username="wxid_abc" nickname="Alice" alias="alice01" sex="2"/>"#;
        let card = Card::parse(content).unwrap();
        assert_eq!(card.nick_name, "Alice");
        assert_eq!(card.big_head_img_url, "https://head/big");
        assert_eq!(card.user_name, "wxid_abc");
    }

    #[test]
    fn test_card_rejects_garbage() {
        assert!(Card::parse("not xml").is_err());
        assert!(Card::parse("<other/>").is_err());
    }

    #[test]
    fn test_revoke() {
        let content = "&lt;sysmsg type=\"revokemsg\"&gt;&lt;revokemsg&gt;\
            &lt;session&gt;@friend&lt;/session&gt;\
            &lt;oldmsgid&gt;1001&lt;/oldmsgid&gt;\
            &lt;msgid&gt;123&lt;/msgid&gt;\
            &lt;replacemsg&gt;&lt;![CDATA[\"Bob\" recalled a message]]&gt;&lt;/replacemsg&gt;\
            &lt;/revokemsg&gt;&lt;/sysmsg&gt;";
        let revoke = RevokeDescriptor::parse(content).unwrap();
        assert_eq!(revoke.msg_id, 123);
        assert_eq!(revoke.replace_msg, "\"Bob\" recalled a message");
        assert_eq!(revoke.session, "@friend");
    }

    #[test]
    fn test_revoke_requires_numeric_id() {
        let content = "<sysmsg><revokemsg><msgid>abc</msgid></revokemsg></sysmsg>";
        assert!(matches!(
            RevokeDescriptor::parse(content),
            Err(DocumentError::InvalidValue { field: "msgid", .. })
        ));
        assert!(matches!(
            RevokeDescriptor::parse("<sysmsg/>"),
            Err(DocumentError::MissingNode("msgid"))
        ));
    }

    #[test]
    fn test_media_data() {
        let content = "<msg><appmsg><title>T</title><des>D</des><url>https://u</url></appmsg>\
            <appinfo><appname>App</appname></appinfo></msg>";
        let media = MediaData::parse(content).unwrap();
        assert_eq!(
            media,
            MediaData {
                title: "T".into(),
                description: "D".into(),
                url: "https://u".into(),
                app_name: "App".into(),
            }
        );
    }
}
