//! App message decoding.
//!
//! | `AppMsgType` | required node | title | description | source | url |
//! |--------------|---------------|-------|-------------|--------|-----|
//! | 1 link | `appmsg/title` | "" | title | "" | "" |
//! | 19 forward | `appmsg/title` | title | `des` | "" | "" |
//! | 51 channels video | `finderFeed/nickname` | nickname | `desc` | nickname | `fullCoverUrl` |
//! | 63 channels live | `finderLive/nickname` | nickname | `desc` | nickname | `coverUrl` |
//! | other | `appmsg/title` | title | `des` | source name | `url` |

use roxmltree::Document;

use octopus_core::AppCard;

use crate::model::AppMsgType;
use crate::xml::{self, DocumentError, DocumentResult};

/// Decodes the card carried by an app message of the given sub-type.
pub fn decode_app_card(content: &str, sub_type: AppMsgType) -> DocumentResult<AppCard> {
    let text = xml::source(content);
    let doc = xml::parse(&text)?;

    let card = match sub_type {
        AppMsgType::Link => AppCard {
            description: required(&doc, &["msg", "appmsg", "title"], "title")?,
            ..Default::default()
        },
        AppMsgType::Forward => AppCard {
            title: required(&doc, &["msg", "appmsg", "title"], "title")?,
            description: xml::text_or_empty(&doc, &["msg", "appmsg", "des"]),
            ..Default::default()
        },
        AppMsgType::FinderFeed => finder(&doc, "finderFeed", "fullCoverUrl")?,
        AppMsgType::FinderLive => finder(&doc, "finderLive", "coverUrl")?,
        _ => {
            let title = required(&doc, &["msg", "appmsg", "title"], "title")?;
            let source = xml::text_at(&doc, &["msg", "appmsg", "sourcedisplayname"])
                .or_else(|| xml::text_at(&doc, &["msg", "appinfo", "appname"]))
                .unwrap_or_default();
            AppCard {
                title,
                description: xml::text_or_empty(&doc, &["msg", "appmsg", "des"]),
                source,
                url: xml::text_or_empty(&doc, &["msg", "appmsg", "url"]),
            }
        }
    };
    Ok(card)
}

fn finder(doc: &Document<'_>, section: &str, cover: &str) -> DocumentResult<AppCard> {
    let nickname = required(doc, &["msg", "appmsg", section, "nickname"], "nickname")?;
    let url = xml::find_path(doc, &["msg", "appmsg", section])
        .and_then(|node| xml::find_descendant(node, cover))
        .map(xml::inner_text)
        .unwrap_or_default();

    Ok(AppCard {
        title: nickname.clone(),
        description: xml::text_or_empty(doc, &["msg", "appmsg", section, "desc"]),
        source: nickname,
        url,
    })
}

fn required(doc: &Document<'_>, path: &[&str], name: &'static str) -> DocumentResult<String> {
    xml::text_at(doc, path)
        .filter(|text| !text.is_empty())
        .ok_or(DocumentError::MissingNode(name))
}
