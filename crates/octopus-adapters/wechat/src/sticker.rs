//! Custom sticker retrieval.
//!
//! Sticker app messages only reference the image:
//!
//! ```xml
//! <msg><emoji cdnurl="http://emoji.qpic.cn/..." aeskey="9f2c..." md5="..."/></msg>
//! ```
//!
//! The CDN URL is fetched directly and the AES key becomes the blob name.

use thiserror::Error;
use tracing::debug;

use octopus_core::{Blob, TransportError};
use octopus_transport::AttachmentResolver;

use crate::xml::{self, DocumentError, DocumentResult};

/// Errors raised while resolving a sticker.
#[derive(Debug, Clone, Error)]
pub enum StickerError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Location of a sticker image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerSource {
    pub url: String,
    pub key: String,
}

impl StickerSource {
    /// Reads the first `cdnurl` and `aeskey` attributes of the document.
    pub fn parse(content: &str) -> DocumentResult<Self> {
        let text = xml::source(content);
        let doc = xml::parse(&text)?;
        let attr = |name: &'static str| {
            xml::find_attribute(&doc, name)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or(DocumentError::MissingNode(name))
        };

        Ok(Self {
            url: attr("cdnurl")?,
            key: attr("aeskey")?,
        })
    }
}

/// Downloads the sticker referenced by an app message.
///
/// The blob carries no content type.
pub async fn fetch_sticker(
    resolver: &AttachmentResolver,
    content: &str,
) -> Result<Blob, StickerError> {
    let source = StickerSource::parse(content)?;
    debug!(key = %source.key, "Fetching sticker");

    let data = resolver.get_bytes(&source.url).await?;
    if data.is_empty() {
        return Err(TransportError::EmptyBody.into());
    }
    Ok(Blob::new(source.key, "", data))
}
