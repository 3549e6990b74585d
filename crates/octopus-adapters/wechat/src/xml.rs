//! XML helpers for message payloads.
//!
//! Rich messages embed an XML document in `Content`. Some providers deliver
//! it entity-escaped, so every entry point goes through [`source`] first:
//!
//! ```rust,ignore
//! let text = xml::source(&msg.content);
//! let doc = xml::parse(&text)?;
//! let title = xml::text_at(&doc, &["msg", "appmsg", "title"]);
//! ```

use std::borrow::Cow;

use roxmltree::{Document, Node};
use thiserror::Error;

/// Errors raised while reading an embedded document.
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    /// The content is not well-formed XML.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// A required node or attribute is missing or empty.
    #[error("missing node: {0}")]
    MissingNode(&'static str),

    /// A node holds a value of the wrong shape.
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue {
        /// Node name.
        field: &'static str,
        /// Raw text.
        value: String,
    },
}

/// Result type for document reads.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Normalizes message content into parseable XML text.
pub fn source(content: &str) -> Cow<'_, str> {
    let trimmed = content.trim();
    if trimmed.starts_with("&lt;") {
        Cow::Owned(unescape(trimmed))
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Parses normalized XML text.
pub fn parse(text: &str) -> DocumentResult<Document<'_>> {
    Document::parse(text).map_err(|e| DocumentError::Malformed(e.to_string()))
}

/// Finds the first element reachable through `path` from the document root.
///
/// The first segment names the root element. Every matching branch is tried
/// in document order.
pub fn find_path<'a, 'i>(doc: &'a Document<'i>, path: &[&str]) -> Option<Node<'a, 'i>> {
    find_from(doc.root(), path)
}

fn find_from<'a, 'i>(node: Node<'a, 'i>, path: &[&str]) -> Option<Node<'a, 'i>> {
    let Some((head, rest)) = path.split_first() else {
        return Some(node);
    };
    node.children()
        .filter(|child| child.has_tag_name(*head))
        .find_map(|child| find_from(child, rest))
}

/// Finds the first descendant element of `node` named `name`.
pub fn find_descendant<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.descendants().find(|n| n.has_tag_name(name))
}

/// Returns the value of the first attribute named `name` anywhere in the
/// document.
pub fn find_attribute<'a>(doc: &'a Document<'_>, name: &str) -> Option<&'a str> {
    doc.descendants().find_map(|n| n.attribute(name))
}

/// Concatenated text of `node` and its descendants.
pub fn inner_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}

/// Inner text at `path`, or `None` when the element is absent.
pub fn text_at(doc: &Document<'_>, path: &[&str]) -> Option<String> {
    find_path(doc, path).map(inner_text)
}

/// Inner text at `path`, with absent elements read as empty.
pub fn text_or_empty(doc: &Document<'_>, path: &[&str]) -> String {
    text_at(doc, path).unwrap_or_default()
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
