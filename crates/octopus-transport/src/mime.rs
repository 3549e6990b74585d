//! Content type sniffing and extension lookup.

/// Content type used when nothing better is known.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Result of sniffing a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detected {
    /// Detected content type.
    pub mime: String,
    /// File extension including the leading dot, or empty.
    pub extension: String,
}

/// Detects the content type of `data` from its magic bytes.
///
/// Buffers without a known signature are reported as UTF-8 text when they
/// decode as such, and as [`DEFAULT_MIME`] otherwise.
pub fn sniff(data: &[u8]) -> Detected {
    if let Some(kind) = infer::get(data) {
        return Detected {
            mime: kind.mime_type().to_string(),
            extension: format!(".{}", kind.extension()),
        };
    }

    if std::str::from_utf8(data).is_ok() {
        Detected {
            mime: "text/plain; charset=utf-8".to_string(),
            extension: ".txt".to_string(),
        }
    } else {
        Detected {
            mime: DEFAULT_MIME.to_string(),
            extension: String::new(),
        }
    }
}

/// Returns the conventional extension (with leading dot) for a content type.
///
/// Parameters such as `; charset=...` are ignored. Unknown types yield an
/// empty string.
pub fn extension_for(mime: &str) -> String {
    let base = mime.split(';').next().unwrap_or(mime).trim().to_ascii_lowercase();

    let preferred = match base.as_str() {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/silk" => Some("silk"),
        "video/mp4" => Some("mp4"),
        "application/pdf" => Some("pdf"),
        "text/plain" => Some("txt"),
        _ => None,
    };

    preferred
        .or_else(|| {
            mime_guess::get_mime_extensions_str(&base).and_then(|exts| exts.first().copied())
        })
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}
