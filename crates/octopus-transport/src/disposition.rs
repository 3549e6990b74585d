//! `Content-Disposition` parsing.

use std::borrow::Cow;

/// Extracts the `filename` parameter of a `Content-Disposition` value.
///
/// `filename*` (RFC 5987) takes precedence over `filename`. Quoted values may
/// contain `;` and backslash escapes. The result is query-unescaped (`+`
/// becomes a space). Returns `None` when the value is not a disposition with
/// a non-empty filename.
pub fn filename(value: &str) -> Option<String> {
    let mut parts = split_params(value).into_iter();
    let disposition = parts.next()?.trim();
    if disposition.is_empty() || disposition.contains('=') {
        return None;
    }

    let mut plain = None;
    let mut extended = None;
    for param in parts {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let raw = unquote(raw.trim());
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(raw),
            "filename*" => extended = raw.split_once("''").map(|(_, encoded)| encoded.to_string()),
            _ => {}
        }
    }

    extended
        .or(plain)
        .filter(|name| !name.is_empty())
        .map(|name| query_unescape(&name))
}

/// Splits on `;` outside quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"') else {
        return raw.to_string();
    };
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

fn query_unescape(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(Cow::Borrowed(decoded)) => decoded.to_string(),
        Ok(Cow::Owned(decoded)) => decoded,
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_filename() {
        assert_eq!(
            filename(r#"attachment; filename="report.pdf""#).as_deref(),
            Some("report.pdf")
        );
    }

    #[test]
    fn test_url_encoded_filename() {
        assert_eq!(
            filename("attachment; filename=%E6%96%87%E4%BB%B6+1.txt").as_deref(),
            Some("文件 1.txt")
        );
    }

    #[test]
    fn test_extended_filename_wins() {
        assert_eq!(
            filename("attachment; filename=\"a.txt\"; filename*=UTF-8''b%20c.txt").as_deref(),
            Some("b c.txt")
        );
    }

    #[test]
    fn test_quoted_filename_keeps_separators() {
        assert_eq!(
            filename(r#"attachment; filename="a;b.pdf""#).as_deref(),
            Some("a;b.pdf")
        );
        assert_eq!(
            filename(r#"attachment; filename="say \"hi\"; now.txt"; size=3"#).as_deref(),
            Some(r#"say "hi"; now.txt"#)
        );
    }

    #[test]
    fn test_missing_or_empty_filename() {
        assert!(filename("attachment").is_none());
        assert!(filename("attachment; filename=\"\"").is_none());
        assert!(filename("filename=a.txt").is_none());
        assert!(filename("").is_none());
    }
}
