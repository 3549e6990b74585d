//! Attachment resolver.
//!
//! Turns provider file responses and CDN URLs into [`Blob`]s.
//!
//! # Naming Rules
//!
//! | Response | `name` | `mime` |
//! |----------|--------|--------|
//! | `Content-Disposition` with `filename` | decoded filename | sniffed |
//! | other `Content-Disposition` value | random hex + looked-up extension | raw header value |
//! | no `Content-Disposition` | random hex + sniffed extension | sniffed |

use std::io::Read;

use flate2::read::GzDecoder;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_ENCODING, HeaderMap, USER_AGENT};
use reqwest::{Client, Response};
use tracing::{debug, trace};

use octopus_core::{Blob, TransportError, TransportResult};

use crate::config::HttpClientConfig;
use crate::{disposition, mime};

/// Fetches and names remote attachments.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct AttachmentResolver {
    client: Client,
    user_agent: String,
}

impl AttachmentResolver {
    /// Creates a resolver with a client built from `config`.
    pub fn new(config: &HttpClientConfig) -> TransportResult<Self> {
        Ok(Self {
            client: config.build_client()?,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Creates a resolver around an existing client.
    pub fn with_client(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    /// Returns the shared client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Performs a plain GET and returns the (decompressed) body.
    pub async fn get_bytes(&self, url: &str) -> TransportResult<Vec<u8>> {
        debug!(url = %url, "Fetching remote media");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        read_body(ensure_success(response)?).await
    }
}

/// Reads a provider file response into a named [`Blob`].
///
/// Fails on a non-success status, on transport errors and on empty bodies.
pub async fn fetch_attachment(response: Response) -> TransportResult<Blob> {
    let response = ensure_success(response)?;
    let disposition = header_value(response.headers(), CONTENT_DISPOSITION.as_str());

    let data = read_body(response).await?;
    if data.is_empty() {
        return Err(TransportError::EmptyBody);
    }

    let blob = name_blob(disposition.as_deref(), data);
    trace!(name = %blob.name, mime = %blob.mime, size = blob.binary.len(), "Attachment resolved");
    Ok(blob)
}

/// Reads the full body, unwrapping gzip when the response declares it.
pub async fn read_body(response: Response) -> TransportResult<Vec<u8>> {
    let gzipped = header_value(response.headers(), CONTENT_ENCODING.as_str())
        .is_some_and(|encoding| encoding.contains("gzip"));

    let bytes = response
        .bytes()
        .await
        .map_err(|e| TransportError::Request(e.to_string()))?;

    if gzipped {
        gunzip(&bytes)
    } else {
        Ok(bytes.to_vec())
    }
}

fn ensure_success(response: Response) -> TransportResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn gunzip(data: &[u8]) -> TransportResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

fn name_blob(disposition: Option<&str>, data: Vec<u8>) -> Blob {
    if let Some(name) = disposition.and_then(disposition::filename) {
        let detected = mime::sniff(&data);
        return Blob::new(name, detected.mime, data);
    }

    let stem = random_stem();
    match disposition {
        // Providers reuse the disposition header for the content type when
        // no filename is attached.
        Some(content_type) => Blob::new(
            format!("{stem}{}", mime::extension_for(content_type)),
            content_type,
            data,
        ),
        None => {
            let detected = mime::sniff(&data);
            Blob::new(format!("{stem}{}", detected.extension), detected.mime, data)
        }
    }
}

fn random_stem() -> String {
    format!("{:08x}", rand::random::<u32>())
}
