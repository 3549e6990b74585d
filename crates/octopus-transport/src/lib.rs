//! # Octopus Transport
//!
//! Attachment retrieval shared by Octopus limbs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  Limb Layer         │  (WeChat, ...)
//! │  (classifies msgs)  │
//! ├─────────────────────┤
//! │  octopus-transport  │  <- This crate (fetch, gunzip, naming)
//! ├─────────────────────┤
//! │  Network (HTTP)     │
//! └─────────────────────┘
//! ```
//!
//! One [`AttachmentResolver`] is created per process from an
//! [`HttpClientConfig`] and shared by everything that downloads media.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use octopus_transport::{AttachmentResolver, HttpClientConfig, fetch_attachment};
//!
//! let resolver = AttachmentResolver::new(&HttpClientConfig::default())?;
//! let bytes = resolver.get_bytes("https://cdn.example.com/emoji").await?;
//!
//! // Provider file responses are named from their headers or content.
//! let blob = fetch_attachment(response).await?;
//! ```

pub mod config;
pub mod disposition;
pub mod mime;
pub mod resolver;

pub use config::{DEFAULT_USER_AGENT, HttpClientConfig};
pub use resolver::{AttachmentResolver, fetch_attachment, read_body};
