//! # Octopus WeChat Limb
//!
//! Bridges a web WeChat session to the Octopus bus.
//!
//! ## Pipeline
//!
//! ```text
//!                 ┌───────────────┐   media   ┌────────────────────┐
//!  session msgs ─▶│   Classifier  │──────────▶│ AttachmentResolver │
//!                 │  (inbound.rs) │◀──────────│ (octopus-transport)│
//!                 └───────┬───────┘   Blob    └────────────────────┘
//!                         │ app XML
//!                         ▼
//!                 ┌───────────────┐
//!                 │  app / sticker│
//!                 └───────────────┘
//!
//!  bus events ──▶ Dispatcher (outbound.rs) ──▶ session send calls
//!  timer      ──▶ roster::snapshot         ──▶ sync event
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use octopus_adapter_wechat::{WechatConfig, WechatLimb};
//! use octopus_core::{ChannelSink, Limb};
//!
//! let (sink, mut events) = ChannelSink::new();
//! let limb = WechatLimb::new(WechatConfig::default(), session, Arc::new(sink))?;
//! limb.login().await?;
//! limb.start().await?;
//! ```

pub mod app;
pub mod config;
pub mod inbound;
pub mod limb;
pub mod model;
pub mod outbound;
pub mod roster;
pub mod session;
pub mod sticker;
pub mod xml;

#[cfg(test)]
mod testing;

pub use app::decode_app_card;
pub use config::WechatConfig;
pub use inbound::{Classifier, placeholder};
pub use limb::{VENDOR_TYPE, WechatLimb};
pub use model::{AppMsgType, Contact, MsgType, WechatMessage};
pub use outbound::Dispatcher;
pub use session::{BoxedSession, ChatSession, SentMessage};
pub use sticker::{StickerError, fetch_sticker};
