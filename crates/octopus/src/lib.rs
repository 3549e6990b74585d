//! # Octopus
//!
//! Vendor limbs for the Octopus message bus.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  CanonicalEvent  ┌──────────────┐  send calls  ┌──────────────┐
//! │ Octopus bus │◀────────────────▶│ Limb (wechat)│◀────────────▶│ Chat session │
//! └─────────────┘                  └──────┬───────┘              └──────────────┘
//!                                         │ media
//!                                         ▼
//!                                  ┌──────────────┐
//!                                  │  Transport   │
//!                                  └──────────────┘
//! ```
//!
//! - **Runtime**: Loads configuration, sets up logging, drives the limb lifecycle
//! - **Limbs**: Vendor bridges (WeChat)
//! - **Transport**: Attachment download and naming
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use octopus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = OctopusRuntime::new();
//!     let config: WechatConfig = runtime.limb_config("wechat")?;
//!     let limb = WechatLimb::new(config, session, sink)?;
//!     runtime.run(Arc::new(limb)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `wechat`: Enable the WeChat limb (default)
//! - `toml-config` / `yaml-config`: Config file formats
//! - `json-log`: JSON log output

pub use octopus_core as core;
pub use octopus_runtime as runtime;
pub use octopus_transport as transport;

#[cfg(feature = "wechat")]
pub use octopus_adapter_wechat as wechat;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use octopus_runtime::{OctopusRuntime, RuntimeError, RuntimeResult};

    pub use octopus_core::{
        Ack, BoxedLimb, BoxedSink, CanonicalEvent, ChannelSink, EventKind, EventSink, Limb,
    };

    #[cfg(feature = "wechat")]
    pub use octopus_adapter_wechat::{ChatSession, WechatConfig, WechatLimb};
}
