//! Octopus Runtime - Orchestration layer for Octopus limbs.
//!
//! This crate provides:
//! - Layered configuration (`OctopusConfig`, `ConfigLoader`)
//! - Logging setup driven by that configuration (`LoggingBuilder`)
//! - Limb lifecycle orchestration (`OctopusRuntime`)
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use octopus_adapter_wechat::{WechatConfig, WechatLimb};
//! use octopus_runtime::OctopusRuntime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = OctopusRuntime::new();
//!     let config: WechatConfig = runtime.limb_config("wechat")?;
//!
//!     let limb = WechatLimb::new(config, session, sink)?;
//!
//!     // Login, start, then run until Ctrl+C
//!     runtime.run(Arc::new(limb)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, LoggingConfig, OctopusConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{OctopusRuntime, RuntimeBuilder};

// Re-export tracing for use by limb crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
