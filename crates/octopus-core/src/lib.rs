//! # Octopus Core
//!
//! Shared building blocks for Octopus limbs.
//!
//! A limb sits between a vendor chat session and the Octopus bus:
//!
//! ```text
//! ┌──────────────┐  provider msgs  ┌────────┐  CanonicalEvent  ┌───────────┐
//! │ Chat session │────────────────▶│  Limb  │─────────────────▶│ EventSink │
//! │   (vendor)   │◀────────────────│        │◀─────────────────│   (bus)   │
//! └──────────────┘   send calls    └────────┘  outbound events └───────────┘
//! ```
//!
//! This crate provides:
//! - **Event model**: [`CanonicalEvent`] and its payload types
//! - **Errors**: the transport, session, dispatch and lifecycle taxonomy
//! - **Sinks**: the [`EventSink`] contract and a channel-backed [`ChannelSink`]
//! - **Limbs**: the [`Limb`] lifecycle trait driven by the runtime

pub mod error;
pub mod event;
pub mod limb;
pub mod sink;

pub use error::{
    DispatchError, DispatchResult, LimbError, LimbResult, SessionError, SessionResult,
    TransportError, TransportResult,
};
pub use event::{
    Ack, AppCard, Blob, CanonicalEvent, Chat, ChatKind, EventData, EventKind, ReplyInfo, User,
    Vendor,
};
pub use limb::{BoxedLimb, Limb};
pub use sink::{BoxedSink, ChannelSink, EventSink};

/// Prelude for common imports.
pub mod prelude {
    pub use super::error::*;
    pub use super::event::*;
    pub use super::limb::{BoxedLimb, Limb};
    pub use super::sink::{BoxedSink, EventSink};
}
