//! Limb trait.
//!
//! A limb bridges one vendor session to the Octopus bus. The runtime drives
//! it through a fixed lifecycle:
//!
//! ```text
//! login ──▶ start ──▶ (events pushed / dispatch calls) ──▶ stop
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{DispatchResult, LimbResult};
use crate::event::{Ack, CanonicalEvent, Vendor};

/// A vendor bridge.
#[async_trait]
pub trait Limb: Send + Sync + 'static {
    /// Returns the limb's name, used as its configuration key.
    fn name(&self) -> &'static str;

    /// Returns the vendor descriptor once the session is authenticated.
    fn vendor(&self) -> Option<Vendor>;

    /// Authenticates the underlying session.
    async fn login(&self) -> LimbResult<()>;

    /// Starts inbound processing and periodic work.
    async fn start(&self) -> LimbResult<()>;

    /// Stops background work and terminates the session.
    ///
    /// In-flight work is allowed to finish on its own.
    async fn stop(&self);

    /// Delivers an outbound event to the vendor.
    async fn dispatch(&self, event: &CanonicalEvent) -> DispatchResult<Ack>;
}

/// A shared limb trait object.
pub type BoxedLimb = Arc<dyn Limb>;
