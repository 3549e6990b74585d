//! Event sinks.
//!
//! A sink receives every event a limb produces. Delivery guarantees are the
//! sink's own concern; limbs push and move on.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use crate::event::CanonicalEvent;

/// Destination for canonical events.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Hands an event to the sink.
    async fn push(&self, event: CanonicalEvent);
}

/// A shared sink trait object.
pub type BoxedSink = Arc<dyn EventSink>;

/// A sink backed by an unbounded channel.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<CanonicalEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CanonicalEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn push(&self, event: CanonicalEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!(id = %e.0.id, "Event sink receiver dropped, discarding event");
        }
    }
}
