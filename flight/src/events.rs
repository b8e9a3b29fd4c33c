//! Publishing accepted flight events.
//!
//! The reducer hands every accepted `SeatsBooked` / `BookingCancelled` event
//! to an [`EventPublisher`] as an effect, after the flight has changed.

use crate::error::PublishError;
use crate::types::FlightAction;
use futures::future::BoxFuture;
use tokio::sync::mpsc;

/// Destination for accepted flight events
pub trait EventPublisher: Send + Sync {
    /// Publish one event
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the event could not be delivered.
    fn publish(&self, event: FlightAction) -> BoxFuture<'static, Result<(), PublishError>>;
}

/// Publisher that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: FlightAction) -> BoxFuture<'static, Result<(), PublishError>> {
        Box::pin(async { Ok(()) })
    }
}

/// Publisher that forwards events to an in-process channel
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::UnboundedSender<FlightAction>,
}

impl ChannelPublisher {
    /// Creates a publisher and the receiver its events arrive on
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FlightAction>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventPublisher for ChannelPublisher {
    fn publish(&self, event: FlightAction) -> BoxFuture<'static, Result<(), PublishError>> {
        let result = self
            .sender
            .send(event)
            .map_err(|_| PublishError::SubscriberClosed);
        Box::pin(async move { result })
    }
}
