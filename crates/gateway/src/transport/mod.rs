//! Transport abstraction layer
//!
//! Provides unified traits for message passing using tokio channels.
//! The trait-based design allows swapping in a real P2P transport later.
//! Messages travel in-process, so no serialization bound is imposed here;
//! offers inside feed events are already opaque payloads.

pub mod channel;

use crate::error::TransportError;
use async_trait::async_trait;

/// Publisher - sends messages to all current subscribers
#[async_trait]
pub trait Publisher<M>: Send + Sync
where
    M: Send + Sync,
{
    /// Publish a message
    async fn publish(&self, msg: &M) -> Result<(), TransportError>;
}

/// Subscriber - receives messages from a publisher
#[async_trait]
pub trait Subscriber<M>: Send
where
    M: Send,
{
    /// Wait for the next message
    async fn next(&mut self) -> Result<M, TransportError>;

    /// Try to receive without blocking (returns None if no message available)
    fn try_next(&mut self) -> Result<Option<M>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::FeedEvent;

    // Ensure traits are object-safe
    fn _assert_publisher_object_safe(_: &dyn Publisher<FeedEvent>) {}
    fn _assert_subscriber_object_safe(_: &mut dyn Subscriber<FeedEvent>) {}
}
