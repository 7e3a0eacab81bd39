//! EventSubscriber port - Interface for registering broadcast channels.
//!
//! This port defines how consumers register interest in portal events and
//! read the recent-history window, without knowing how delivery works.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{ChannelId, DomainError};
use crate::domain::notify::Event;

/// Callback invoked for every event delivered to a registered channel.
///
/// Implementations should be:
/// - **Quick** - hand off to a queue or channel; delivery is sequential and
///   a slow handler delays every channel registered after it
/// - **Isolated** - a returned error is logged by the broadcaster and never
///   affects other channels or the publisher
#[async_trait]
pub trait DeliveryHandler: Send + Sync {
    /// Deliver one event to this channel.
    async fn deliver(&self, event: Event) -> Result<(), DomainError>;

    /// Channel implementation name for logging.
    fn name(&self) -> &'static str;
}

/// Port for registering channels and reading recent history.
///
/// # Example
///
/// ```ignore
/// let channel = ChannelId::new("realtime-gateway")?;
/// subscriber.subscribe(channel.clone(), bridge).await;
/// let recent = subscriber.recent_events(50).await;
/// subscriber.unsubscribe(&channel).await;
/// ```
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Register a handler under a channel id.
    ///
    /// Re-registering an existing id replaces the handler (last write wins)
    /// without disturbing the channel's position in delivery order.
    async fn subscribe(&self, channel_id: ChannelId, handler: Arc<dyn DeliveryHandler>);

    /// Remove a channel registration. No-op if the id is unknown.
    async fn unsubscribe(&self, channel_id: &ChannelId);

    /// Read the most recent events, oldest first, clamped to what the
    /// history window holds. No side effects.
    async fn recent_events(&self, limit: usize) -> Vec<Event>;
}

/// Combined trait for broadcaster implementations.
///
/// A broadcaster provides both publishing and channel registration.
pub trait EventBroadcast: super::EventPublisher + EventSubscriber {}

// Blanket implementation - any type that implements both traits qualifies
impl<T: super::EventPublisher + EventSubscriber> EventBroadcast for T {}
