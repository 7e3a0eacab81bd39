//! EventPublisher port - Interface for publishing portal events.
//!
//! This port defines how producers hand events to the broadcaster without
//! knowing about the registry, the history window, or any transport.

use async_trait::async_trait;

use crate::domain::notify::Event;

/// Port for publishing portal events.
///
/// Publishing is fire-and-forget:
/// - No durability: events exist only in the in-process history window
/// - No backpressure: a slow consumer never blocks the producer
/// - No error surface: a failing subscriber is logged by the broadcaster
///   and never reported back to the publisher
///
/// # Example
///
/// ```ignore
/// let event = Event::new(EventKind::SystemNotification, json!({"message": "maintenance at 22:00"}));
/// publisher.publish(event).await;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    ///
    /// Appends the event to the recent-history window and delivers it to
    /// every registered channel whose membership the event targets.
    async fn publish(&self, event: Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventPublisher) {}

    // Compile-time check that trait is Send + Sync
    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn event_publisher_is_send_sync() {
        // This will fail to compile if EventPublisher is not Send + Sync
        fn check<T: EventPublisher>() {
            assert_send_sync::<T>();
        }
        // We just need the function to exist to prove the constraint
    }
}
