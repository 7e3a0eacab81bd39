//! The portal event broadcaster.
//!
//! One explicitly constructed instance per process, shared as `Arc` and
//! handed to producers through [`EventPublisher`] and to consumers through
//! [`EventSubscriber`]. There is no global instance.
//!
//! # Architecture
//!
//! ```text
//! publish(event)
//!   │  write lock: append to history, snapshot channel registry
//!   ▼
//! [channel-1] → [channel-2] → [channel-3]   sequential, registration order
//!      │ error?                               logged, loop continues
//! ```
//!
//! Delivery happens after the lock is released, so a handler may subscribe
//! or unsubscribe reentrantly without deadlock. A channel registered while
//! a publish is in flight sees only later events.

use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::ChannelId;
use crate::domain::notify::{Event, HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
use crate::ports::{DeliveryHandler, EventPublisher, EventSubscriber};

/// In-process event broadcaster with a bounded recent-history window.
///
/// Features:
/// - Sliding history window for catch-up reads (`recent_events`)
/// - Insertion-ordered channel registry; re-subscribing a channel id
///   replaces its handler in place
/// - Per-channel failure isolation: one failing handler never stops the
///   others and never surfaces to the publisher
///
/// # Thread Safety
///
/// A single `RwLock` guards the history buffer and the registry together,
/// so appends and registry edits are serialized. The lock is never held
/// across handler awaits.
pub struct Broadcaster {
    inner: RwLock<Inner>,
}

struct Inner {
    history: HistoryBuffer,
    channels: IndexMap<ChannelId, Arc<dyn DeliveryHandler>>,
}

impl Broadcaster {
    /// Create a broadcaster retaining at most `history_capacity` events.
    pub fn new(history_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                history: HistoryBuffer::new(history_capacity),
                channels: IndexMap::new(),
            }),
        }
    }

    /// Create with the default history window (1000 events).
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }

    /// Number of registered channels.
    pub async fn channel_count(&self) -> usize {
        self.inner.read().await.channels.len()
    }

    /// Registered channel ids in delivery order (for monitoring/debugging).
    pub async fn channel_ids(&self) -> Vec<ChannelId> {
        self.inner.read().await.channels.keys().cloned().collect()
    }

    /// Number of events currently held in the history window.
    pub async fn history_len(&self) -> usize {
        self.inner.read().await.history.len()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl EventPublisher for Broadcaster {
    async fn publish(&self, event: Event) {
        // Append and snapshot under one write lock, then release before
        // any handler runs.
        let handlers: Vec<(ChannelId, Arc<dyn DeliveryHandler>)> = {
            let mut inner = self.inner.write().await;
            inner.history.push(event.clone());
            inner
                .channels
                .iter()
                .map(|(id, handler)| (id.clone(), Arc::clone(handler)))
                .collect()
        };

        tracing::debug!(
            event_id = %event.id,
            kind = %event.kind,
            channels = handlers.len(),
            "publishing event"
        );

        for (channel_id, handler) in handlers {
            if let Err(err) = handler.deliver(event.clone()).await {
                tracing::warn!(
                    channel = %channel_id,
                    handler = handler.name(),
                    error = %err,
                    "event delivery failed, continuing with remaining channels"
                );
            }
        }
    }
}

#[async_trait]
impl EventSubscriber for Broadcaster {
    async fn subscribe(&self, channel_id: ChannelId, handler: Arc<dyn DeliveryHandler>) {
        let mut inner = self.inner.write().await;
        // IndexMap keeps the existing position when the key is present, so a
        // reconnecting channel retains its slot in delivery order.
        let replaced = inner.channels.insert(channel_id.clone(), handler).is_some();
        tracing::debug!(channel = %channel_id, replaced, "channel subscribed");
    }

    async fn unsubscribe(&self, channel_id: &ChannelId) {
        let mut inner = self.inner.write().await;
        // shift_remove preserves the order of the remaining channels.
        let removed = inner.channels.shift_remove(channel_id).is_some();
        if removed {
            tracing::debug!(channel = %channel_id, "channel unsubscribed");
        }
    }

    async fn recent_events(&self, limit: usize) -> Vec<Event> {
        self.inner.read().await.history.recent(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::notify::EventKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn channel(name: &str) -> ChannelId {
        ChannelId::new(name).unwrap()
    }

    fn notification(n: usize) -> Event {
        Event::new(EventKind::SystemNotification, json!({ "seq": n }))
    }

    /// Counts deliveries.
    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl DeliveryHandler for CountingHandler {
        async fn deliver(&self, _: Event) -> Result<(), DomainError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    /// Appends a label to a shared log on every delivery.
    struct LabelledHandler {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl DeliveryHandler for LabelledHandler {
        async fn deliver(&self, _: Event) -> Result<(), DomainError> {
            self.log.lock().unwrap().push(self.label);
            Ok(())
        }
        fn name(&self) -> &'static str {
            "LabelledHandler"
        }
    }

    /// Always fails.
    struct FailingHandler;

    #[async_trait]
    impl DeliveryHandler for FailingHandler {
        async fn deliver(&self, _: Event) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::DeliveryFailed, "handler failed"))
        }
        fn name(&self) -> &'static str {
            "FailingHandler"
        }
    }

    #[test]
    fn broadcaster_satisfies_the_combined_port() {
        fn assert_broadcast<T: crate::ports::EventBroadcast>() {}
        assert_broadcast::<Broadcaster>();
    }

    #[tokio::test]
    async fn publish_with_no_channels_still_records_history() {
        let broadcaster = Broadcaster::new(10);

        broadcaster.publish(notification(0)).await;

        assert_eq!(broadcaster.history_len().await, 1);
        assert_eq!(broadcaster.channel_count().await, 0);
    }

    #[tokio::test]
    async fn subscribed_channel_receives_each_publish_exactly_once() {
        let broadcaster = Broadcaster::new(10);
        let count = Arc::new(AtomicUsize::new(0));

        broadcaster
            .subscribe(channel("a"), Arc::new(CountingHandler(count.clone())))
            .await;

        broadcaster.publish(notification(0)).await;
        broadcaster.publish(notification(1)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unsubscribed_channel_stops_receiving() {
        let broadcaster = Broadcaster::new(10);
        let count = Arc::new(AtomicUsize::new(0));

        broadcaster
            .subscribe(channel("a"), Arc::new(CountingHandler(count.clone())))
            .await;
        broadcaster.publish(notification(0)).await;

        broadcaster.unsubscribe(&channel("a")).await;
        broadcaster.publish(notification(1)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(broadcaster.channel_count().await, 0);
    }

    #[tokio::test]
    async fn unsubscribe_unknown_channel_is_noop() {
        let broadcaster = Broadcaster::new(10);
        let count = Arc::new(AtomicUsize::new(0));

        broadcaster
            .subscribe(channel("a"), Arc::new(CountingHandler(count.clone())))
            .await;

        broadcaster.unsubscribe(&channel("never-registered")).await;
        broadcaster.publish(notification(0)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resubscribe_replaces_handler_last_write_wins() {
        let broadcaster = Broadcaster::new(10);
        let old_count = Arc::new(AtomicUsize::new(0));
        let new_count = Arc::new(AtomicUsize::new(0));

        broadcaster
            .subscribe(channel("a"), Arc::new(CountingHandler(old_count.clone())))
            .await;
        broadcaster
            .subscribe(channel("a"), Arc::new(CountingHandler(new_count.clone())))
            .await;

        broadcaster.publish(notification(0)).await;

        assert_eq!(old_count.load(Ordering::SeqCst), 0);
        assert_eq!(new_count.load(Ordering::SeqCst), 1);
        assert_eq!(broadcaster.channel_count().await, 1);
    }

    #[tokio::test]
    async fn delivery_follows_registration_order() {
        let broadcaster = Broadcaster::new(10);
        let log = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            broadcaster
                .subscribe(
                    channel(label),
                    Arc::new(LabelledHandler {
                        label,
                        log: log.clone(),
                    }),
                )
                .await;
        }

        broadcaster.publish(notification(0)).await;

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        assert_eq!(
            broadcaster.channel_ids().await,
            vec![channel("first"), channel("second"), channel("third")]
        );
    }

    #[tokio::test]
    async fn resubscribe_keeps_original_position_in_delivery_order() {
        let broadcaster = Broadcaster::new(10);
        let log = Arc::new(Mutex::new(Vec::new()));

        broadcaster
            .subscribe(
                channel("a"),
                Arc::new(LabelledHandler {
                    label: "a-old",
                    log: log.clone(),
                }),
            )
            .await;
        broadcaster
            .subscribe(
                channel("b"),
                Arc::new(LabelledHandler {
                    label: "b",
                    log: log.clone(),
                }),
            )
            .await;
        // Replacing "a" must not move it behind "b".
        broadcaster
            .subscribe(
                channel("a"),
                Arc::new(LabelledHandler {
                    label: "a-new",
                    log: log.clone(),
                }),
            )
            .await;

        broadcaster.publish(notification(0)).await;

        assert_eq!(*log.lock().unwrap(), vec!["a-new", "b"]);
    }

    #[tokio::test]
    async fn failing_channel_does_not_stop_later_channels() {
        let broadcaster = Broadcaster::new(10);
        let count = Arc::new(AtomicUsize::new(0));

        broadcaster
            .subscribe(channel("broken"), Arc::new(FailingHandler))
            .await;
        broadcaster
            .subscribe(channel("healthy"), Arc::new(CountingHandler(count.clone())))
            .await;

        // Must not panic and must not skip the healthy channel.
        broadcaster.publish(notification(0)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(broadcaster.history_len().await, 1);
    }

    #[tokio::test]
    async fn recent_events_returns_window_oldest_first() {
        let broadcaster = Broadcaster::new(3);

        for n in 0..5 {
            broadcaster.publish(notification(n)).await;
        }

        let recent = broadcaster.recent_events(10).await;
        let seqs: Vec<u64> = recent
            .iter()
            .map(|e| e.payload["seq"].as_u64().unwrap())
            .collect();

        assert_eq!(seqs, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn recent_events_respects_limit() {
        let broadcaster = Broadcaster::new(10);

        for n in 0..4 {
            broadcaster.publish(notification(n)).await;
        }

        let recent = broadcaster.recent_events(2).await;
        let seqs: Vec<u64> = recent
            .iter()
            .map(|e| e.payload["seq"].as_u64().unwrap())
            .collect();

        assert_eq!(seqs, vec![2, 3]);
    }

    /// Subscribes another channel from inside a delivery callback.
    struct ReentrantHandler {
        broadcaster: Arc<Broadcaster>,
        count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DeliveryHandler for ReentrantHandler {
        async fn deliver(&self, _: Event) -> Result<(), DomainError> {
            self.broadcaster
                .subscribe(
                    ChannelId::new("added-mid-delivery").unwrap(),
                    Arc::new(CountingHandler(self.count.clone())),
                )
                .await;
            Ok(())
        }
        fn name(&self) -> &'static str {
            "ReentrantHandler"
        }
    }

    #[tokio::test]
    async fn handler_may_subscribe_reentrantly_without_deadlock() {
        let broadcaster = Arc::new(Broadcaster::new(10));
        let count = Arc::new(AtomicUsize::new(0));

        broadcaster
            .subscribe(
                channel("reentrant"),
                Arc::new(ReentrantHandler {
                    broadcaster: broadcaster.clone(),
                    count: count.clone(),
                }),
            )
            .await;

        // First publish runs against the pre-publish snapshot; the channel
        // added mid-delivery sees only later events.
        broadcaster.publish(notification(0)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        broadcaster.publish(notification(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
