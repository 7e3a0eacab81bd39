//! RecentActivityHandler - Query handler for the recent-event window.

use std::sync::Arc;

use crate::domain::notify::Event;
use crate::ports::EventSubscriber;

/// Query for the most recent events, oldest first.
#[derive(Debug, Clone)]
pub struct RecentActivityQuery {
    /// Maximum number of events to return; clamped to the window size.
    pub limit: usize,
}

/// Handler for reading the broadcaster's recent-event window.
pub struct RecentActivityHandler {
    subscriber: Arc<dyn EventSubscriber>,
}

impl RecentActivityHandler {
    pub fn new(subscriber: Arc<dyn EventSubscriber>) -> Self {
        Self { subscriber }
    }

    pub async fn handle(&self, query: RecentActivityQuery) -> Vec<Event> {
        self.subscriber.recent_events(query.limit).await
    }
}
