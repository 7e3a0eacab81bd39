//! PublishNotificationHandler - Command handler for admin system notifications.

use std::sync::Arc;

use serde_json::json;

use crate::domain::foundation::{DomainError, Role, UserId, ValidationError};
use crate::domain::notify::{Event, EventId, EventKind};
use crate::ports::EventPublisher;

/// Command to publish a `system-notification` event.
#[derive(Debug, Clone)]
pub struct PublishNotificationCommand {
    /// Optional short headline.
    pub title: Option<String>,
    /// Notification body. Must not be empty.
    pub message: String,
    /// Specific recipients. Non-empty takes precedence over roles.
    pub target_user_ids: Vec<UserId>,
    /// Role-wide recipients. Empty together with user targets = broadcast.
    pub target_roles: Vec<Role>,
    /// The admin issuing the notification.
    pub origin_user_id: UserId,
    pub origin_role: Role,
}

/// Result of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishNotificationResult {
    pub event_id: EventId,
}

/// Handler for publishing system notifications.
pub struct PublishNotificationHandler {
    publisher: Arc<dyn EventPublisher>,
}

impl PublishNotificationHandler {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    pub async fn handle(
        &self,
        cmd: PublishNotificationCommand,
    ) -> Result<PublishNotificationResult, DomainError> {
        if cmd.message.trim().is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }

        let mut payload = serde_json::Map::new();
        if let Some(title) = &cmd.title {
            payload.insert("title".to_string(), json!(title));
        }
        payload.insert("message".to_string(), json!(cmd.message));

        let event = Event::new(
            EventKind::SystemNotification,
            serde_json::Value::Object(payload),
        )
        .for_users(cmd.target_user_ids)
        .for_roles(cmd.target_roles)
        .with_origin(cmd.origin_user_id, cmd.origin_role);

        let event_id = event.id;

        tracing::info!(
            event_id = %event_id,
            "publishing system notification"
        );
        self.publisher.publish(event).await;

        Ok(PublishNotificationResult { event_id })
    }
}
