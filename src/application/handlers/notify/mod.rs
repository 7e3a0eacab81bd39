//! Notification command and query handlers.

mod publish_notification;
mod recent_activity;

pub use publish_notification::{
    PublishNotificationCommand, PublishNotificationHandler, PublishNotificationResult,
};
pub use recent_activity::{RecentActivityHandler, RecentActivityQuery};
