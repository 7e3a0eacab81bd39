//! Portal event types.
//!
//! Every notification that flows through the broadcaster is an [`Event`]:
//! a closed [`EventKind`], an opaque JSON payload, origin attribution, and
//! optional delivery targets. Events are immutable once published.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::foundation::{Role, Timestamp, UserId, ValidationError};

use super::targeting::Delivery;

/// Unique identifier for an event instance.
///
/// UUID v7: millisecond timestamp prefix plus random suffix, so ids sort
/// roughly by creation time in logs. Used for correlation only, never for
/// deduplication or ordering guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new time-ordered EventId.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates an EventId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The closed vocabulary of portal events.
///
/// Wire identifiers are kebab-case and stable. Anything outside this set is
/// rejected at construction, so an unknown kind can never reach the history
/// buffer or a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    InvitationSent,
    InvitationAccepted,
    UserRegistered,
    UserLogin,
    UserLogout,
    RoleChanged,
    SystemNotification,
    ActivityUpdate,
    CrmUpdate,
}

impl EventKind {
    /// Returns the wire-format identifier for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::InvitationSent => "invitation-sent",
            EventKind::InvitationAccepted => "invitation-accepted",
            EventKind::UserRegistered => "user-registered",
            EventKind::UserLogin => "user-login",
            EventKind::UserLogout => "user-logout",
            EventKind::RoleChanged => "role-changed",
            EventKind::SystemNotification => "system-notification",
            EventKind::ActivityUpdate => "activity-update",
            EventKind::CrmUpdate => "crm-update",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invitation-sent" => Ok(EventKind::InvitationSent),
            "invitation-accepted" => Ok(EventKind::InvitationAccepted),
            "user-registered" => Ok(EventKind::UserRegistered),
            "user-login" => Ok(EventKind::UserLogin),
            "user-logout" => Ok(EventKind::UserLogout),
            "role-changed" => Ok(EventKind::RoleChanged),
            "system-notification" => Ok(EventKind::SystemNotification),
            "activity-update" => Ok(EventKind::ActivityUpdate),
            "crm-update" => Ok(EventKind::CrmUpdate),
            other => Err(ValidationError::unknown_value("kind", other)),
        }
    }
}

/// A portal event.
///
/// `target_user_ids` and `target_roles` narrow delivery; both empty means a
/// global broadcast. Targeting is resolved through [`Event::delivery`], which
/// applies the user-over-role precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique id for this event instance.
    pub id: EventId,

    /// What happened.
    pub kind: EventKind,

    /// Kind-specific payload, passed through untouched.
    pub payload: JsonValue,

    /// When the event was constructed.
    pub occurred_at: Timestamp,

    /// User whose action produced the event, if attributable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_user_id: Option<UserId>,

    /// Role of the originating user at the time of the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_role: Option<Role>,

    /// Specific recipients. Non-empty wins over `target_roles`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_user_ids: Vec<UserId>,

    /// Role-wide recipients. Consulted only when `target_user_ids` is empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_roles: Vec<Role>,
}

impl Event {
    /// Creates an untargeted event (global broadcast) with a fresh id and
    /// the current timestamp.
    pub fn new(kind: EventKind, payload: JsonValue) -> Self {
        Self {
            id: EventId::new(),
            kind,
            payload,
            occurred_at: Timestamp::now(),
            origin_user_id: None,
            origin_role: None,
            target_user_ids: Vec::new(),
            target_roles: Vec::new(),
        }
    }

    /// Targets the event at specific users.
    pub fn for_users(mut self, user_ids: impl IntoIterator<Item = UserId>) -> Self {
        self.target_user_ids = user_ids.into_iter().collect();
        self
    }

    /// Targets the event at whole roles.
    pub fn for_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.target_roles = roles.into_iter().collect();
        self
    }

    /// Attributes the event to the user whose action produced it.
    pub fn with_origin(mut self, user_id: UserId, role: Role) -> Self {
        self.origin_user_id = Some(user_id);
        self.origin_role = Some(role);
        self
    }

    /// Resolves the single delivery mode for this event.
    ///
    /// Precedence: user targets, then role targets, then global broadcast.
    pub fn delivery(&self) -> Delivery<'_> {
        if !self.target_user_ids.is_empty() {
            Delivery::Users(&self.target_user_ids)
        } else if !self.target_roles.is_empty() {
            Delivery::Roles(&self.target_roles)
        } else {
            Delivery::Broadcast
        }
    }
}
