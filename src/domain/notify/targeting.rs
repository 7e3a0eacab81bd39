//! Delivery targeting rules.
//!
//! Resolving who receives an event is pure domain logic: no transport, no
//! I/O, no failure mode. The broadcaster and the realtime gateway both route
//! through [`Delivery::matches`] so the precedence rules live in one place.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{Role, UserId};

/// The resolved delivery mode of an event. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery<'a> {
    /// Deliver only to these users.
    Users(&'a [UserId]),
    /// Deliver to every user holding one of these roles.
    Roles(&'a [Role]),
    /// Deliver to everyone.
    Broadcast,
}

impl Delivery<'_> {
    /// Whether an event with this delivery mode reaches the given membership.
    pub fn matches(&self, membership: &Membership) -> bool {
        match self {
            Delivery::Users(user_ids) => user_ids.iter().any(|id| membership.user_ids.contains(id)),
            Delivery::Roles(roles) => roles.iter().any(|role| membership.roles.contains(role)),
            Delivery::Broadcast => true,
        }
    }
}

/// The identities a consumer listens as.
///
/// A connected portal client is typically one user id plus one role, but the
/// type carries sets so aggregate consumers (audit sinks, dashboards) fit
/// the same predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_ids: HashSet<UserId>,
    pub roles: HashSet<Role>,
}

impl Membership {
    /// Creates an empty membership. Matches only broadcasts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the membership of a single signed-in user.
    pub fn of_user(user_id: UserId, role: Role) -> Self {
        Self {
            user_ids: HashSet::from([user_id]),
            roles: HashSet::from([role]),
        }
    }

    /// Adds a user id to this membership.
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_ids.insert(user_id);
        self
    }

    /// Adds a role to this membership.
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }
}
