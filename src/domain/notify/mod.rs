//! Notification domain module.
//!
//! The vocabulary and rules of the portal's realtime notifications:
//!
//! - `event` - Event kinds, ids, and the event record itself
//! - `targeting` - Who receives an event (user > role > broadcast precedence)
//! - `history` - Bounded sliding window of recent events

mod event;
mod history;
mod targeting;

pub use event::{Event, EventId, EventKind};
pub use history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
pub use targeting::{Delivery, Membership};
