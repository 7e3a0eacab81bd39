//! Broadcast adapter - the in-process event broadcaster.

mod broadcaster;

pub use broadcaster::Broadcaster;
