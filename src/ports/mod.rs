//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing portal events
//! - `EventSubscriber` - Port for registering broadcast channels
//! - `DeliveryHandler` - Callback that receives delivered events
//! - `EventBroadcast` - Combined publisher + subscriber
//!
//! ## Auth Ports
//!
//! - `TokenVerifier` - Bearer token verification
//!
//! ## CRM Ports
//!
//! - `CustomerRepository` - Customer record persistence

mod customer_repository;
mod event_publisher;
mod event_subscriber;
mod token_verifier;

pub use customer_repository::CustomerRepository;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{DeliveryHandler, EventBroadcast, EventSubscriber};
pub use token_verifier::TokenVerifier;
