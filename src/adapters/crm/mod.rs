//! CRM adapters.
//!
//! Implementations of the `CustomerRepository` port:
//!
//! - `in_memory` - In-memory store used by the portal today

mod in_memory;

pub use in_memory::InMemoryCustomerRepository;
