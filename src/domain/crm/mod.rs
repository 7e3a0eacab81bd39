//! CRM domain module.
//!
//! A thin slice of the agency's customer book: the `Customer` aggregate and
//! its lifecycle status. Mutations to this module's records are what the
//! portal surfaces as `crm-update` events.

mod customer;

pub use customer::{Customer, CustomerStatus, CustomerUpdate};
