//! Customer handlers.
//!
//! Command and query handlers for the customer book:
//!
//! ## Commands
//! - Creating customer records
//! - Updating customer details and lifecycle status
//! - Deleting customer records
//!
//! ## Queries
//! - Get a single customer
//! - List the customer book, newest first

mod create_customer;
mod delete_customer;
mod get_customer;
mod list_customers;
mod update_customer;

// Commands
pub use create_customer::{CreateCustomerCommand, CreateCustomerHandler};
pub use delete_customer::{DeleteCustomerCommand, DeleteCustomerHandler};
pub use update_customer::{UpdateCustomerCommand, UpdateCustomerHandler};

// Queries
pub use get_customer::{GetCustomerHandler, GetCustomerQuery};
pub use list_customers::{ListCustomersHandler, ListCustomersQuery};
