//! HTTP adapter for customer endpoints.
//!
//! Exposes the customer book via REST API:
//! - `GET /api/customers` - List customers, newest first (staff)
//! - `POST /api/customers` - Create a customer (staff)
//! - `GET /api/customers/:id` - Get a single customer (staff)
//! - `PUT /api/customers/:id` - Update a customer (staff)
//! - `DELETE /api/customers/:id` - Delete a customer (staff)

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateCustomerRequest, CustomerListResponse, CustomerResponse, UpdateCustomerRequest,
};
pub use handlers::CustomersAppState;
pub use routes::customer_routes;
