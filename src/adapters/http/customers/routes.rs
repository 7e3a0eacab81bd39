//! Axum router configuration for customer endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{
    create_customer, delete_customer, get_customer, list_customers, update_customer,
    CustomersAppState,
};

/// Create the customers API router.
///
/// # Routes
///
/// ## Staff Endpoints (require admin or agent role)
/// - `GET /` - List customers, newest first
/// - `POST /` - Create a customer
/// - `GET /:id` - Get a single customer
/// - `PUT /:id` - Update a customer
/// - `DELETE /:id` - Delete a customer
pub fn customer_routes() -> Router<CustomersAppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}
