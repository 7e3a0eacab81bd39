//! GetCustomerHandler - Query handler for fetching a single customer.

use std::sync::Arc;

use crate::domain::crm::Customer;
use crate::domain::foundation::{CustomerId, DomainError};
use crate::ports::CustomerRepository;

/// Query for a single customer by id.
#[derive(Debug, Clone)]
pub struct GetCustomerQuery {
    pub customer_id: CustomerId,
}

/// Handler for customer lookups.
pub struct GetCustomerHandler {
    repository: Arc<dyn CustomerRepository>,
}

impl GetCustomerHandler {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetCustomerQuery) -> Result<Option<Customer>, DomainError> {
        self.repository.find_by_id(query.customer_id).await
    }
}
