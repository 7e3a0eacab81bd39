//! ListCustomersHandler - Query handler for the customer collection.

use std::sync::Arc;

use crate::domain::crm::Customer;
use crate::domain::foundation::DomainError;
use crate::ports::CustomerRepository;

/// Query for the full customer list, newest first.
#[derive(Debug, Clone, Default)]
pub struct ListCustomersQuery;

/// Handler for listing customers.
pub struct ListCustomersHandler {
    repository: Arc<dyn CustomerRepository>,
}

impl ListCustomersHandler {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, _query: ListCustomersQuery) -> Result<Vec<Customer>, DomainError> {
        self.repository.list().await
    }
}
