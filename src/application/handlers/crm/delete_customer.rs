//! DeleteCustomerHandler - Command handler for removing customers.

use std::sync::Arc;

use crate::domain::foundation::{CustomerId, DomainError};
use crate::ports::CustomerRepository;

/// Command to delete a customer record.
#[derive(Debug, Clone)]
pub struct DeleteCustomerCommand {
    pub customer_id: CustomerId,
}

/// Handler for deleting customers.
pub struct DeleteCustomerHandler {
    repository: Arc<dyn CustomerRepository>,
}

impl DeleteCustomerHandler {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteCustomerCommand) -> Result<(), DomainError> {
        self.repository.delete(cmd.customer_id).await?;

        tracing::info!(customer_id = %cmd.customer_id, "customer deleted");
        Ok(())
    }
}
