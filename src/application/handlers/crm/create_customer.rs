//! CreateCustomerHandler - Command handler for adding customers.

use std::sync::Arc;

use crate::domain::crm::Customer;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::CustomerRepository;

/// Command to create a customer record.
#[derive(Debug, Clone)]
pub struct CreateCustomerCommand {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    /// Agent responsible for this customer, if assigned at creation.
    pub owner_id: Option<UserId>,
}

/// Handler for creating customers.
///
/// The `crm-update` event for a successful creation is recorded by the
/// HTTP recording middleware, not here.
pub struct CreateCustomerHandler {
    repository: Arc<dyn CustomerRepository>,
}

impl CreateCustomerHandler {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateCustomerCommand) -> Result<Customer, DomainError> {
        let customer = Customer::new(cmd.name, cmd.email, cmd.company, cmd.owner_id)?;

        self.repository.create(&customer).await?;

        tracing::info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }
}
