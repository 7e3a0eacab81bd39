//! UpdateCustomerHandler - Command handler for editing customers.

use std::sync::Arc;

use crate::domain::crm::{Customer, CustomerUpdate};
use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};
use crate::ports::CustomerRepository;

/// Command to apply a partial update to a customer record.
#[derive(Debug, Clone)]
pub struct UpdateCustomerCommand {
    pub customer_id: CustomerId,
    pub update: CustomerUpdate,
}

/// Handler for updating customers.
pub struct UpdateCustomerHandler {
    repository: Arc<dyn CustomerRepository>,
}

impl UpdateCustomerHandler {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateCustomerCommand) -> Result<Customer, DomainError> {
        let mut customer = self
            .repository
            .find_by_id(cmd.customer_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::CustomerNotFound, "customer not found")
                    .with_detail("customer_id", cmd.customer_id.to_string())
            })?;

        customer.apply_update(cmd.update)?;
        self.repository.update(&customer).await?;

        tracing::info!(customer_id = %customer.id, "customer updated");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::crm::InMemoryCustomerRepository;
    use crate::domain::crm::CustomerStatus;

    async fn seeded_repo() -> (Arc<InMemoryCustomerRepository>, Customer) {
        let repo = Arc::new(InMemoryCustomerRepository::new());
        let customer = Customer::new("Acme Corp", "contact@acme.example", None, None).unwrap();
        repo.create(&customer).await.unwrap();
        (repo, customer)
    }

    #[tokio::test]
    async fn updates_status_and_persists() {
        let (repo, customer) = seeded_repo().await;
        let handler = UpdateCustomerHandler::new(repo.clone());

        let updated = handler
            .handle(UpdateCustomerCommand {
                customer_id: customer.id,
                update: CustomerUpdate {
                    status: Some(CustomerStatus::Active),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.status, CustomerStatus::Active);
        let stored = repo.find_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CustomerStatus::Active);
    }

    #[tokio::test]
    async fn unknown_customer_yields_not_found() {
        let repo = Arc::new(InMemoryCustomerRepository::new());
        let handler = UpdateCustomerHandler::new(repo);

        let result = handler
            .handle(UpdateCustomerCommand {
                customer_id: CustomerId::new(),
                update: CustomerUpdate::default(),
            })
            .await;

        match result {
            Err(err) => assert_eq!(err.code, ErrorCode::CustomerNotFound),
            Ok(_) => panic!("expected not found"),
        }
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_unchanged() {
        let (repo, customer) = seeded_repo().await;
        let handler = UpdateCustomerHandler::new(repo.clone());

        let result = handler
            .handle(UpdateCustomerCommand {
                customer_id: customer.id,
                update: CustomerUpdate {
                    email: Some("bogus".to_string()),
                    ..Default::default()
                },
            })
            .await;

        assert!(result.is_err());
        let stored = repo.find_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "contact@acme.example");
    }

    #[tokio::test]
    async fn touches_updated_at() {
        let (repo, customer) = seeded_repo().await;
        let handler = UpdateCustomerHandler::new(repo);

        let updated = handler
            .handle(UpdateCustomerCommand {
                customer_id: customer.id,
                update: CustomerUpdate {
                    name: Some("Acme Corporation".to_string()),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert!(!updated.updated_at.is_before(&customer.updated_at));
    }
}
