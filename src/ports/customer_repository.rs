//! CustomerRepository port for CRM persistence operations.

use async_trait::async_trait;

use crate::domain::{
    crm::Customer,
    foundation::{CustomerId, DomainError},
};

/// Repository for managing customer records.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Store a new customer record.
    async fn create(&self, customer: &Customer) -> Result<(), DomainError>;

    /// Replace an existing customer record.
    async fn update(&self, customer: &Customer) -> Result<(), DomainError>;

    /// Find a customer by id.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError>;

    /// List all customers, newest first.
    async fn list(&self) -> Result<Vec<Customer>, DomainError>;

    /// Delete a customer record.
    ///
    /// Returns `CustomerNotFound` if the id is unknown.
    async fn delete(&self, id: CustomerId) -> Result<(), DomainError>;
}
