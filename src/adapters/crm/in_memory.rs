//! In-Memory Customer Repository Adapter
//!
//! Stores customer records in memory behind a `tokio::sync::RwLock`.
//! This is the portal's current persistence layer; a database-backed
//! implementation can replace it behind the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::crm::Customer;
use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};
use crate::ports::CustomerRepository;

/// In-memory storage for customer records
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored records (useful for tests)
    pub async fn clear(&self) {
        self.customers.write().await.clear();
    }

    /// Get the number of stored customers
    pub async fn count(&self) -> usize {
        self.customers.read().await.len()
    }

    fn duplicate_email_error(email: &str) -> DomainError {
        DomainError::new(
            ErrorCode::DuplicateEmail,
            "a customer with this email already exists",
        )
        .with_detail("email", email)
    }

    fn not_found_error(id: CustomerId) -> DomainError {
        DomainError::new(ErrorCode::CustomerNotFound, "customer not found")
            .with_detail("customer_id", id.to_string())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, customer: &Customer) -> Result<(), DomainError> {
        let mut customers = self.customers.write().await;

        let email_taken = customers
            .values()
            .any(|c| c.email.eq_ignore_ascii_case(&customer.email));
        if email_taken {
            return Err(Self::duplicate_email_error(&customer.email));
        }

        customers.insert(customer.id, customer.clone());
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<(), DomainError> {
        let mut customers = self.customers.write().await;

        if !customers.contains_key(&customer.id) {
            return Err(Self::not_found_error(customer.id));
        }

        let email_taken = customers
            .values()
            .any(|c| c.id != customer.id && c.email.eq_ignore_ascii_case(&customer.email));
        if email_taken {
            return Err(Self::duplicate_email_error(&customer.email));
        }

        customers.insert(customer.id, customer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, DomainError> {
        let customers = self.customers.read().await;
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        // Newest first; id as a tie-breaker keeps ordering stable.
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.to_string().cmp(&a.id.to_string()))
        });
        Ok(all)
    }

    async fn delete(&self, id: CustomerId) -> Result<(), DomainError> {
        let mut customers = self.customers.write().await;
        if customers.remove(&id).is_none() {
            return Err(Self::not_found_error(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crm::{CustomerStatus, CustomerUpdate};

    fn test_customer(name: &str, email: &str) -> Customer {
        Customer::new(name, email, None, None).unwrap()
    }

    #[tokio::test]
    async fn create_and_find_by_id() {
        let repo = InMemoryCustomerRepository::new();
        let customer = test_customer("Acme Corp", "contact@acme.example");

        repo.create(&customer).await.unwrap();

        let found = repo.find_by_id(customer.id).await.unwrap();
        assert_eq!(found.unwrap().name, "Acme Corp");
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown() {
        let repo = InMemoryCustomerRepository::new();

        let found = repo.find_by_id(CustomerId::new()).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let repo = InMemoryCustomerRepository::new();
        repo.create(&test_customer("First", "shared@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(&test_customer("Second", "SHARED@example.com"))
            .await;

        match result {
            Err(err) => assert_eq!(err.code, ErrorCode::DuplicateEmail),
            Ok(_) => panic!("expected duplicate email rejection"),
        }
    }

    #[tokio::test]
    async fn update_replaces_record() {
        let repo = InMemoryCustomerRepository::new();
        let mut customer = test_customer("Acme Corp", "contact@acme.example");
        repo.create(&customer).await.unwrap();

        customer
            .apply_update(CustomerUpdate {
                status: Some(CustomerStatus::Active),
                ..Default::default()
            })
            .unwrap();
        repo.update(&customer).await.unwrap();

        let found = repo.find_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(found.status, CustomerStatus::Active);
    }

    #[tokio::test]
    async fn update_unknown_customer_returns_not_found() {
        let repo = InMemoryCustomerRepository::new();
        let customer = test_customer("Ghost", "ghost@example.com");

        let result = repo.update(&customer).await;

        match result {
            Err(err) => assert_eq!(err.code, ErrorCode::CustomerNotFound),
            Ok(_) => panic!("expected not found"),
        }
    }

    #[tokio::test]
    async fn update_rejects_email_already_used_by_another_customer() {
        let repo = InMemoryCustomerRepository::new();
        repo.create(&test_customer("First", "first@example.com"))
            .await
            .unwrap();
        let mut second = test_customer("Second", "second@example.com");
        repo.create(&second).await.unwrap();

        second
            .apply_update(CustomerUpdate {
                email: Some("first@example.com".to_string()),
                ..Default::default()
            })
            .unwrap();
        let result = repo.update(&second).await;

        match result {
            Err(err) => assert_eq!(err.code, ErrorCode::DuplicateEmail),
            Ok(_) => panic!("expected duplicate email rejection"),
        }
    }

    #[tokio::test]
    async fn update_keeping_own_email_is_allowed() {
        let repo = InMemoryCustomerRepository::new();
        let mut customer = test_customer("Acme Corp", "contact@acme.example");
        repo.create(&customer).await.unwrap();

        customer
            .apply_update(CustomerUpdate {
                name: Some("Acme Corporation".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert!(repo.update(&customer).await.is_ok());
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let repo = InMemoryCustomerRepository::new();

        let mut older = test_customer("Older", "older@example.com");
        older.created_at = crate::domain::foundation::Timestamp::from_unix_secs(1_700_000_000);
        let mut newer = test_customer("Newer", "newer@example.com");
        newer.created_at = crate::domain::foundation::Timestamp::from_unix_secs(1_700_000_100);

        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let all = repo.list().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Newer");
        assert_eq!(all[1].name, "Older");
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let repo = InMemoryCustomerRepository::new();
        let customer = test_customer("Acme Corp", "contact@acme.example");
        repo.create(&customer).await.unwrap();

        repo.delete(customer.id).await.unwrap();

        assert!(repo.find_by_id(customer.id).await.unwrap().is_none());
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn delete_unknown_customer_returns_not_found() {
        let repo = InMemoryCustomerRepository::new();

        let result = repo.delete(CustomerId::new()).await;

        match result {
            Err(err) => assert_eq!(err.code, ErrorCode::CustomerNotFound),
            Ok(_) => panic!("expected not found"),
        }
    }

    #[tokio::test]
    async fn clear_empties_repository() {
        let repo = InMemoryCustomerRepository::new();
        repo.create(&test_customer("One", "one@example.com"))
            .await
            .unwrap();
        repo.create(&test_customer("Two", "two@example.com"))
            .await
            .unwrap();

        assert_eq!(repo.count().await, 2);

        repo.clear().await;

        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn repository_is_shareable_across_tasks() {
        let repo = InMemoryCustomerRepository::new();
        let customer = test_customer("Acme Corp", "contact@acme.example");
        let id = customer.id;

        let writer = repo.clone();
        let handle = tokio::spawn(async move {
            writer.create(&customer).await.unwrap();
        });
        handle.await.unwrap();

        assert!(repo.find_by_id(id).await.unwrap().is_some());
    }
}
