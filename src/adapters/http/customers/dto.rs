//! HTTP DTOs (Data Transfer Objects) for customer endpoints.
//!
//! These types define the JSON request/response structure for the customer
//! API. They serve as the boundary between HTTP and the application layer.

use crate::domain::crm::{Customer, CustomerStatus};
use serde::{Deserialize, Deserializer, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a customer record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerRequest {
    /// Display name (person or company contact).
    pub name: String,
    /// Primary contact email.
    pub email: String,
    /// Company name, if distinct from the contact.
    #[serde(default)]
    pub company: Option<String>,
    /// Agent assigned to this account.
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Request to update a customer record.
///
/// Omitted fields are left untouched. For `company` and `owner_id` an
/// explicit JSON `null` clears the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<CustomerStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub owner_id: Option<Option<String>>,
}

/// Deserializes a present field (including `null`) as `Some`, so a missing
/// field and an explicit `null` stay distinguishable.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A customer record as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    /// Customer id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Primary contact email.
    pub email: String,
    /// Company name, if any.
    pub company: Option<String>,
    /// Lifecycle stage.
    pub status: CustomerStatus,
    /// Assigned agent, if any.
    pub owner_id: Option<String>,
    /// When the record was created (ISO 8601).
    pub created_at: String,
    /// When the record was last updated (ISO 8601).
    pub updated_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name,
            email: customer.email,
            company: customer.company,
            status: customer.status,
            owner_id: customer.owner_id.map(|id| id.to_string()),
            created_at: customer.created_at.as_datetime().to_rfc3339(),
            updated_at: customer.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for the customer listing, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerListResponse {
    /// The customers, newest first.
    pub customers: Vec<CustomerResponse>,
    /// Number of customers returned.
    pub count: usize,
}
