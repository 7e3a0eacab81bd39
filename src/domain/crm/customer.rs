//! Customer aggregate entity.
//!
//! A customer is an agency account in the portal CRM: a company or person
//! the agency does work for. An agent may be assigned as owner.

use crate::domain::foundation::{CustomerId, Timestamp, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustomerStatus {
    Lead,
    Active,
    Churned,
}

impl CustomerStatus {
    /// Returns the wire-format identifier for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Lead => "lead",
            CustomerStatus::Active => "active",
            CustomerStatus::Churned => "churned",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(CustomerStatus::Lead),
            "active" => Ok(CustomerStatus::Active),
            "churned" => Ok(CustomerStatus::Churned),
            other => Err(ValidationError::unknown_value("status", other)),
        }
    }
}

/// Customer aggregate.
///
/// # Invariants
///
/// - `name` is non-empty
/// - `email` is non-empty and contains `@`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier for this customer.
    pub id: CustomerId,

    /// Display name (person or company contact).
    pub name: String,

    /// Primary contact email.
    pub email: String,

    /// Company name, if distinct from the contact.
    pub company: Option<String>,

    /// Lifecycle stage.
    pub status: CustomerStatus,

    /// Agent assigned to this account, if any.
    pub owner_id: Option<UserId>,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When the record was last updated.
    pub updated_at: Timestamp,
}

/// Field changes applied by [`Customer::apply_update`].
///
/// `None` leaves the field untouched; `company` and `owner_id` use a nested
/// Option so callers can clear them explicitly.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<Option<String>>,
    pub status: Option<CustomerStatus>,
    pub owner_id: Option<Option<UserId>>,
}

impl Customer {
    /// Create a new customer record as a lead.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is empty or the email is
    /// malformed.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        company: Option<String>,
        owner_id: Option<UserId>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let email = email.into();
        Self::validate_name(&name)?;
        Self::validate_email(&email)?;

        let now = Timestamp::now();
        Ok(Self {
            id: CustomerId::new(),
            name,
            email,
            company,
            status: CustomerStatus::Lead,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update, revalidating changed fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a changed field is invalid; the record
    /// is left untouched in that case.
    pub fn apply_update(&mut self, update: CustomerUpdate) -> Result<(), ValidationError> {
        if let Some(name) = &update.name {
            Self::validate_name(name)?;
        }
        if let Some(email) = &update.email {
            Self::validate_email(email)?;
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(company) = update.company {
            self.company = company;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(owner_id) = update.owner_id {
            self.owner_id = owner_id;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn validate_name(name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(())
    }

    fn validate_email(email: &str) -> Result<(), ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        Ok(())
    }
}
