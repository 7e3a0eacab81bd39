//! HTTP handlers for customer endpoints.
//!
//! All routes require a staff role (admin or agent). Mutating handlers attach
//! an [`EventDetail`] to the response so the recording middleware can fold the
//! outcome into the `crm-update` event it publishes.
//!
//! [`EventDetail`]: crate::adapters::http::middleware::EventDetail

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{with_event_detail, RequireStaff};
use crate::application::handlers::crm::{
    CreateCustomerCommand, CreateCustomerHandler, DeleteCustomerCommand, DeleteCustomerHandler,
    GetCustomerHandler, GetCustomerQuery, ListCustomersHandler, ListCustomersQuery,
    UpdateCustomerCommand, UpdateCustomerHandler,
};
use crate::domain::crm::CustomerUpdate;
use crate::domain::foundation::{CustomerId, UserId};
use crate::ports::CustomerRepository;

use super::dto::{
    CreateCustomerRequest, CustomerListResponse, CustomerResponse, UpdateCustomerRequest,
};

/// Shared state for customer endpoints.
#[derive(Clone)]
pub struct CustomersAppState {
    pub repository: Arc<dyn CustomerRepository>,
}

impl CustomersAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_customer_handler(&self) -> CreateCustomerHandler {
        CreateCustomerHandler::new(self.repository.clone())
    }

    pub fn update_customer_handler(&self) -> UpdateCustomerHandler {
        UpdateCustomerHandler::new(self.repository.clone())
    }

    pub fn delete_customer_handler(&self) -> DeleteCustomerHandler {
        DeleteCustomerHandler::new(self.repository.clone())
    }

    pub fn get_customer_handler(&self) -> GetCustomerHandler {
        GetCustomerHandler::new(self.repository.clone())
    }

    pub fn list_customers_handler(&self) -> ListCustomersHandler {
        ListCustomersHandler::new(self.repository.clone())
    }
}

fn parse_customer_id(raw: &str) -> Result<CustomerId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("invalid customer id"))
}

/// POST /api/customers
///
/// Creates a customer record and returns `201 Created`.
pub async fn create_customer(
    State(state): State<CustomersAppState>,
    RequireStaff(_user): RequireStaff,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<Response, ApiError> {
    let owner_id = request.owner_id.map(UserId::new).transpose()?;

    let handler = state.create_customer_handler();
    let cmd = CreateCustomerCommand {
        name: request.name,
        email: request.email,
        company: request.company,
        owner_id,
    };

    let customer = handler.handle(cmd).await?;

    let detail = json!({
        "customer_id": customer.id.to_string(),
        "action": "created",
        "name": customer.name.clone(),
    });
    let response =
        (StatusCode::CREATED, Json(CustomerResponse::from(customer))).into_response();

    Ok(with_event_detail(response, detail))
}

/// GET /api/customers
///
/// Lists the customer book, newest first.
pub async fn list_customers(
    State(state): State<CustomersAppState>,
    RequireStaff(_user): RequireStaff,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.list_customers_handler();
    let customers = handler.handle(ListCustomersQuery).await?;

    let customers: Vec<CustomerResponse> =
        customers.into_iter().map(CustomerResponse::from).collect();
    let response = CustomerListResponse {
        count: customers.len(),
        customers,
    };

    Ok(Json(response))
}

/// GET /api/customers/:id
pub async fn get_customer(
    State(state): State<CustomersAppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let customer_id = parse_customer_id(&id)?;

    let handler = state.get_customer_handler();
    let customer = handler
        .handle(GetCustomerQuery { customer_id })
        .await?
        .ok_or_else(|| ApiError::not_found("customer", &id))?;

    Ok(Json(CustomerResponse::from(customer)))
}

/// PUT /api/customers/:id
///
/// Applies a partial update. Omitted fields stay as they are; explicit
/// `null` clears `company` or `owner_id`.
pub async fn update_customer(
    State(state): State<CustomersAppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<String>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Response, ApiError> {
    let customer_id = parse_customer_id(&id)?;

    let owner_id = match request.owner_id {
        Some(Some(raw)) => Some(Some(UserId::new(raw)?)),
        Some(None) => Some(None),
        None => None,
    };
    let update = CustomerUpdate {
        name: request.name,
        email: request.email,
        company: request.company,
        status: request.status,
        owner_id,
    };

    let handler = state.update_customer_handler();
    let customer = handler
        .handle(UpdateCustomerCommand {
            customer_id,
            update,
        })
        .await?;

    let detail = json!({
        "customer_id": customer.id.to_string(),
        "action": "updated",
        "status": customer.status,
    });
    let response = Json(CustomerResponse::from(customer)).into_response();

    Ok(with_event_detail(response, detail))
}

/// DELETE /api/customers/:id
///
/// Removes a customer record and returns `204 No Content`.
pub async fn delete_customer(
    State(state): State<CustomersAppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let customer_id = parse_customer_id(&id)?;

    let handler = state.delete_customer_handler();
    handler.handle(DeleteCustomerCommand { customer_id }).await?;

    let detail = json!({
        "customer_id": customer_id.to_string(),
        "action": "deleted",
    });
    let response = StatusCode::NO_CONTENT.into_response();

    Ok(with_event_detail(response, detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::crm::InMemoryCustomerRepository;
    use crate::domain::crm::Customer;

    fn test_state() -> (CustomersAppState, Arc<InMemoryCustomerRepository>) {
        let repository = Arc::new(InMemoryCustomerRepository::new());
        let state = CustomersAppState {
            repository: repository.clone(),
        };
        (state, repository)
    }

    #[test]
    fn parse_customer_id_rejects_garbage() {
        assert!(parse_customer_id("not-a-uuid").is_err());
    }

    #[test]
    fn parse_customer_id_accepts_uuid() {
        let id = CustomerId::new();
        assert_eq!(parse_customer_id(&id.to_string()).unwrap(), id);
    }

    #[tokio::test]
    async fn state_handlers_share_the_repository() {
        let (state, repository) = test_state();
        let customer = Customer::new("Acme", "a@acme.example", None, None).unwrap();
        repository.create(&customer).await.unwrap();

        let found = state
            .get_customer_handler()
            .handle(GetCustomerQuery {
                customer_id: customer.id,
            })
            .await
            .unwrap();

        assert!(found.is_some());
    }
}
