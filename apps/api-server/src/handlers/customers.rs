//! # Customer Handlers
//!
//! Ledger CRUD. The mobile number is the business key: bills find
//! customers through `GET /customers/mobile/{mobile}`, and checkout
//! creates ledger entries on the fly - this surface covers the explicit
//! management paths.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use tracing::info;

use crate::dto::{CreateCustomerRequest, CustomerResponse, ListQuery, UpdateCustomerRequest};
use crate::error::ApiError;
use crate::identity::Identity;
use crate::AppState;
use billbook_core::validation::{validate_email, validate_mobile, validate_name};
use billbook_core::Customer;
use billbook_db::repository::customer::generate_customer_id;

/// `GET /customers?includeDeleted=`
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.db.customers().list(query.include_deleted).await?;

    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// `GET /customers/{id}`
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", &id))?;

    Ok(Json(customer.into()))
}

/// `GET /customers/mobile/{mobile}` - lookup by the business key.
pub async fn get_customer_by_mobile(
    State(state): State<AppState>,
    Path(mobile): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .db
        .customers()
        .get_by_mobile(&mobile)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", &mobile))?;

    Ok(Json(customer.into()))
}

/// `POST /customers`
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    validate_name("name", &request.name)?;
    validate_mobile(&request.mobile)?;
    if let Some(email) = &request.email {
        validate_email(email)?;
    }

    let now = Utc::now();
    let customer = Customer {
        id: generate_customer_id(),
        name: request.name.trim().to_string(),
        mobile: request.mobile.trim().to_string(),
        email: request.email,
        balance: request.balance,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    let inserted = state.db.customers().insert(&customer).await?;
    info!(id = %inserted.id, mobile = %inserted.mobile, "Customer created");

    Ok((StatusCode::CREATED, Json(inserted.into())))
}

/// `PUT /customers/{id}` - full replace, including manual balance
/// corrections.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    validate_name("name", &request.name)?;
    validate_mobile(&request.mobile)?;
    if let Some(email) = &request.email {
        validate_email(email)?;
    }

    let repo = state.db.customers();

    let mut customer = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", &id))?;

    customer.name = request.name.trim().to_string();
    customer.mobile = request.mobile.trim().to_string();
    customer.email = request.email;
    customer.balance = request.balance;

    repo.update(&customer).await?;
    info!(id = %id, "Customer updated");

    let reloaded = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", &id))?;

    Ok(Json(reloaded.into()))
}

/// `DELETE /customers/{id}` - soft delete, admin-only.
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    identity.require_admin()?;

    state.db.customers().soft_delete(&id).await?;
    info!(id = %id, by = %identity.email, "Customer soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}
