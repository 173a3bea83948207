//! # Bill Handlers
//!
//! The POST handler is the HTTP face of the checkout workflow: it maps the
//! request into a [`CheckoutRequest`] and lets billbook-db run the whole
//! thing as one transaction. Everything else is reads plus a soft delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;

use crate::dto::{BillResponse, CreateBillRequest, DateRangeQuery};
use crate::error::ApiError;
use crate::identity::Identity;
use crate::AppState;
use billbook_db::checkout::{self, CheckoutRequest};
use billbook_db::BillFilter;

/// `GET /bills?startDate=&endDate=&includeDeleted=` - newest first.
pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let repo = state.db.bills();

    let filter = BillFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        include_deleted: query.include_deleted,
    };

    let bills = repo.list(&filter).await?;

    let mut responses = Vec::with_capacity(bills.len());
    for bill in bills {
        let items = repo.items(&bill.id).await?;
        responses.push(BillResponse::from_parts(bill, items));
    }

    Ok(Json(responses))
}

/// `GET /bills/{id}`
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BillResponse>, ApiError> {
    let outcome = checkout::load_bill(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bill", &id))?;

    Ok(Json(BillResponse::from_parts(outcome.bill, outcome.items)))
}

/// `POST /bills` - the bill-creation workflow.
pub async fn create_bill(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<BillResponse>), ApiError> {
    let disposition = request.disposition();

    let checkout_request = CheckoutRequest {
        lines: request.items.into_iter().map(Into::into).collect(),
        customer_name: request.customer_name,
        customer_email: request.customer_email,
        customer_mobile: request.customer_mobile,
        discount: request.discount_amount,
        disposition,
        created_by: identity.email.clone(),
    };

    let outcome = checkout::create_bill(&state.db, checkout_request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BillResponse::from_parts(outcome.bill, outcome.items)),
    ))
}

/// `DELETE /bills/{id}` - soft delete, admin-only. Stock and balances are
/// deliberately left untouched; deleting a bill is a display-level retraction,
/// not a reversal.
pub async fn delete_bill(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    identity.require_admin()?;

    state.db.bills().soft_delete(&id).await?;
    info!(id = %id, by = %identity.email, "Bill soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}
