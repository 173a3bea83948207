//! # Report Handlers
//!
//! The storage layer narrows line items to the requested window; the
//! aggregation itself is the pure function in billbook-core.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::dto::{DateRangeQuery, SalesReportRow};
use crate::error::ApiError;
use crate::AppState;
use billbook_core::report::sales_by_product;

/// `GET /reports/sales?startDate=&endDate=` - per-product sales ranked by
/// revenue, across all bills in range regardless of settlement status.
pub async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<SalesReportRow>>, ApiError> {
    let items = state
        .db
        .bills()
        .list_items_in_range(query.start_date, query.end_date)
        .await?;

    let rows = sales_by_product(&items);

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
