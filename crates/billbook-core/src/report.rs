//! # Sales Report Aggregation
//!
//! Pure aggregation over bill line items. Reporting owns no state: the
//! storage layer selects the line items for a date range (soft-deleted
//! bills excluded) and this module folds them into per-product rows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::money::{Money, Quantity};
use crate::types::BillItem;

/// Aggregated sales for one product over the reporting window.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub product_id: String,

    /// Name as snapshotted on the bills (a renamed product groups under
    /// each name it sold under).
    pub product_name: String,

    /// Σ quantity across all matching line items.
    pub total_quantity: Quantity,

    /// Σ line totals across all matching line items.
    pub total_revenue: Money,

    /// Number of line-item rows in the group. An approximation of distinct
    /// invoices: a bill listing the same product on two lines counts twice.
    pub invoice_count: u32,
}

/// Groups line items by (product_id, product_name) and sums quantity and
/// revenue per group. Output is sorted by revenue, highest first; ties
/// break on product name for a stable order.
pub fn sales_by_product<'a, I>(items: I) -> Vec<ProductSales>
where
    I: IntoIterator<Item = &'a BillItem>,
{
    let mut groups: HashMap<(String, String), ProductSales> = HashMap::new();

    for item in items {
        let key = (item.product_id.clone(), item.product_name.clone());
        let entry = groups.entry(key).or_insert_with(|| ProductSales {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            total_quantity: Quantity::zero(),
            total_revenue: Money::zero(),
            invoice_count: 0,
        });

        entry.total_quantity = entry.total_quantity + item.quantity;
        entry.total_revenue += item.line_total;
        entry.invoice_count += 1;
    }

    let mut rows: Vec<ProductSales> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    rows
}

// =============================================================================
// Unit Tests
// =============================================================================
