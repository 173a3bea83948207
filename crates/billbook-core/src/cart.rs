//! # Cart & Bill Math
//!
//! Pure pricing logic for the billing workflow: resolving a cart against a
//! catalog snapshot, freezing prices, and computing bill totals. No I/O -
//! the storage layer fetches products and persists the result.
//!
//! ## Where This Sits in Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bill Creation Data Flow                             │
//! │                                                                         │
//! │  Client cart: [{product_id, quantity}, ...]                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_cart(lines, catalog)      ← drops invalid lines, freezes        │
//! │       │                            name + sell price per line          │
//! │       ▼                                                                 │
//! │  compute_totals(priced, discount, tax, disposition)                     │
//! │       │                                                                 │
//! │       ├── subtotal  = Σ line totals                                     │
//! │       ├── total     = subtotal − discount + tax                         │
//! │       ├── amount_paid per disposition                                   │
//! │       └── status    = paid | overdue                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  balance_delta() = total − amount_paid  ──► customer ledger             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog sell price is authoritative: any price the client sent with
//! the cart is ignored.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Quantity};
use crate::types::{BillStatus, Product};

// =============================================================================
// Cart Input
// =============================================================================

/// One requested line of a cart, as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product id.
    pub product_id: String,

    /// Requested quantity. Partial units allowed.
    pub quantity: Quantity,
}

/// How the customer settled the bill at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDisposition {
    /// Paid in full: amount_paid is set equal to the computed total.
    Paid,
    /// An explicit amount was handed over; may be zero (fully on credit).
    Partial(Money),
}

// =============================================================================
// Priced Lines
// =============================================================================

/// A cart line resolved against the catalog, with name and price frozen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,

    /// Product name at pricing time (snapshot).
    pub product_name: String,

    pub quantity: Quantity,

    /// Catalog sell price at pricing time (snapshot).
    pub unit_price: Money,

    /// unit_price × quantity.
    pub line_total: Money,
}

impl PricedLine {
    /// Freezes one line against a catalog product.
    pub fn price(product: &Product, quantity: Quantity) -> Self {
        PricedLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.sell_price,
            line_total: product.sell_price.times(quantity),
        }
    }
}

/// Resolves a cart against a catalog snapshot.
///
/// A line is valid when its product id resolves to a live (non-deleted)
/// product in `catalog` and its quantity is positive. Invalid lines are
/// dropped, matching the tolerant intake of the billing flow; a cart with
/// zero valid lines is rejected with [`CoreError::EmptyCart`].
pub fn price_cart(lines: &[CartLine], catalog: &[Product]) -> CoreResult<Vec<PricedLine>> {
    let priced: Vec<PricedLine> = lines
        .iter()
        .filter(|line| line.quantity.is_positive())
        .filter_map(|line| {
            catalog
                .iter()
                .find(|p| p.id == line.product_id && !p.is_deleted)
                .map(|p| PricedLine::price(p, line.quantity))
        })
        .collect();

    if priced.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    Ok(priced)
}

// =============================================================================
// Bill Totals
// =============================================================================

/// The computed money columns of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillTotals {
    /// Σ line totals.
    pub subtotal: Money,

    /// Flat discount off the subtotal.
    pub discount_amount: Money,

    /// Discount as basis points of the subtotal (derived).
    pub discount_bps: u32,

    /// Zero in the dominant flow.
    pub tax_amount: Money,

    /// subtotal − discount + tax.
    pub total: Money,

    pub amount_paid: Money,

    pub status: BillStatus,
}

impl BillTotals {
    /// What this bill adds to the customer's ledger balance:
    /// `total − amount_paid`. Positive when the customer still owes,
    /// negative when they overpaid (advance/credit).
    #[inline]
    pub fn balance_delta(&self) -> Money {
        self.total - self.amount_paid
    }
}

/// Computes a bill's totals from its priced lines.
///
/// `total = subtotal − discount + tax`; the status derives from how
/// `amount_paid` compares to the total.
pub fn compute_totals(
    lines: &[PricedLine],
    discount_amount: Money,
    tax_amount: Money,
    disposition: PaymentDisposition,
) -> BillTotals {
    let subtotal: Money = lines.iter().map(|l| l.line_total).sum();
    let total = subtotal - discount_amount + tax_amount;

    let amount_paid = match disposition {
        PaymentDisposition::Paid => total,
        PaymentDisposition::Partial(amount) => amount,
    };

    BillTotals {
        subtotal,
        discount_amount,
        discount_bps: discount_amount.as_bps_of(subtotal),
        tax_amount,
        total,
        amount_paid,
        status: BillStatus::derive(total, amount_paid),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, name: &str, sell_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: format!("SKU-{}", id),
            category: "General".to_string(),
            cost_price: Money::from_cents(sell_cents / 2),
            sell_price: Money::from_cents(sell_cents),
            stock: Quantity::from_units(100),
            low_stock_threshold: Quantity::from_units(5),
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(product_id: &str, qty_milli: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity: Quantity::from_milli(qty_milli),
        }
    }

    #[test]
    fn test_price_cart_freezes_catalog_price() {
        let catalog = vec![product("a", "Widget", 5000)];
        let priced = price_cart(&[line("a", 2000)], &catalog).unwrap();

        assert_eq!(priced.len(), 1);
        assert_eq!(priced[0].product_name, "Widget");
        assert_eq!(priced[0].unit_price.cents(), 5000);
        assert_eq!(priced[0].line_total.cents(), 10_000);
    }

    #[test]
    fn test_price_cart_drops_invalid_lines() {
        let mut deleted = product("gone", "Ghost", 100);
        deleted.is_deleted = true;
        let catalog = vec![product("a", "Widget", 5000), deleted];

        let lines = vec![
            line("a", 1000),
            line("missing", 1000), // unknown product: dropped
            line("gone", 1000),    // soft-deleted: dropped
            line("a", 0),          // zero quantity: dropped
            line("a", -500),       // negative quantity: dropped
        ];

        let priced = price_cart(&lines, &catalog).unwrap();
        assert_eq!(priced.len(), 1);
        assert_eq!(priced[0].product_id, "a");
    }

    #[test]
    fn test_price_cart_rejects_all_invalid() {
        let catalog = vec![product("a", "Widget", 5000)];

        let err = price_cart(&[line("missing", 1000)], &catalog).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));

        let err = price_cart(&[], &catalog).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_totals_full_payment() {
        // qty 2 × $0.50 unit price, discount 0, paid in full
        let catalog = vec![product("a", "Widget", 50)];
        let priced = price_cart(&[line("a", 2000)], &catalog).unwrap();

        let totals = compute_totals(
            &priced,
            Money::zero(),
            Money::zero(),
            PaymentDisposition::Paid,
        );

        assert_eq!(totals.subtotal.cents(), 100);
        assert_eq!(totals.total.cents(), 100);
        assert_eq!(totals.amount_paid.cents(), 100);
        assert_eq!(totals.status, BillStatus::Paid);
        assert_eq!(totals.balance_delta().cents(), 0);
    }

    #[test]
    fn test_totals_partial_payment() {
        // Same cart, 40 paid of 100 → overdue, 60 lands on the ledger
        let catalog = vec![product("a", "Widget", 50)];
        let priced = price_cart(&[line("a", 2000)], &catalog).unwrap();

        let totals = compute_totals(
            &priced,
            Money::zero(),
            Money::zero(),
            PaymentDisposition::Partial(Money::from_cents(40)),
        );

        assert_eq!(totals.total.cents(), 100);
        assert_eq!(totals.status, BillStatus::Overdue);
        assert_eq!(totals.balance_delta().cents(), 60);
    }

    #[test]
    fn test_totals_with_discount() {
        let catalog = vec![product("a", "Widget", 4000)];
        let priced = price_cart(&[line("a", 2000)], &catalog).unwrap();

        let totals = compute_totals(
            &priced,
            Money::from_cents(1000),
            Money::zero(),
            PaymentDisposition::Paid,
        );

        assert_eq!(totals.subtotal.cents(), 8000);
        assert_eq!(totals.total.cents(), 7000);
        assert_eq!(totals.discount_bps, 1250); // 12.5% of subtotal
        assert_eq!(totals.status, BillStatus::Paid);
    }

    #[test]
    fn test_totals_zero_partial_is_fully_on_credit() {
        let catalog = vec![product("a", "Widget", 50)];
        let priced = price_cart(&[line("a", 2000)], &catalog).unwrap();

        let totals = compute_totals(
            &priced,
            Money::zero(),
            Money::zero(),
            PaymentDisposition::Partial(Money::zero()),
        );

        assert_eq!(totals.status, BillStatus::Overdue);
        assert_eq!(totals.balance_delta().cents(), 100);
    }

    #[test]
    fn test_overpayment_goes_to_customer_credit() {
        let catalog = vec![product("a", "Widget", 50)];
        let priced = price_cart(&[line("a", 2000)], &catalog).unwrap();

        let totals = compute_totals(
            &priced,
            Money::zero(),
            Money::zero(),
            PaymentDisposition::Partial(Money::from_cents(150)),
        );

        assert_eq!(totals.status, BillStatus::Paid);
        assert_eq!(totals.balance_delta().cents(), -50); // business owes customer
    }

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let catalog = vec![product("a", "Widget", 1234), product("b", "Gadget", 999)];
        let priced = price_cart(&[line("a", 3000), line("b", 1500)], &catalog).unwrap();

        let totals = compute_totals(
            &priced,
            Money::zero(),
            Money::zero(),
            PaymentDisposition::Paid,
        );

        let expected: i64 = priced.iter().map(|l| l.line_total.cents()).sum();
        assert_eq!(totals.subtotal.cents(), expected);
        assert_eq!(totals.subtotal.cents(), 3702 + 1499); // 12.34×3 + 9.99×1.5
    }
}
