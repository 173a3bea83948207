//! # Domain Types
//!
//! Core domain types used throughout BillBook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Bill       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  bill_number    │   │  mobile (bus.)  │       │
//! │  │  sell_price     │   │  status         │   │  balance        │       │
//! │  │  stock          │   │  total          │   │  (signed)       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    BillItem     │   │   BillStatus    │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_name   │   │  Paid           │   │  email (bus.)   │       │
//! │  │  unit_price     │   │  Pending        │   │  role           │       │
//! │  │  (snapshots)    │   │  Overdue        │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key where one exists: `sku` (product), `mobile` (customer),
//!   `bill_number` (bill), `email` (user)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Quantity};

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on bills.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Free-form grouping label ("Beverages", "Hardware", ...).
    pub category: String,

    /// Purchase cost per unit. Visible to admins only at the API layer.
    pub cost_price: Money,

    /// Selling price per unit. Authoritative at bill time.
    pub sell_price: Money,

    /// Current stock level. May go negative: stock decrements are blind
    /// subtractions with no floor.
    pub stock: Quantity,

    /// Stock at or below this level flags the product as low-stock.
    pub low_stock_threshold: Quantity,

    /// Soft-delete flag. Products referenced by bills are never hard-deleted.
    pub is_deleted: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Stock at or below the threshold counts as low.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer with a running ledger balance.
///
/// Balance sign convention: positive = customer owes the business,
/// negative = business owes the customer (credit/advance).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    /// Mobile number - the business key. Bills look customers up by mobile,
    /// not by id.
    pub mobile: String,

    pub email: Option<String>,

    /// Running balance: Σ (bill total − amount paid) over this mobile's
    /// bills, plus manual corrections.
    pub balance: Money,

    pub is_deleted: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Bill Status
// =============================================================================

/// Settlement status of a bill.
///
/// Derived at creation: `paid` when the amount paid covers the total,
/// otherwise `overdue`. `pending` exists for forward compatibility with
/// deferred settlement; the creation flow never assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// Amount paid covers the total.
    Paid,
    /// Awaiting settlement (reserved, not assigned by the creation flow).
    Pending,
    /// Amount paid falls short of the total.
    Overdue,
}

impl BillStatus {
    /// Derives the status from totals: paid iff `amount_paid >= total`.
    #[inline]
    pub fn derive(total: Money, amount_paid: Money) -> Self {
        if amount_paid >= total {
            BillStatus::Paid
        } else {
            BillStatus::Overdue
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A persisted invoice. Immutable after creation; soft-deleted only.
///
/// Customer fields are a denormalized snapshot taken at bill time, not a
/// foreign-key join - the bill keeps displaying what was true when it was
/// issued. All customer fields are optional: a bill with no mobile is a
/// walk-in sale with no ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Bill {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Sequential display code: `INV-` + zero-padded (1 + max numeric
    /// suffix across existing non-deleted bills).
    pub bill_number: String,

    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_mobile: Option<String>,

    /// Calendar day of the sale.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Instant of creation.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Σ line totals.
    pub subtotal: Money,

    /// Flat discount subtracted from the subtotal. The authoritative input.
    pub discount_amount: Money,

    /// Discount as basis points of the subtotal, derived from the amount.
    pub discount_bps: u32,

    /// Always zero in the dominant flow; the column exists for forward
    /// compatibility.
    pub tax_amount: Money,

    /// subtotal − discount_amount + tax_amount.
    pub total: Money,

    pub amount_paid: Money,

    pub status: BillStatus,

    /// Email of the user who issued the bill.
    pub created_by: String,

    pub is_deleted: bool,
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line item on a bill.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillItem {
    pub id: String,

    pub bill_id: String,

    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub product_name: String,

    /// Quantity sold. Partial units allowed.
    pub quantity: Quantity,

    /// Unit price at time of sale (frozen from the catalog sell price,
    /// never from the client's cart).
    pub unit_price: Money,

    /// unit_price × quantity at fixed-point precision.
    pub line_total: Money,
}

// =============================================================================
// User & Role
// =============================================================================

/// Access role attached to a user and trusted from request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including cost prices and soft deletes.
    Admin,
    /// Day-to-day billing access.
    Staff,
}

impl Role {
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Staff
    }
}

/// An application user. Seeded by migration; no CRUD surface.
///
/// The password is stored in plain text: login is an explicit mock, not an
/// auth boundary (identity is taken from request headers at face value).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub is_deleted: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derivation() {
        let total = Money::from_cents(10_000);

        assert_eq!(BillStatus::derive(total, total), BillStatus::Paid);
        assert_eq!(
            BillStatus::derive(total, Money::from_cents(12_000)),
            BillStatus::Paid
        );
        assert_eq!(
            BillStatus::derive(total, Money::from_cents(4000)),
            BillStatus::Overdue
        );
        assert_eq!(
            BillStatus::derive(total, Money::zero()),
            BillStatus::Overdue
        );
    }

    #[test]
    fn test_low_stock() {
        let mut product = Product {
            id: "p1".to_string(),
            name: "Widget".to_string(),
            sku: "WID-1".to_string(),
            category: "Hardware".to_string(),
            cost_price: Money::from_cents(100),
            sell_price: Money::from_cents(150),
            stock: Quantity::from_units(5),
            low_stock_threshold: Quantity::from_units(5),
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // At the threshold counts as low
        assert!(product.is_low_stock());

        product.stock = Quantity::from_milli(5001);
        assert!(!product.is_low_stock());

        // Negative stock is always low
        product.stock = Quantity::from_units(-2);
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_role_default_is_staff() {
        assert_eq!(Role::default(), Role::Staff);
        assert!(!Role::default().is_admin());
        assert!(Role::Admin.is_admin());
    }
}
