//! # Money & Quantity Module
//!
//! Fixed-point numeric types for every monetary amount and every stocked
//! quantity in BillBook.
//!
//! ## Why Integer Fixed Point?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION:                                                          │
//! │    Money    = integer cents        (i64, 2 implied decimals)            │
//! │    Quantity = integer thousandths  (i64, 3 implied decimals)            │
//! │                                                                         │
//! │  A line total is price × quantity in i128, rounded half-up at the      │
//! │  cent. That rounding rule IS the precision contract of the system.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billbook_core::money::{Money, Quantity};
//!
//! let price = Money::from_cents(5000);      // $50.00
//! let qty = Quantity::from_milli(2_500);    // 2.500 units
//!
//! // Line total: $50.00 × 2.5 = $125.00
//! assert_eq!(price.times(qty).cents(), 12_500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Customer balances are signed — positive means the
///   customer owes the business, negative means the business owes the
///   customer (credit/advance).
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// Product.sell_price ──► BillItem.unit_price ──► BillItem.line_total
///                                                      │
///        Bill.subtotal ◄── Σ line totals ◄─────────────┘
///             │
///             ▼
///        Bill.total = subtotal − discount + tax ──► Customer.balance delta
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use billbook_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (whole currency) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99, sign dropped).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a fixed-point quantity, rounding half-up
    /// at the cent.
    ///
    /// ## Implementation
    /// Widens to i128 so `i64::MAX` prices cannot overflow mid-multiply:
    /// `(cents × milli + 500) / 1000`. The `+500` rounds the half-cent up.
    ///
    /// ## Example
    /// ```rust
    /// use billbook_core::money::{Money, Quantity};
    ///
    /// // $0.50 × 2 = $1.00 (whole units)
    /// assert_eq!(Money::from_cents(50).times(Quantity::from_units(2)).cents(), 100);
    ///
    /// // $10.00 × 0.333 = $3.33
    /// assert_eq!(Money::from_cents(1000).times(Quantity::from_milli(333)).cents(), 333);
    /// ```
    pub fn times(&self, qty: Quantity) -> Money {
        let cents = (self.0 as i128 * qty.milli() as i128 + 500) / 1000;
        Money::from_cents(cents as i64)
    }

    /// Expresses this amount as basis points of a whole (1 bps = 0.01%),
    /// rounding half-up.
    ///
    /// Used to derive a bill's stored discount percentage from the
    /// authoritative discount amount. Returns 0 when the whole is zero.
    ///
    /// ## Example
    /// ```rust
    /// use billbook_core::money::Money;
    ///
    /// let discount = Money::from_cents(1000);  // $10.00
    /// let subtotal = Money::from_cents(8000);  // $80.00
    /// assert_eq!(discount.as_bps_of(subtotal), 1250); // 12.5%
    /// ```
    pub fn as_bps_of(&self, whole: Money) -> u32 {
        if whole.0 == 0 {
            return 0;
        }
        let bps = (self.0 as i128 * 10_000 + whole.0 as i128 / 2) / whole.0 as i128;
        bps.clamp(0, u32::MAX as i128) as u32
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A quantity in thousandths of a unit (three implied decimal places).
///
/// Partial units are first-class: a bill line can sell 2.500 kg, and stock
/// levels move by the same fixed-point deltas. Signed because stock may go
/// negative (blind decrement, per the catalog's documented behavior).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from thousandths of a unit.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 1000)
    }

    /// Returns the quantity in thousandths of a unit.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 1000
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The frontend formats currency itself
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:03}", sign, self.units().abs(), (self.0 % 1000).abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Summation over line totals: `items.iter().map(|i| i.line_total).sum()`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl Neg for Quantity {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Quantity(-self.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), |acc, q| acc + q)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
