//! # Checkout - the Bill Creation Workflow
//!
//! Turns a cart of line items into a persisted bill while updating product
//! stock and the customer's ledger balance, all inside one transaction.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Transaction                                │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   1. Load the cart's products (catalog snapshot)                        │
//! │   2. price_cart()         ← drops invalid lines; empty cart rejected   │
//! │   3. compute_totals()     ← subtotal, discount, total, status          │
//! │   4. next_bill_number()   ← scan of live bills, serialized by the tx   │
//! │   5. Customer (when a mobile is present):                               │
//! │        found   → balance += total − paid                                │
//! │        missing → INSERT with balance = total − paid                     │
//! │   6. stock -= quantity per line (no floor; may go negative)            │
//! │   7. INSERT bill + items                                                │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure anywhere rolls the whole thing back: a bill is never      │
//! │  visible without its stock and ledger effects, and vice versa.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog sell price is authoritative at bill time; nothing the client
//! sent with the cart is trusted beyond product ids and quantities.

use chrono::Utc;
use sqlx::Sqlite;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::bill::{insert_bill_row, insert_item_row, next_bill_number, BILL_COLUMNS};
use crate::repository::customer::CUSTOMER_COLUMNS;
use crate::repository::product::PRODUCT_COLUMNS;
use billbook_core::cart::{compute_totals, price_cart, CartLine, PaymentDisposition};
use billbook_core::validation::{validate_discount, validate_mobile, validate_payment_amount};
use billbook_core::{Bill, BillItem, CoreError, Customer, Money, Product};

// =============================================================================
// Request / Outcome / Error
// =============================================================================

/// Everything the counter submits to create a bill.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Ordered cart lines. Lines that don't resolve to a live product, or
    /// carry a non-positive quantity, are dropped.
    pub lines: Vec<CartLine>,

    /// Customer snapshot fields. A missing/empty mobile means a walk-in
    /// sale: no ledger entry is touched or created.
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_mobile: Option<String>,

    /// Flat discount off the subtotal.
    pub discount: Money,

    /// `Paid` sets amount_paid = total; `Partial` carries an explicit
    /// amount, which may be zero (fully on credit).
    pub disposition: PaymentDisposition,

    /// Email of the user issuing the bill.
    pub created_by: String,
}

/// A successfully created bill with its persisted items.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub bill: Bill,
    pub items: Vec<BillItem>,
}

/// Checkout failures: business rejections or storage trouble.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Db(DbError::from(err))
    }
}

// =============================================================================
// Workflow
// =============================================================================

/// Creates a bill from a cart, adjusting stock and the customer ledger.
///
/// Runs as one SQLite transaction: concurrent checkouts serialize on the
/// database's single writer, which keeps bill numbers unique and balance
/// and stock deltas exact.
pub async fn create_bill(
    db: &Database,
    request: CheckoutRequest,
) -> Result<CheckoutOutcome, CheckoutError> {
    validate_discount(request.discount).map_err(CoreError::from)?;
    if let PaymentDisposition::Partial(amount) = request.disposition {
        validate_payment_amount(amount).map_err(CoreError::from)?;
    }

    // An empty-after-trim mobile is a walk-in, same as an absent one.
    let mobile = request
        .customer_mobile
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    if let Some(mobile) = &mobile {
        validate_mobile(mobile).map_err(CoreError::from)?;
    }

    let mut tx = db.pool().begin().await?;

    // 1-2. Catalog snapshot for the cart, then pure pricing.
    let catalog = load_cart_products(&mut tx, &request.lines).await?;
    let priced = price_cart(&request.lines, &catalog)?;

    // 3-4. Totals and display number, both inside the transaction.
    let totals = compute_totals(&priced, request.discount, Money::zero(), request.disposition);

    let existing_numbers: Vec<String> =
        sqlx::query_scalar("SELECT bill_number FROM bills WHERE is_deleted = 0")
            .fetch_all(&mut *tx)
            .await?;
    let bill_number = next_bill_number(existing_numbers.iter().map(|s| s.as_str()));

    // 5. Ledger: look up or create the customer, apply the balance delta.
    let now = Utc::now();
    let mut customer_name = request.customer_name.clone();
    let mut customer_email = request.customer_email.clone();

    if let Some(mobile) = &mobile {
        let delta = totals.balance_delta();

        let existing = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE mobile = ?1"
        ))
        .bind(mobile)
        .fetch_optional(&mut *tx)
        .await?;

        match existing {
            Some(customer) => {
                // The bill snapshots whatever the request didn't supply
                // from the ledger record.
                customer_name = customer_name.or(Some(customer.name));
                customer_email = customer_email.or(customer.email);

                sqlx::query(
                    "UPDATE customers SET balance = balance + ?2, updated_at = ?3 \
                     WHERE mobile = ?1",
                )
                .bind(mobile)
                .bind(delta)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                debug!(mobile = %mobile, delta = %delta, "Adjusted customer balance");
            }
            None => {
                let name = customer_name
                    .clone()
                    .unwrap_or_else(|| mobile.clone());

                sqlx::query(
                    "INSERT INTO customers ( \
                        id, name, mobile, email, balance, is_deleted, created_at, updated_at \
                    ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&name)
                .bind(mobile)
                .bind(&customer_email)
                .bind(delta)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                customer_name = Some(name);
                debug!(mobile = %mobile, balance = %delta, "Created customer from bill");
            }
        }
    }

    // 6. Stock decrements, one atomic delta per line.
    for line in &priced {
        sqlx::query("UPDATE products SET stock = stock - ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;
    }

    // 7. The bill and its items.
    let bill = Bill {
        id: Uuid::new_v4().to_string(),
        bill_number,
        customer_name,
        customer_email,
        customer_mobile: mobile,
        date: now.date_naive(),
        created_at: now,
        subtotal: totals.subtotal,
        discount_amount: totals.discount_amount,
        discount_bps: totals.discount_bps,
        tax_amount: totals.tax_amount,
        total: totals.total,
        amount_paid: totals.amount_paid,
        status: totals.status,
        created_by: request.created_by,
        is_deleted: false,
    };

    insert_bill_row(&mut *tx, &bill).await?;

    let mut items = Vec::with_capacity(priced.len());
    for line in priced {
        let item = BillItem {
            id: Uuid::new_v4().to_string(),
            bill_id: bill.id.clone(),
            product_id: line.product_id,
            product_name: line.product_name,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
        };
        insert_item_row(&mut *tx, &item).await?;
        items.push(item);
    }

    tx.commit().await?;

    info!(
        bill_id = %bill.id,
        bill_number = %bill.bill_number,
        total = %bill.total,
        items = items.len(),
        status = ?bill.status,
        "Bill created"
    );

    Ok(CheckoutOutcome { bill, items })
}

/// Loads each distinct cart product inside the transaction. Unknown ids
/// are simply absent from the snapshot; pricing drops their lines.
async fn load_cart_products(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    lines: &[CartLine],
) -> Result<Vec<Product>, CheckoutError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

    let mut catalog: Vec<Product> = Vec::new();
    for line in lines {
        if catalog.iter().any(|p| p.id == line.product_id) {
            continue;
        }
        if let Some(product) = sqlx::query_as::<_, Product>(&sql)
            .bind(&line.product_id)
            .fetch_optional(&mut **tx)
            .await?
        {
            catalog.push(product);
        }
    }

    Ok(catalog)
}

/// Reads one bill with its items (used by handlers after checkout and by
/// the GET endpoint).
pub async fn load_bill(
    db: &Database,
    bill_id: &str,
) -> Result<Option<CheckoutOutcome>, DbError> {
    let bill = sqlx::query_as::<_, Bill>(&format!(
        "SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1"
    ))
    .bind(bill_id)
    .fetch_optional(db.pool())
    .await?;

    let Some(bill) = bill else {
        return Ok(None);
    };

    let items = db.bills().items(&bill.id).await?;
    Ok(Some(CheckoutOutcome { bill, items }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use billbook_core::{BillStatus, Quantity};

    async fn db_with_catalog() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        for (id, sku, name, sell, stock) in [
            ("pa", "SKU-A", "Product A", 50_i64, 100_i64),
            ("pb", "SKU-B", "Product B", 1250, 8),
        ] {
            db.products()
                .insert(&Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    sku: sku.to_string(),
                    category: "General".to_string(),
                    cost_price: Money::from_cents(sell / 2),
                    sell_price: Money::from_cents(sell),
                    stock: Quantity::from_units(stock),
                    low_stock_threshold: Quantity::from_units(2),
                    is_deleted: false,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }
        db
    }

    fn line(product_id: &str, qty_milli: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity: Quantity::from_milli(qty_milli),
        }
    }

    fn walk_in(lines: Vec<CartLine>, disposition: PaymentDisposition) -> CheckoutRequest {
        CheckoutRequest {
            lines,
            customer_name: None,
            customer_email: None,
            customer_mobile: None,
            discount: Money::zero(),
            disposition,
            created_by: "staff@billbook.app".to_string(),
        }
    }

    fn with_mobile(mut request: CheckoutRequest, mobile: &str) -> CheckoutRequest {
        request.customer_mobile = Some(mobile.to_string());
        request
    }

    async fn customer_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_payment_scenario() {
        // Cart: [{A, qty 2, price 50}], discount 0, full payment
        let db = db_with_catalog().await;

        let outcome = create_bill(&db, walk_in(vec![line("pa", 2000)], PaymentDisposition::Paid))
            .await
            .unwrap();

        assert_eq!(outcome.bill.total.cents(), 100);
        assert_eq!(outcome.bill.subtotal.cents(), 100);
        assert_eq!(outcome.bill.status, BillStatus::Paid);
        assert_eq!(outcome.bill.bill_number, "INV-0001");
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].line_total.cents(), 100);

        // Stock decreased by exactly the billed quantity
        let product = db.products().get_by_id("pa").await.unwrap().unwrap();
        assert_eq!(product.stock.milli(), 98_000);
    }

    #[tokio::test]
    async fn test_partial_payment_creates_customer_with_balance() {
        // Same cart, amountPaid = 40 → total 100, overdue, balance +60
        let db = db_with_catalog().await;

        let request = with_mobile(
            walk_in(
                vec![line("pa", 2000)],
                PaymentDisposition::Partial(Money::from_cents(40)),
            ),
            "0300-1234567",
        );
        let outcome = create_bill(&db, request).await.unwrap();

        assert_eq!(outcome.bill.status, BillStatus::Overdue);
        assert_eq!(outcome.bill.customer_mobile.as_deref(), Some("0300-1234567"));

        assert_eq!(customer_count(&db).await, 1);
        let customer = db
            .customers()
            .get_by_mobile("0300-1234567")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.balance.cents(), 60);
        // No name supplied: the mobile stands in as the display name
        assert_eq!(customer.name, "0300-1234567");
    }

    #[tokio::test]
    async fn test_second_bill_is_additive_on_balance() {
        let db = db_with_catalog().await;

        let first = with_mobile(
            walk_in(
                vec![line("pa", 2000)],
                PaymentDisposition::Partial(Money::from_cents(40)),
            ),
            "0300-1234567",
        );
        create_bill(&db, first).await.unwrap();

        // Second bill: B × 1 = 1250, paid 1000 → +250 on top of +60
        let second = with_mobile(
            walk_in(
                vec![line("pb", 1000)],
                PaymentDisposition::Partial(Money::from_cents(1000)),
            ),
            "0300-1234567",
        );
        let outcome = create_bill(&db, second).await.unwrap();
        assert_eq!(outcome.bill.bill_number, "INV-0002");

        assert_eq!(customer_count(&db).await, 1); // still exactly one
        let customer = db
            .customers()
            .get_by_mobile("0300-1234567")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.balance.cents(), 310);
    }

    #[tokio::test]
    async fn test_walk_in_touches_no_ledger() {
        let db = db_with_catalog().await;

        create_bill(
            &db,
            walk_in(
                vec![line("pa", 1000)],
                PaymentDisposition::Partial(Money::zero()),
            ),
        )
        .await
        .unwrap();

        assert_eq!(customer_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_blank_mobile_is_walk_in() {
        let db = db_with_catalog().await;

        let mut request = walk_in(vec![line("pa", 1000)], PaymentDisposition::Paid);
        request.customer_mobile = Some("   ".to_string());
        create_bill(&db, request).await.unwrap();

        assert_eq!(customer_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_overpayment_credits_customer() {
        let db = db_with_catalog().await;

        let request = with_mobile(
            walk_in(
                vec![line("pa", 2000)],
                PaymentDisposition::Partial(Money::from_cents(150)),
            ),
            "0300-1234567",
        );
        let outcome = create_bill(&db, request).await.unwrap();

        assert_eq!(outcome.bill.status, BillStatus::Paid);
        let customer = db
            .customers()
            .get_by_mobile("0300-1234567")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.balance.cents(), -50);
    }

    #[tokio::test]
    async fn test_discount_and_snapshot_prices() {
        let db = db_with_catalog().await;

        let mut request = walk_in(
            vec![line("pa", 2000), line("pb", 1500)],
            PaymentDisposition::Paid,
        );
        request.discount = Money::from_cents(100);
        let outcome = create_bill(&db, request).await.unwrap();

        // subtotal = 100 + 1875, total = subtotal − 100
        assert_eq!(outcome.bill.subtotal.cents(), 1975);
        assert_eq!(outcome.bill.total.cents(), 1875);
        assert_eq!(outcome.items[1].unit_price.cents(), 1250);
        assert_eq!(outcome.items[1].line_total.cents(), 1875);
    }

    #[tokio::test]
    async fn test_invalid_lines_dropped_empty_cart_rejected() {
        let db = db_with_catalog().await;

        // One bad line among good ones: bill still created from the good one
        let outcome = create_bill(
            &db,
            walk_in(
                vec![line("missing", 1000), line("pa", 1000), line("pb", 0)],
                PaymentDisposition::Paid,
            ),
        )
        .await
        .unwrap();
        assert_eq!(outcome.items.len(), 1);

        // Nothing valid at all: rejected, nothing persisted
        let err = create_bill(
            &db,
            walk_in(vec![line("missing", 1000)], PaymentDisposition::Paid),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::EmptyCart)));

        let err = create_bill(&db, walk_in(vec![], PaymentDisposition::Paid))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_deleted_product_cannot_be_sold() {
        let db = db_with_catalog().await;
        db.products().soft_delete("pa").await.unwrap();

        let err = create_bill(&db, walk_in(vec![line("pa", 1000)], PaymentDisposition::Paid))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_negative_payment_rejected() {
        let db = db_with_catalog().await;

        let err = create_bill(
            &db,
            walk_in(
                vec![line("pa", 1000)],
                PaymentDisposition::Partial(Money::from_cents(-10)),
            ),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::Validation(_))));

        // And nothing was persisted
        assert!(db.bills().list(&Default::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_product_lines_decrement_cumulatively() {
        let db = db_with_catalog().await;

        create_bill(
            &db,
            walk_in(
                vec![line("pa", 1000), line("pa", 2500)],
                PaymentDisposition::Paid,
            ),
        )
        .await
        .unwrap();

        let product = db.products().get_by_id("pa").await.unwrap().unwrap();
        assert_eq!(product.stock.milli(), 96_500);
    }

    #[tokio::test]
    async fn test_stock_goes_negative_without_floor() {
        let db = db_with_catalog().await;

        // Product B has 8 in stock; sell 10
        create_bill(&db, walk_in(vec![line("pb", 10_000)], PaymentDisposition::Paid))
            .await
            .unwrap();

        let product = db.products().get_by_id("pb").await.unwrap().unwrap();
        assert_eq!(product.stock.milli(), -2000);
    }

    #[tokio::test]
    async fn test_ledger_name_snapshot_prefers_request_then_ledger() {
        let db = db_with_catalog().await;

        let mut first = with_mobile(
            walk_in(vec![line("pa", 1000)], PaymentDisposition::Paid),
            "0300-1234567",
        );
        first.customer_name = Some("Ayesha".to_string());
        create_bill(&db, first).await.unwrap();

        // Second bill omits the name: snapshot falls back to the ledger
        let second = with_mobile(
            walk_in(vec![line("pa", 1000)], PaymentDisposition::Paid),
            "0300-1234567",
        );
        let outcome = create_bill(&db, second).await.unwrap();
        assert_eq!(outcome.bill.customer_name.as_deref(), Some("Ayesha"));
    }

    #[tokio::test]
    async fn test_load_bill_round_trip() {
        let db = db_with_catalog().await;

        let created = create_bill(&db, walk_in(vec![line("pa", 2000)], PaymentDisposition::Paid))
            .await
            .unwrap();

        let loaded = load_bill(&db, &created.bill.id).await.unwrap().unwrap();
        assert_eq!(loaded.bill.bill_number, created.bill.bill_number);
        assert_eq!(loaded.items.len(), 1);

        assert!(load_bill(&db, "missing").await.unwrap().is_none());
    }
}
