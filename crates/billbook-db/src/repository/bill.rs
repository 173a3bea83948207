//! # Bill Repository
//!
//! Database operations for bills and their line items.
//!
//! ## Atomicity Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bill Insert Transaction                             │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO bills      (1 row)                                       │
//! │    INSERT INTO bill_items (1 row per line)                              │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failed item insert rolls the whole bill back. A partial bill is   │
//! │  never visible to list() or get().                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checkout workflow (see [`crate::checkout`]) opens a wider transaction
//! that also covers stock and ledger writes; it reuses the row-insert
//! helpers below on its own connection.

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use billbook_core::{Bill, BillItem};

/// Column list shared by every bill SELECT.
pub(crate) const BILL_COLUMNS: &str = "id, bill_number, customer_name, customer_email, \
     customer_mobile, date, created_at, subtotal, discount_amount, discount_bps, \
     tax_amount, total, amount_paid, status, created_by, is_deleted";

/// Column list shared by every bill-item SELECT.
pub(crate) const ITEM_COLUMNS: &str =
    "id, bill_id, product_id, product_name, quantity, unit_price, line_total";

/// Filter for bill listings.
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    /// Inclusive lower bound on the bill's calendar day.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the bill's calendar day.
    pub end_date: Option<NaiveDate>,
    pub include_deleted: bool,
}

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Lists bills, newest first.
    pub async fn list(&self, filter: &BillFilter) -> DbResult<Vec<Bill>> {
        let sql = format!(
            "SELECT {BILL_COLUMNS} FROM bills \
             WHERE (is_deleted = 0 OR ?1) \
             AND (?2 IS NULL OR date >= ?2) \
             AND (?3 IS NULL OR date <= ?3) \
             ORDER BY date DESC, created_at DESC"
        );

        let bills = sqlx::query_as::<_, Bill>(&sql)
            .bind(filter.include_deleted)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_all(&self.pool)
            .await?;

        Ok(bills)
    }

    /// Gets a bill by ID, deleted or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Bill>> {
        let sql = format!("SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1");

        let bill = sqlx::query_as::<_, Bill>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bill)
    }

    /// Gets all line items of a bill, insertion order.
    pub async fn items(&self, bill_id: &str) -> DbResult<Vec<BillItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM bill_items WHERE bill_id = ?1 ORDER BY rowid");

        let items = sqlx::query_as::<_, BillItem>(&sql)
            .bind(bill_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Line items of every non-deleted bill in the date range. Feeds the
    /// sales report; aggregation itself is pure (billbook-core).
    pub async fn list_items_in_range(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> DbResult<Vec<BillItem>> {
        let sql = format!(
            "SELECT bi.id, bi.bill_id, bi.product_id, bi.product_name, \
                    bi.quantity, bi.unit_price, bi.line_total \
             FROM bill_items bi \
             JOIN bills b ON b.id = bi.bill_id \
             WHERE b.is_deleted = 0 \
             AND (?1 IS NULL OR b.date >= ?1) \
             AND (?2 IS NULL OR b.date <= ?2) \
             ORDER BY b.date, bi.rowid"
        );

        let items = sqlx::query_as::<_, BillItem>(&sql)
            .bind(start_date)
            .bind(end_date)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Inserts a bill and all of its items as one transaction.
    ///
    /// Callers guarantee a non-empty item list (checkout rejects empty
    /// carts before reaching the store).
    pub async fn insert(&self, bill: &Bill, items: &[BillItem]) -> DbResult<()> {
        debug!(id = %bill.id, bill_number = %bill.bill_number, items = items.len(), "Inserting bill");

        let mut tx = self.pool.begin().await?;

        insert_bill_row(&mut *tx, bill).await?;
        for item in items {
            insert_item_row(&mut *tx, item).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Soft-deletes a bill. Its items stay in place for audit; reporting
    /// and listings filter on the bill's flag.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting bill");

        let result = sqlx::query("UPDATE bills SET is_deleted = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Bill", id));
        }

        Ok(())
    }

    /// Computes the next display number by scanning non-deleted bills.
    ///
    /// The checkout workflow performs the same scan inside its transaction,
    /// which serializes concurrent number assignment.
    pub async fn next_bill_number(&self) -> DbResult<String> {
        let numbers: Vec<String> =
            sqlx::query_scalar("SELECT bill_number FROM bills WHERE is_deleted = 0")
                .fetch_all(&self.pool)
                .await?;

        Ok(next_bill_number(numbers.iter().map(|s| s.as_str())))
    }
}

// =============================================================================
// Row Helpers (shared with the checkout transaction)
// =============================================================================

/// Inserts one bill row on any executor (pool or open transaction).
pub(crate) async fn insert_bill_row<'e, E>(executor: E, bill: &Bill) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO bills ( \
            id, bill_number, customer_name, customer_email, customer_mobile, \
            date, created_at, subtotal, discount_amount, discount_bps, \
            tax_amount, total, amount_paid, status, created_by, is_deleted \
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
    )
    .bind(&bill.id)
    .bind(&bill.bill_number)
    .bind(&bill.customer_name)
    .bind(&bill.customer_email)
    .bind(&bill.customer_mobile)
    .bind(bill.date)
    .bind(bill.created_at)
    .bind(bill.subtotal)
    .bind(bill.discount_amount)
    .bind(bill.discount_bps)
    .bind(bill.tax_amount)
    .bind(bill.total)
    .bind(bill.amount_paid)
    .bind(bill.status)
    .bind(&bill.created_by)
    .bind(bill.is_deleted)
    .execute(executor)
    .await?;

    Ok(())
}

/// Inserts one bill-item row on any executor.
pub(crate) async fn insert_item_row<'e, E>(executor: E, item: &BillItem) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO bill_items ( \
            id, bill_id, product_id, product_name, quantity, unit_price, line_total \
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&item.id)
    .bind(&item.bill_id)
    .bind(&item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.line_total)
    .execute(executor)
    .await?;

    Ok(())
}

// =============================================================================
// Bill Numbering
// =============================================================================

/// Derives the next display number: `INV-` + zero-padded
/// `1 + max numeric suffix` over the given numbers.
///
/// Numbers that don't end in a numeric suffix are ignored, so a legacy or
/// hand-entered code can't poison the sequence.
pub fn next_bill_number<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let max = existing
        .into_iter()
        .filter_map(|number| number.rsplit('-').next())
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    format!("INV-{:04}", max + 1)
}

/// Generates a new bill ID.
pub fn generate_bill_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new bill-item ID.
pub fn generate_bill_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use billbook_core::{BillStatus, Money, Quantity};
    use chrono::Utc;

    fn bill(id: &str, number: &str, date: NaiveDate) -> Bill {
        Bill {
            id: id.to_string(),
            bill_number: number.to_string(),
            customer_name: None,
            customer_email: None,
            customer_mobile: None,
            date,
            created_at: Utc::now(),
            subtotal: Money::from_cents(100),
            discount_amount: Money::zero(),
            discount_bps: 0,
            tax_amount: Money::zero(),
            total: Money::from_cents(100),
            amount_paid: Money::from_cents(100),
            status: BillStatus::Paid,
            created_by: "staff@billbook.app".to_string(),
            is_deleted: false,
        }
    }

    fn item(id: &str, bill_id: &str, product_id: &str) -> BillItem {
        BillItem {
            id: id.to_string(),
            bill_id: bill_id.to_string(),
            product_id: product_id.to_string(),
            product_name: "Widget".to_string(),
            quantity: Quantity::from_units(2),
            unit_price: Money::from_cents(50),
            line_total: Money::from_cents(100),
        }
    }

    async fn db_with_product() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        db.products()
            .insert(&billbook_core::Product {
                id: "p1".to_string(),
                name: "Widget".to_string(),
                sku: "SKU-1".to_string(),
                category: "General".to_string(),
                cost_price: Money::from_cents(25),
                sell_price: Money::from_cents(50),
                stock: Quantity::from_units(10),
                low_stock_threshold: Quantity::from_units(2),
                is_deleted: false,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_with_items() {
        let db = db_with_product().await;
        let repo = db.bills();

        let b = bill("b1", "INV-0001", day("2026-08-01"));
        let items = vec![item("i1", "b1", "p1"), item("i2", "b1", "p1")];
        repo.insert(&b, &items).await.unwrap();

        let loaded = repo.get_by_id("b1").await.unwrap().unwrap();
        assert_eq!(loaded.bill_number, "INV-0001");
        assert_eq!(loaded.status, BillStatus::Paid);

        let loaded_items = repo.items("b1").await.unwrap();
        assert_eq!(loaded_items.len(), 2);
        assert_eq!(loaded_items[0].line_total.cents(), 100);
    }

    #[tokio::test]
    async fn test_item_failure_rolls_back_whole_bill() {
        let db = db_with_product().await;
        let repo = db.bills();

        let b = bill("b1", "INV-0001", day("2026-08-01"));
        // Second item references a product that doesn't exist: FK failure
        let items = vec![item("i1", "b1", "p1"), item("i2", "b1", "missing")];

        let err = repo.insert(&b, &items).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // Nothing partial is visible
        assert!(repo.get_by_id("b1").await.unwrap().is_none());
        assert!(repo.items("b1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_and_date_filter() {
        let db = db_with_product().await;
        let repo = db.bills();

        for (id, number, date) in [
            ("b1", "INV-0001", "2026-08-01"),
            ("b2", "INV-0002", "2026-08-03"),
            ("b3", "INV-0003", "2026-08-02"),
        ] {
            repo.insert(&bill(id, number, day(date)), &[item(&format!("i-{id}"), id, "p1")])
                .await
                .unwrap();
        }

        let all = repo.list(&BillFilter::default()).await.unwrap();
        let order: Vec<&str> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec!["b2", "b3", "b1"]);

        let filtered = repo
            .list(&BillFilter {
                start_date: Some(day("2026-08-02")),
                end_date: Some(day("2026-08-02")),
                include_deleted: false,
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b3");
    }

    #[tokio::test]
    async fn test_soft_delete_excluded_by_default() {
        let db = db_with_product().await;
        let repo = db.bills();

        repo.insert(&bill("b1", "INV-0001", day("2026-08-01")), &[item("i1", "b1", "p1")])
            .await
            .unwrap();
        repo.soft_delete("b1").await.unwrap();

        assert!(repo.list(&BillFilter::default()).await.unwrap().is_empty());

        let with_deleted = repo
            .list(&BillFilter {
                include_deleted: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(with_deleted.len(), 1);

        let err = repo.soft_delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_report_items_join_skips_deleted_bills() {
        let db = db_with_product().await;
        let repo = db.bills();

        repo.insert(&bill("b1", "INV-0001", day("2026-08-01")), &[item("i1", "b1", "p1")])
            .await
            .unwrap();
        repo.insert(&bill("b2", "INV-0002", day("2026-08-05")), &[item("i2", "b2", "p1")])
            .await
            .unwrap();
        repo.soft_delete("b2").await.unwrap();

        let items = repo.list_items_in_range(None, None).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].bill_id, "b1");

        let out_of_range = repo
            .list_items_in_range(Some(day("2026-08-02")), None)
            .await
            .unwrap();
        assert!(out_of_range.is_empty());
    }

    #[test]
    fn test_next_bill_number_sequence() {
        let none: [&str; 0] = [];
        assert_eq!(next_bill_number(none), "INV-0001");
        assert_eq!(next_bill_number(["INV-0001"]), "INV-0002");
        assert_eq!(
            next_bill_number(["INV-0001", "INV-0042", "INV-0007"]),
            "INV-0043"
        );
    }

    #[test]
    fn test_next_bill_number_ignores_junk_and_grows_past_padding() {
        // Non-numeric suffixes don't poison the sequence
        assert_eq!(next_bill_number(["DRAFT", "INV-0002"]), "INV-0003");

        // Padding is a minimum, not a cap
        assert_eq!(next_bill_number(["INV-12000"]), "INV-12001");
    }

    #[tokio::test]
    async fn test_repo_next_bill_number_skips_deleted() {
        let db = db_with_product().await;
        let repo = db.bills();

        assert_eq!(repo.next_bill_number().await.unwrap(), "INV-0001");

        repo.insert(&bill("b1", "INV-0001", day("2026-08-01")), &[item("i1", "b1", "p1")])
            .await
            .unwrap();
        repo.insert(&bill("b2", "INV-0002", day("2026-08-01")), &[item("i2", "b2", "p1")])
            .await
            .unwrap();
        assert_eq!(repo.next_bill_number().await.unwrap(), "INV-0003");

        // Numbering scans live bills only
        repo.soft_delete("b2").await.unwrap();
        assert_eq!(repo.next_bill_number().await.unwrap(), "INV-0002");
    }
}
