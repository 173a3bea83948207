//! # Customer Repository
//!
//! Database operations for the customer ledger.
//!
//! ## The Ledger Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Customer Balance Lifecycle                          │
//! │                                                                         │
//! │  Bill total 100, paid 40  ──► adjust_balance(mobile, +60)              │
//! │  Bill total 100, paid 100 ──► adjust_balance(mobile, +0)               │
//! │  Bill total 100, paid 150 ──► adjust_balance(mobile, −50)  (advance)   │
//! │  Manual correction        ──► adjust_balance(mobile, ±n)               │
//! │                                                                         │
//! │  balance = Σ (total − paid) over the mobile's bills ± corrections      │
//! │                                                                         │
//! │  The delta is applied as `SET balance = balance + ?` - one atomic      │
//! │  statement, no read-modify-write window.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mobile number is the business key: bill creation looks customers up
//! by mobile, never by id. Uniqueness is enforced by a UNIQUE index.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use billbook_core::{Customer, Money};

/// Column list shared by every customer SELECT.
pub(crate) const CUSTOMER_COLUMNS: &str =
    "id, name, mobile, email, balance, is_deleted, created_at, updated_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists customers, name order. Soft-deleted rows are excluded unless
    /// `include_deleted` is set.
    pub async fn list(&self, include_deleted: bool) -> DbResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE (is_deleted = 0 OR ?1) \
             ORDER BY name"
        );

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(include_deleted)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Gets a customer by mobile number - the lookup bill creation uses.
    pub async fn get_by_mobile(&self, mobile: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE mobile = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(mobile)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - mobile already registered
    pub async fn insert(&self, customer: &Customer) -> DbResult<Customer> {
        debug!(mobile = %customer.mobile, "Inserting customer");

        sqlx::query(
            "INSERT INTO customers ( \
                id, name, mobile, email, balance, is_deleted, created_at, updated_at \
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(customer.balance)
        .bind(customer.is_deleted)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer.clone())
    }

    /// Full-replace update of a customer row (balance included - manual
    /// corrections come through here).
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Updating customer");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE customers SET \
                name = ?2, mobile = ?3, email = ?4, balance = ?5, updated_at = ?6 \
             WHERE id = ?1",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(customer.balance)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Applies a signed delta to a customer's balance, keyed by mobile.
    /// One atomic SQL statement; concurrent bills cannot lose updates.
    pub async fn adjust_balance(&self, mobile: &str, delta: Money) -> DbResult<()> {
        debug!(mobile = %mobile, delta = %delta, "Adjusting balance");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE customers SET balance = balance + ?2, updated_at = ?3 WHERE mobile = ?1",
        )
        .bind(mobile)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", mobile));
        }

        Ok(())
    }

    /// Soft-deletes a customer.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting customer");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE customers SET is_deleted = 1, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}

/// Helper to generate a new customer ID.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample(id: &str, mobile: &str) -> Customer {
        let now = Utc::now();
        Customer {
            id: id.to_string(),
            name: format!("Customer {id}"),
            mobile: mobile.to_string(),
            email: None,
            balance: Money::zero(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup_by_mobile() {
        let repo = db().await.customers();
        repo.insert(&sample("c1", "0300-1111111")).await.unwrap();

        let found = repo.get_by_mobile("0300-1111111").await.unwrap().unwrap();
        assert_eq!(found.id, "c1");
        assert!(found.balance.is_zero());

        assert!(repo.get_by_mobile("0300-9999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_mobile_rejected() {
        let repo = db().await.customers();
        repo.insert(&sample("c1", "0300-1111111")).await.unwrap();

        let err = repo.insert(&sample("c2", "0300-1111111")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_adjust_balance_is_additive() {
        let repo = db().await.customers();
        repo.insert(&sample("c1", "0300-1111111")).await.unwrap();

        repo.adjust_balance("0300-1111111", Money::from_cents(60)).await.unwrap();
        repo.adjust_balance("0300-1111111", Money::from_cents(25)).await.unwrap();
        repo.adjust_balance("0300-1111111", Money::from_cents(-100)).await.unwrap();

        let customer = repo.get_by_mobile("0300-1111111").await.unwrap().unwrap();
        assert_eq!(customer.balance.cents(), -15);
    }

    #[tokio::test]
    async fn test_adjust_balance_unknown_mobile() {
        let repo = db().await.customers();
        let err = repo
            .adjust_balance("0300-0000000", Money::from_cents(10))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_full_replace_update() {
        let repo = db().await.customers();
        repo.insert(&sample("c1", "0300-1111111")).await.unwrap();

        let mut customer = repo.get_by_id("c1").await.unwrap().unwrap();
        customer.name = "Renamed".to_string();
        customer.email = Some("renamed@example.com".to_string());
        customer.balance = Money::from_cents(500);
        repo.update(&customer).await.unwrap();

        let reloaded = repo.get_by_id("c1").await.unwrap().unwrap();
        assert_eq!(reloaded.name, "Renamed");
        assert_eq!(reloaded.email.as_deref(), Some("renamed@example.com"));
        assert_eq!(reloaded.balance.cents(), 500);
    }

    #[tokio::test]
    async fn test_soft_delete_and_list() {
        let repo = db().await.customers();
        repo.insert(&sample("c1", "0300-1111111")).await.unwrap();
        repo.insert(&sample("c2", "0300-2222222")).await.unwrap();

        repo.soft_delete("c1").await.unwrap();

        assert_eq!(repo.list(false).await.unwrap().len(), 1);
        assert_eq!(repo.list(true).await.unwrap().len(), 2);
    }
}
