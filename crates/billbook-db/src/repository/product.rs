//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD with soft delete
//! - Partial updates via [`ProductPatch`] (only fields present in the
//!   patch are written - `None` means "leave alone", for every field
//!   including stock)
//! - Stock adjustment as a SQL delta update
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ❌ WRONG: read-modify-write (loses concurrent updates)            │
//! │     SELECT stock ... ; UPDATE products SET stock = 7               │
//! │                                                                     │
//! │  ✅ CORRECT: delta update (atomic in SQL)                          │
//! │     UPDATE products SET stock = stock - 3                          │
//! │                                                                     │
//! │  Two terminals selling the same product both land their deltas.    │
//! │  There is deliberately no floor: stock may go negative.            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use billbook_core::{Money, Product, Quantity};

/// Column list shared by every product SELECT.
pub(crate) const PRODUCT_COLUMNS: &str = "id, name, sku, category, cost_price, sell_price, \
     stock, low_stock_threshold, is_deleted, created_at, updated_at";

/// A partial update to a product.
///
/// `None` means the field was absent from the request and keeps its stored
/// value. This applies to `stock` like everything else: presence is
/// explicit, a zero value never stands in for "absent".
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub cost_price: Option<Money>,
    pub sell_price: Option<Money>,
    pub stock: Option<Quantity>,
    pub low_stock_threshold: Option<Quantity>,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, name order. Soft-deleted rows are excluded unless
    /// `include_deleted` is set.
    pub async fn list(&self, include_deleted: bool) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE (is_deleted = 0 OR ?1) \
             ORDER BY name"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(include_deleted)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists live products at or below their low-stock threshold.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_deleted = 0 AND stock <= low_stock_threshold \
             ORDER BY stock"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its ID, deleted or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                id, name, sku, category, cost_price, sell_price, \
                stock, low_stock_threshold, is_deleted, created_at, updated_at \
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(product.cost_price)
        .bind(product.sell_price)
        .bind(product.stock)
        .bind(product.low_stock_threshold)
        .bind(product.is_deleted)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Applies a partial update and returns the updated product.
    ///
    /// Only fields present in the patch are written. Missing id → NotFound.
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let mut product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(sku) = &patch.sku {
            product.sku = sku.clone();
        }
        if let Some(category) = &patch.category {
            product.category = category.clone();
        }
        if let Some(cost_price) = patch.cost_price {
            product.cost_price = cost_price;
        }
        if let Some(sell_price) = patch.sell_price {
            product.sell_price = sell_price;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            product.low_stock_threshold = threshold;
        }
        product.updated_at = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                name = ?2, sku = ?3, category = ?4, cost_price = ?5, \
                sell_price = ?6, stock = ?7, low_stock_threshold = ?8, \
                updated_at = ?9 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(product.cost_price)
        .bind(product.sell_price)
        .bind(product.stock)
        .bind(product.low_stock_threshold)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(product)
    }

    /// Adjusts product stock by a delta (negative for sales, positive for
    /// restocking). Atomic in SQL; no floor at zero.
    pub async fn adjust_stock(&self, id: &str, delta: Quantity) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_deleted.
    ///
    /// Historical bills still reference the row; nothing is ever removed.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE products SET is_deleted = 1, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts live products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
