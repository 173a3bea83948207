//! # Request / Response DTOs
//!
//! Wire shapes for the REST surface. Field names are camelCase to match
//! the client; amounts ride as integer cents and quantities as integer
//! thousandths (the `Money`/`Quantity` newtypes serialize transparently).
//!
//! Domain types stay in billbook-core; everything here is a thin
//! translation layer with `From` impls.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use billbook_core::cart::{CartLine, PaymentDisposition};
use billbook_core::{
    Bill, BillItem, BillStatus, Customer, Money, Product, ProductSales, Quantity, Role, User,
};
use billbook_db::ProductPatch;

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,

    /// Redacted (omitted) for non-admin callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Money>,

    pub sell_price: Money,
    pub stock: Quantity,
    pub low_stock_threshold: Quantity,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    /// Builds the response, hiding the cost price from non-admin roles.
    pub fn for_role(product: Product, role: Role) -> Self {
        let cost_price = role.is_admin().then_some(product.cost_price);
        ProductResponse {
            id: product.id,
            name: product.name,
            sku: product.sku,
            category: product.category,
            cost_price,
            sell_price: product.sell_price,
            stock: product.stock,
            low_stock_threshold: product.low_stock_threshold,
            is_deleted: product.is_deleted,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cost_price: Money,
    pub sell_price: Money,
    #[serde(default)]
    pub stock: Quantity,
    #[serde(default)]
    pub low_stock_threshold: Quantity,
}

/// Partial update: absent fields keep their stored value, stock included.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub cost_price: Option<Money>,
    pub sell_price: Option<Money>,
    pub stock: Option<Quantity>,
    pub low_stock_threshold: Option<Quantity>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(request: UpdateProductRequest) -> Self {
        ProductPatch {
            name: request.name,
            sku: request.sku,
            category: request.category,
            cost_price: request.cost_price,
            sell_price: request.sell_price,
            stock: request.stock,
            low_stock_threshold: request.low_stock_threshold,
        }
    }
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub balance: Money,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        CustomerResponse {
            id: customer.id,
            name: customer.name,
            mobile: customer.mobile,
            email: customer.email,
            balance: customer.balance,
            is_deleted: customer.is_deleted,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    /// Opening balance; manual corrections later go through PUT.
    #[serde(default)]
    pub balance: Money,
}

/// Full replace, matching the ledger's update semantics.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub balance: Money,
}

// =============================================================================
// Bills
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: Quantity,
    /// Unit price snapshot at sale time.
    pub price: Money,
    pub total: Money,
}

impl From<BillItem> for BillItemResponse {
    fn from(item: BillItem) -> Self {
        BillItemResponse {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.unit_price,
            total: item.line_total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub id: String,
    pub bill_number: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_mobile: Option<String>,
    pub date: NaiveDate,
    pub date_time: DateTime<Utc>,
    pub items: Vec<BillItemResponse>,
    pub subtotal: Money,
    pub discount_amount: Money,
    /// Percentage derived from the amount (e.g. 12.5).
    pub discount_percentage: f64,
    pub tax_amount: Money,
    pub total: Money,
    pub amount_paid: Money,
    pub status: BillStatus,
    pub created_by: String,
    pub is_deleted: bool,
}

impl BillResponse {
    pub fn from_parts(bill: Bill, items: Vec<BillItem>) -> Self {
        BillResponse {
            id: bill.id,
            bill_number: bill.bill_number,
            customer_name: bill.customer_name,
            customer_email: bill.customer_email,
            customer_mobile: bill.customer_mobile,
            date: bill.date,
            date_time: bill.created_at,
            items: items.into_iter().map(BillItemResponse::from).collect(),
            subtotal: bill.subtotal,
            discount_amount: bill.discount_amount,
            discount_percentage: bill.discount_bps as f64 / 100.0,
            tax_amount: bill.tax_amount,
            total: bill.total,
            amount_paid: bill.amount_paid,
            status: bill.status,
            created_by: bill.created_by,
            is_deleted: bill.is_deleted,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    pub product_id: String,
    pub quantity: Quantity,
}

impl From<CartLineRequest> for CartLine {
    fn from(line: CartLineRequest) -> Self {
        CartLine {
            product_id: line.product_id,
            quantity: line.quantity,
        }
    }
}

/// How the request says the bill was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTypeRequest {
    /// amount_paid is set equal to the computed total.
    Paid,
    /// amountPaid carries the explicit amount (missing means 0).
    Partial,
}

impl Default for PaymentTypeRequest {
    fn default() -> Self {
        PaymentTypeRequest::Paid
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub items: Vec<CartLineRequest>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_mobile: Option<String>,
    #[serde(default)]
    pub discount_amount: Money,
    #[serde(default)]
    pub payment_type: PaymentTypeRequest,
    pub amount_paid: Option<Money>,
}

impl CreateBillRequest {
    pub fn disposition(&self) -> PaymentDisposition {
        match self.payment_type {
            PaymentTypeRequest::Paid => PaymentDisposition::Paid,
            PaymentTypeRequest::Partial => {
                PaymentDisposition::Partial(self.amount_paid.unwrap_or_else(Money::zero))
            }
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportRow {
    pub product_id: String,
    pub product_name: String,
    pub total_quantity: Quantity,
    pub total_revenue: Money,
    /// Line-item rows in the group - an approximation of distinct invoices.
    pub invoice_count: u32,
}

impl From<ProductSales> for SalesReportRow {
    fn from(row: ProductSales) -> Self {
        SalesReportRow {
            product_id: row.product_id,
            product_name: row.product_name,
            total_quantity: row.total_quantity,
            total_revenue: row.total_revenue,
            invoice_count: row.invoice_count,
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The user record, sans password.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

// =============================================================================
// Common query parameters
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub include_deleted: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
