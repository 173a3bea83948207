//! # billbook-db: Database Layer for BillBook
//!
//! This crate provides database access for BillBook. It uses SQLite for
//! storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BillBook Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /bills)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    billbook-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐    │   │
//! │  │   │   Database    │   │ Repositories  │   │   checkout   │    │   │
//! │  │   │   (pool.rs)   │   │ product.rs    │   │ transaction  │    │   │
//! │  │   │               │   │ customer.rs   │   │              │    │   │
//! │  │   │ SqlitePool    │◄──│ bill.rs       │◄──│ bill + stock │    │   │
//! │  │   │ Migrations    │   │ user.rs       │   │ + ledger     │    │   │
//! │  │   └───────────────┘   └───────────────┘   └──────────────┘    │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys ON)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, customer, bill, user)
//! - [`checkout`] - The transactional bill-creation workflow
//!
//! ## Usage
//!
//! ```rust,ignore
//! use billbook_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("billbook.db")).await?;
//!
//! let products = db.products().list(false).await?;
//! let outcome = billbook_db::checkout::create_bill(&db, request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutError, CheckoutOutcome, CheckoutRequest};
pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::bill::{BillFilter, BillRepository};
pub use repository::customer::CustomerRepository;
pub use repository::product::{ProductPatch, ProductRepository};
pub use repository::user::UserRepository;
