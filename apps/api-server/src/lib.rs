//! # BillBook API Server Library
//!
//! Router assembly and shared state. `main.rs` wires this to a TCP
//! listener; integration tests drive the router in-process.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                          liveness + db ping            │
//! │  POST   /auth/login                      mock login                    │
//! │                                                                         │
//! │  GET    /products?includeDeleted=        catalog (cost price redacted) │
//! │  GET    /products/low-stock              stock ≤ threshold             │
//! │  GET    /products/:id                                                  │
//! │  POST   /products                                                      │
//! │  PUT    /products/:id                    partial patch                 │
//! │  DELETE /products/:id                    soft, admin-only              │
//! │                                                                         │
//! │  GET    /bills?startDate=&endDate=       newest first, with items     │
//! │  GET    /bills/:id                                                     │
//! │  POST   /bills                           the checkout workflow         │
//! │  DELETE /bills/:id                       soft, admin-only              │
//! │                                                                         │
//! │  GET    /customers[?includeDeleted=]                                   │
//! │  GET    /customers/:id                                                 │
//! │  GET    /customers/mobile/:mobile        business-key lookup           │
//! │  POST   /customers                                                     │
//! │  PUT    /customers/:id                   full replace                  │
//! │  DELETE /customers/:id                   soft, admin-only              │
//! │                                                                         │
//! │  GET    /reports/sales?startDate=&endDate=                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod identity;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handlers::{auth, bills, customers, health, products, reports};
use crate::identity::identity_middleware;
use billbook_db::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Creates the main API router.
pub fn create_router(state: AppState) -> Router {
    let product_routes = Router::new()
        .route("/", get(products::list_products).post(products::create_product))
        .route("/low-stock", get(products::low_stock))
        .route(
            "/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        );

    let bill_routes = Router::new()
        .route("/", get(bills::list_bills).post(bills::create_bill))
        .route("/:id", get(bills::get_bill).delete(bills::delete_bill));

    let customer_routes = Router::new()
        .route(
            "/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/mobile/:mobile", get(customers::get_customer_by_mobile))
        .route(
            "/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        );

    let report_routes = Router::new().route("/sales", get(reports::sales_report));

    let auth_routes = Router::new().route("/login", post(auth::login));

    // Every resource route sees an Identity extension; the middleware never
    // rejects, it only classifies.
    let api_routes = Router::new()
        .nest("/products", product_routes)
        .nest("/bills", bill_routes)
        .nest("/customers", customer_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn(identity_middleware));

    let cors_permissive = state.config.cors_permissive;

    let router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_permissive {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}
