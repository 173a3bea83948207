//! # Product Handlers
//!
//! Catalog CRUD. Cost prices are redacted for non-admin callers; deletes
//! are soft and admin-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use tracing::info;

use crate::dto::{CreateProductRequest, ListQuery, ProductResponse, UpdateProductRequest};
use crate::error::ApiError;
use crate::identity::Identity;
use crate::AppState;
use billbook_core::validation::{validate_name, validate_price, validate_sku};
use billbook_core::Product;
use billbook_db::repository::product::generate_product_id;

/// `GET /products?includeDeleted=`
pub async fn list_products(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.db.products().list(query.include_deleted).await?;

    Ok(Json(
        products
            .into_iter()
            .map(|p| ProductResponse::for_role(p, identity.role))
            .collect(),
    ))
}

/// `GET /products/low-stock` - products at or below their threshold.
pub async fn low_stock(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.db.products().list_low_stock().await?;

    Ok(Json(
        products
            .into_iter()
            .map(|p| ProductResponse::for_role(p, identity.role))
            .collect(),
    ))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(Json(ProductResponse::for_role(product, identity.role)))
}

/// `POST /products`
pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    validate_name("name", &request.name)?;
    validate_sku(&request.sku)?;
    validate_price("cost price", request.cost_price)?;
    validate_price("sell price", request.sell_price)?;

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name: request.name.trim().to_string(),
        sku: request.sku.trim().to_string(),
        category: request.category.trim().to_string(),
        cost_price: request.cost_price,
        sell_price: request.sell_price,
        stock: request.stock,
        low_stock_threshold: request.low_stock_threshold,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    let inserted = state.db.products().insert(&product).await?;
    info!(id = %inserted.id, sku = %inserted.sku, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::for_role(inserted, identity.role)),
    ))
}

/// `PUT /products/{id}` - partial patch; absent fields keep their value.
pub async fn update_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    if let Some(name) = &request.name {
        validate_name("name", name)?;
    }
    if let Some(sku) = &request.sku {
        validate_sku(sku)?;
    }
    if let Some(cost_price) = request.cost_price {
        validate_price("cost price", cost_price)?;
    }
    if let Some(sell_price) = request.sell_price {
        validate_price("sell price", sell_price)?;
    }

    let updated = state.db.products().update(&id, &request.into()).await?;
    info!(id = %updated.id, "Product updated");

    Ok(Json(ProductResponse::for_role(updated, identity.role)))
}

/// `DELETE /products/{id}` - soft delete, admin-only.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    identity.require_admin()?;

    state.db.products().soft_delete(&id).await?;
    info!(id = %id, by = %identity.email, "Product soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}
