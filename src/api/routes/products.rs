//! Product Routes
//!
//! - GET /api/v1/products - Paginated, sorted product listing
//! - POST /api/v1/products - Add a product
//! - GET /api/v1/products/:id - Get a single product

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateProductRequest, ProductResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::inventory::Product;
use crate::pagination::{Page, PageQuery, Sortable};

/// GET /api/v1/products?page=1&limit=10&sortBy=name&order=ascending
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ProductResponse>>> {
    let request = query.validate(&state.limits, Product::sort_keys())?;

    let page = state.inventory.read().await.list_products(&request);

    tracing::debug!(
        user_id = %user.user_id,
        page = request.page,
        limit = request.limit,
        sort_by = %request.sort_key,
        order = %request.direction,
        returned = page.items.len(),
        "Listed products"
    );

    Ok(Json(page.map(ProductResponse::from)))
}

/// GET /api/v1/products/:id
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<u32>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state
        .inventory
        .read()
        .await
        .product(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Product with id {} not found", id)))?;

    Ok(Json(ProductResponse::from(product)))
}

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let mut inventory = state.inventory.write().await;
    let id = inventory.add_product(req.into_product())?;
    let product = inventory
        .product(id)
        .cloned()
        .ok_or_else(|| ApiError::Internal(format!("Product {} vanished after insert", id)))?;

    tracing::info!(product_id = id, sku = %product.sku, user_id = %user.user_id, "Created product");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}
