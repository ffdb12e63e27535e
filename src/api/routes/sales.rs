//! Sales Routes
//!
//! - GET /api/v1/sales - Paginated, sorted sales listing
//! - POST /api/v1/sales - Record a sale

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateSaleRequest, SaleResponse};
use crate::api::error::ApiResult;
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::inventory::Sale;
use crate::pagination::{Page, PageQuery, Sortable};

/// GET /api/v1/sales?page=1&limit=10&sortBy=soldAt&order=descending
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<SaleResponse>>> {
    let request = query.validate(&state.limits, Sale::sort_keys())?;
    let page = state.inventory.read().await.list_sales(&request);
    Ok(Json(page.map(SaleResponse::from)))
}

/// POST /api/v1/sales
pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateSaleRequest>,
) -> ApiResult<(StatusCode, Json<SaleResponse>)> {
    let sale = state
        .inventory
        .write()
        .await
        .record_sale(req.product_id, req.quantity, req.sold_at)?;

    tracing::debug!(sale_id = sale.id, user_id = %user.user_id, "Sale recorded via API");

    Ok((StatusCode::CREATED, Json(SaleResponse::from(sale))))
}
