//! Analytics Routes
//!
//! Data behind the dashboard widgets.
//!
//! - GET /api/v1/analytics/summary - Stock and revenue totals
//! - GET /api/v1/analytics/monthly - Revenue per month
//! - GET /api/v1/analytics/categories - Sales per category
//! - GET /api/v1/analytics/goals?target=N&metric=revenue|units - Goal progress

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::GoalQuery;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::inventory::{
    category_breakdown, monthly_revenue, summarize, CategorySales, GoalProgress,
    InventorySummary, MonthlyRevenue,
};

/// GET /api/v1/analytics/summary
pub async fn summary(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Json<InventorySummary> {
    let inventory = state.inventory.read().await;
    Json(summarize(inventory.products(), inventory.sales()))
}

/// GET /api/v1/analytics/monthly
pub async fn monthly(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Json<Vec<MonthlyRevenue>> {
    let inventory = state.inventory.read().await;
    Json(monthly_revenue(inventory.sales()))
}

/// GET /api/v1/analytics/categories
pub async fn categories(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Json<Vec<CategorySales>> {
    let inventory = state.inventory.read().await;
    Json(category_breakdown(inventory.products(), inventory.sales()))
}

/// GET /api/v1/analytics/goals
pub async fn goals(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<GoalQuery>,
) -> ApiResult<Json<GoalProgress>> {
    if !query.target.is_finite() || query.target <= 0.0 {
        return Err(ApiError::Validation("target must be a positive number".to_string()));
    }

    let inventory = state.inventory.read().await;
    let achieved: f64 = match query.metric.as_str() {
        "revenue" => inventory.sales().iter().map(|s| s.revenue()).sum(),
        "units" => inventory.sales().iter().map(|s| f64::from(s.quantity)).sum(),
        other => {
            return Err(ApiError::Validation(format!(
                "Unknown goal metric '{}' (expected revenue or units)",
                other
            )))
        }
    };

    Ok(Json(GoalProgress::compute(query.metric, query.target, achieved)))
}
