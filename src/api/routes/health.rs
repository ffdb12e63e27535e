//! Health Routes
//!
//! - GET /health/live - Liveness check (process is alive)
//! - GET /health/ready - Readiness check (inventory lock is obtainable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use std::time::Duration;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// A writer holding the inventory for over a second means we are stuck.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match tokio::time::timeout(Duration::from_secs(1), state.inventory.read()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let inventory = state.inventory.read().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        products: inventory.products().len(),
        sales: inventory.sales().len(),
        identity_provider: state.identity.name().to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
