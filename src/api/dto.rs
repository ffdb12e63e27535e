//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthState, Identity};
use crate::inventory::{Product, Sale};

// ============================================
// PRODUCT DTOs
// ============================================

/// Create product request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub reorder_level: u32,
}

impl CreateProductRequest {
    pub fn into_product(self) -> Product {
        Product::new(self.sku, self.name, self.category)
            .price(self.price)
            .quantity(self.quantity)
            .reorder_level(self.reorder_level)
    }
}

/// Product with derived stock figures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub stock_value: f64,
    pub low_stock: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            stock_value: product.stock_value(),
            low_stock: product.is_low_stock(),
            product,
        }
    }
}

// ============================================
// SALE DTOs
// ============================================

/// Record sale request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub product_id: u32,
    pub quantity: u32,
    /// Defaults to now
    #[serde(default)]
    pub sold_at: Option<DateTime<Utc>>,
}

/// Sale with its revenue
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    #[serde(flatten)]
    pub sale: Sale,
    pub revenue: f64,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            revenue: sale.revenue(),
            sale,
        }
    }
}

// ============================================
// ANALYTICS DTOs
// ============================================

/// Goal progress query: `?target=5000&metric=revenue`
#[derive(Debug, Deserialize)]
pub struct GoalQuery {
    pub target: f64,
    /// `revenue` (default) or `units`
    #[serde(default = "default_goal_metric")]
    pub metric: String,
}

fn default_goal_metric() -> String {
    "revenue".to_string()
}

// ============================================
// SESSION DTOs
// ============================================

/// Caller's authentication state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub state: AuthState,
    /// Identity requests are served as (may be the guest placeholder)
    pub effective_identity: Option<Identity>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub products: usize,
    pub sales: usize,
    pub identity_provider: String,
    pub uptime_seconds: u64,
    pub version: String,
}
