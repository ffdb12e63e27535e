//! Inventory
//!
//! - **types**: `Product` and `Sale`
//! - **store**: an owned, per-dashboard `InventoryStore`
//! - **import**: CSV loading
//! - **analytics**: aggregates for chart and goal widgets
//! - **error**: error types

pub mod analytics;
pub mod error;
pub mod import;
pub mod store;
pub mod types;

pub use analytics::{
    category_breakdown, monthly_revenue, summarize, CategorySales, GoalProgress,
    InventorySummary, MonthlyRevenue,
};
pub use error::{InventoryError, InventoryResult};
pub use import::{import_products, import_products_csv, import_sales, import_sales_csv, ImportReport};
pub use store::InventoryStore;
pub use types::{Product, Sale};
