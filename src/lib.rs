//! # Stockroom
//!
//! Inventory and sales dashboard backend: paginated, sortable listings,
//! sales analytics, and sign-in against an external identity provider.
//!
//! ## Modules
//!
//! - [`pagination`]: per-view paging/sorting state and page slicing
//! - [`inventory`]: products, sales, CSV import, and analytics
//! - [`auth`]: sign-in state machine and identity providers
//! - [`api`]: REST API server with Axum
//! - [`client`]: HTTP client driven by a view's pagination state
//!
//! ## Quick Start
//!
//! ```rust
//! use stockroom::inventory::InventoryStore;
//! use stockroom::pagination::{PageRequest, PaginationController, PaginationState};
//!
//! let store = InventoryStore::demo();
//!
//! let mut view = PaginationController::new(PaginationState::default());
//! view.set_sorting("price", None);
//! view.set_sorting("price", None);
//!
//! let page = store.list_products(&PageRequest::from(view.state()));
//! assert_eq!(page.items.len(), 10);
//! assert!(page.items[0].price >= page.items[1].price);
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod inventory;
pub mod logging;
pub mod pagination;

// Re-export top-level types for convenience
pub use pagination::{
    paginate, Page, PageQuery, PageRequest, PaginationController, PaginationError,
    PaginationLimits, PaginationState, QueryParameters, SortDirection, Sortable,
};

pub use inventory::{
    GoalProgress, InventoryError, InventoryStore, InventorySummary, Product, Sale,
};

pub use auth::{
    AuthError, AuthEvent, AuthMachine, AuthSession, AuthState, HttpIdentityProvider, Identity,
    IdentityProvider, StaticTokenProvider,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use client::{ClientError, InventoryClient};

pub use config::{Config, ConfigError, LoggingConfig};
