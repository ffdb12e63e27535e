//! Pagination and sorting
//!
//! - **controller**: per-view paging/sorting state ([`PaginationController`])
//! - **params**: query parameters in both directions (render and validate)
//! - **page**: sorting and slicing collections into [`Page`]s
//! - **error**: validation errors for untrusted input
//!
//! # Example
//!
//! ```rust
//! use stockroom::pagination::{PaginationController, PaginationState, SortDirection};
//!
//! let mut view = PaginationController::new(PaginationState::default());
//! view.set_page(3);
//! view.set_sorting("price", None);
//! assert_eq!(view.page(), 1);
//! assert_eq!(view.sort_direction(), SortDirection::Ascending);
//!
//! let params = view.to_query_parameters();
//! assert_eq!(params.to_query_string(), "page=1&limit=10&sortBy=price&order=ascending");
//! ```

pub mod controller;
pub mod error;
pub mod page;
pub mod params;

pub use controller::{
    PaginationController, PaginationState, SortDirection, DEFAULT_PAGE_SIZE, DEFAULT_SORT_KEY,
};
pub use error::{PaginationError, PaginationResult};
pub use page::{paginate, Page, Sortable};
pub use params::{PageQuery, PageRequest, PaginationLimits, QueryParameters, PARAM_KEYS};
