//! Pagination controller
//!
//! Holds the paging and sorting state of a single tabular view and keeps it
//! consistent across mutations. Each view owns its own controller; there is
//! no shared instance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::PaginationError;
use super::params::QueryParameters;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default field to sort by
pub const DEFAULT_SORT_KEY: &str = "name";

/// Sort order for a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The opposite direction
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            "descending" | "desc" => Ok(SortDirection::Descending),
            _ => Err(PaginationError::InvalidOrder(s.to_string())),
        }
    }
}

/// Paging and sorting state of one view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// Current page, 1-indexed
    pub page: u32,
    /// Records per page
    pub page_size: u32,
    /// Field the records are ordered by
    pub sort_key: String,
    pub sort_direction: SortDirection,
}

impl PaginationState {
    pub fn new(
        page: u32,
        page_size: u32,
        sort_key: impl Into<String>,
        sort_direction: SortDirection,
    ) -> Self {
        Self {
            page,
            page_size,
            sort_key: sort_key.into(),
            sort_direction,
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, DEFAULT_SORT_KEY, SortDirection::Ascending)
    }
}

/// Single source of truth for a view's paging and sorting
///
/// Inputs are trusted: callers validate page numbers and sizes before
/// handing them over. Untrusted input (HTTP query strings) goes through
/// [`PageRequest`](super::PageRequest) instead.
#[derive(Debug, Clone)]
pub struct PaginationController {
    initial: PaginationState,
    state: PaginationState,
}

impl PaginationController {
    /// Create a controller starting from `initial`; `reset()` returns here
    pub fn new(initial: PaginationState) -> Self {
        Self {
            state: initial.clone(),
            initial,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn page_size(&self) -> u32 {
        self.state.page_size
    }

    pub fn sort_key(&self) -> &str {
        &self.state.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.state.sort_direction
    }

    /// Number of records before the current page
    pub fn offset(&self) -> u64 {
        u64::from(self.state.page.saturating_sub(1)) * u64::from(self.state.page_size)
    }

    /// Jump to a page. Not checked against any total; a page past the end
    /// simply yields no rows downstream.
    pub fn set_page(&mut self, page: u32) {
        debug_assert!(page >= 1, "page must be positive");
        self.state.page = page;
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, page_size: u32) {
        debug_assert!(page_size >= 1, "page size must be positive");
        self.state.page_size = page_size;
        self.state.page = 1;
    }

    /// Sort by `key`.
    ///
    /// Without an explicit direction, sorting again on the active key flips
    /// the direction and sorting on a new key starts ascending. Always goes
    /// back to the first page.
    pub fn set_sorting(&mut self, key: impl Into<String>, direction: Option<SortDirection>) {
        let key = key.into();
        let direction = match direction {
            Some(direction) => direction,
            None if key == self.state.sort_key => self.state.sort_direction.toggle(),
            None => SortDirection::Ascending,
        };

        self.state.sort_key = key;
        self.state.sort_direction = direction;
        self.state.page = 1;
    }

    /// Query parameters for the data-fetch layer
    pub fn to_query_parameters(&self) -> QueryParameters {
        QueryParameters::from_state(&self.state)
    }

    /// Restore the values the controller was created with
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(PaginationState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PaginationController {
        PaginationController::new(PaginationState::new(1, 10, "name", SortDirection::Ascending))
    }

    #[test]
    fn test_new_matches_initial_values() {
        let initial = PaginationState::new(4, 50, "sku", SortDirection::Descending);
        let ctrl = PaginationController::new(initial.clone());
        assert_eq!(ctrl.state(), &initial);
    }

    #[test]
    fn test_default_state() {
        let ctrl = PaginationController::default();
        assert_eq!(ctrl.page(), 1);
        assert_eq!(ctrl.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(ctrl.sort_key(), "name");
        assert_eq!(ctrl.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_set_page_has_no_upper_bound() {
        let mut ctrl = controller();
        ctrl.set_page(9_999);
        assert_eq!(ctrl.page(), 9_999);
        assert_eq!(ctrl.page_size(), 10);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut ctrl = controller();
        for size in [1, 7, 25, 100] {
            ctrl.set_page(6);
            ctrl.set_page_size(size);
            assert_eq!(ctrl.page_size(), size);
            assert_eq!(ctrl.page(), 1);
        }
    }

    #[test]
    fn test_sorting_same_key_toggles() {
        let mut ctrl = controller();
        ctrl.set_sorting("price", None);
        assert_eq!(ctrl.sort_direction(), SortDirection::Ascending);
        ctrl.set_sorting("price", None);
        assert_eq!(ctrl.sort_direction(), SortDirection::Descending);
        ctrl.set_sorting("price", None);
        assert_eq!(ctrl.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_sorting_new_key_starts_ascending() {
        let mut ctrl = controller();
        ctrl.set_sorting("name", Some(SortDirection::Descending));
        ctrl.set_sorting("quantity", None);
        assert_eq!(ctrl.sort_key(), "quantity");
        assert_eq!(ctrl.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_sorting_explicit_direction_wins() {
        let mut ctrl = controller();
        ctrl.set_sorting("name", Some(SortDirection::Ascending));
        assert_eq!(ctrl.sort_direction(), SortDirection::Ascending);
        ctrl.set_sorting("price", Some(SortDirection::Descending));
        assert_eq!(ctrl.sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn test_sorting_resets_page() {
        let mut ctrl = controller();
        ctrl.set_page(4);
        ctrl.set_sorting("name", None);
        assert_eq!(ctrl.page(), 1);
    }

    #[test]
    fn test_reset_restores_initial() {
        let initial = PaginationState::new(2, 20, "category", SortDirection::Descending);
        let mut ctrl = PaginationController::new(initial.clone());
        ctrl.set_page(8);
        ctrl.set_page_size(5);
        ctrl.set_sorting("price", None);
        ctrl.set_sorting("price", None);
        ctrl.reset();
        assert_eq!(ctrl.state(), &initial);
    }

    #[test]
    fn test_offset() {
        let mut ctrl = controller();
        assert_eq!(ctrl.offset(), 0);
        ctrl.set_page(3);
        assert_eq!(ctrl.offset(), 20);
    }

    #[test]
    fn test_view_walkthrough() {
        let mut ctrl = controller();

        ctrl.set_page(3);
        assert_eq!(ctrl.state(), &PaginationState::new(3, 10, "name", SortDirection::Ascending));

        ctrl.set_page_size(25);
        assert_eq!(ctrl.state(), &PaginationState::new(1, 25, "name", SortDirection::Ascending));

        ctrl.set_sorting("price", None);
        assert_eq!(ctrl.state(), &PaginationState::new(1, 25, "price", SortDirection::Ascending));

        ctrl.set_sorting("price", None);
        assert_eq!(ctrl.state(), &PaginationState::new(1, 25, "price", SortDirection::Descending));

        let params = ctrl.to_query_parameters();
        assert_eq!(params.get("page"), Some("1"));
        assert_eq!(params.get("limit"), Some("25"));
        assert_eq!(params.get("sortBy"), Some("price"));
        assert_eq!(params.get("order"), Some("descending"));
    }

    #[test]
    fn test_query_parameters_idempotent() {
        let mut ctrl = controller();
        ctrl.set_sorting("price", Some(SortDirection::Descending));
        let first = ctrl.to_query_parameters();
        let second = ctrl.to_query_parameters();
        assert_eq!(first, second);
        assert_eq!(first.to_query_string(), second.to_query_string());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!(
            "descending".parse::<SortDirection>().unwrap(),
            SortDirection::Descending
        );
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
