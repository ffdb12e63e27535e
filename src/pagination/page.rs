//! Paged results
//!
//! Sorting and slicing of in-memory collections into [`Page`]s.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::controller::SortDirection;
use super::params::PageRequest;

/// A record type that can be ordered by named fields
pub trait Sortable {
    /// Field names accepted as `sortBy`; the first one is the default
    fn sort_keys() -> &'static [&'static str];

    /// Compare two records by `key`. Unknown keys compare equal.
    fn compare_by(&self, other: &Self, key: &str) -> Ordering;
}

/// One page of a sorted result set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Slice an already sorted collection.
    ///
    /// A page past the end yields no items rather than an error.
    pub fn from_sorted(items: Vec<T>, request: &PageRequest) -> Self {
        let total = items.len();
        let limit = request.limit.max(1) as usize;
        let total_pages = total.div_ceil(limit) as u32;

        let items: Vec<T> = items
            .into_iter()
            .skip(request.offset())
            .take(limit)
            .collect();

        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }

    /// Convert the items, keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Sort `records` by the request's key and direction, then page.
///
/// The sort is stable, so records with equal keys keep their input order.
pub fn paginate<T: Sortable + Clone>(records: &[T], request: &PageRequest) -> Page<T> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ord = a.compare_by(b, &request.sort_key);
        match request.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    Page::from_sorted(sorted, request)
}
