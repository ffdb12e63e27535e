//! Query parameters
//!
//! The client side renders a [`PaginationState`] into `page`, `limit`,
//! `sortBy` and `order` string parameters. The server side parses the same
//! parameters back into a validated [`PageRequest`].

use serde::{Deserialize, Serialize};

use super::controller::{PaginationState, SortDirection, DEFAULT_PAGE_SIZE, DEFAULT_SORT_KEY};
use super::error::{PaginationError, PaginationResult};

/// Parameter names, in rendering order
pub const PARAM_KEYS: [&str; 4] = ["page", "limit", "sortBy", "order"];

/// String-valued query parameters handed to the data-fetch layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameters {
    page: String,
    limit: String,
    #[serde(rename = "sortBy")]
    sort_by: String,
    order: String,
}

impl QueryParameters {
    pub fn from_state(state: &PaginationState) -> Self {
        Self {
            page: state.page.to_string(),
            limit: state.page_size.to_string(),
            sort_by: state.sort_key.clone(),
            order: state.sort_direction.to_string(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "page" => Some(&self.page),
            "limit" => Some(&self.limit),
            "sortBy" => Some(&self.sort_by),
            "order" => Some(&self.order),
            _ => None,
        }
    }

    /// Key/value pairs in a fixed order
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        PARAM_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// URL-encoded `page=..&limit=..&sortBy=..&order=..`
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Server-side defaults and bounds for incoming listing requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 100,
        }
    }
}

/// Raw listing parameters as they arrive on the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default, rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

impl PageQuery {
    /// Validate against the resource's sortable fields.
    ///
    /// `sort_keys[0]` is the default sort key when none is supplied.
    pub fn validate(
        &self,
        limits: &PaginationLimits,
        sort_keys: &[&str],
    ) -> PaginationResult<PageRequest> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(PaginationError::InvalidPage);
        }

        let limit = self.limit.unwrap_or(limits.default_page_size);
        if limit == 0 {
            return Err(PaginationError::InvalidLimit);
        }
        if limit > limits.max_page_size {
            return Err(PaginationError::LimitTooHigh {
                limit,
                max: limits.max_page_size,
            });
        }

        let sort_key = match &self.sort_by {
            Some(key) if sort_keys.contains(&key.as_str()) => key.clone(),
            Some(key) => {
                return Err(PaginationError::UnknownSortKey {
                    key: key.clone(),
                    allowed: sort_keys.iter().map(|k| k.to_string()).collect(),
                })
            }
            None => sort_keys
                .first()
                .copied()
                .unwrap_or(DEFAULT_SORT_KEY)
                .to_string(),
        };

        let direction = match &self.order {
            Some(order) => order.parse()?,
            None => SortDirection::Ascending,
        };

        Ok(PageRequest {
            page,
            limit,
            sort_key,
            direction,
        })
    }
}

/// A validated listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort_key: String,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }
}

impl From<&PaginationState> for PageRequest {
    fn from(state: &PaginationState) -> Self {
        Self {
            page: state.page,
            limit: state.page_size,
            sort_key: state.sort_key.clone(),
            direction: state.sort_direction,
        }
    }
}
