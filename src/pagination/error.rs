//! Pagination error types

use thiserror::Error;

/// Errors raised while validating an incoming listing request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page must be at least 1")]
    InvalidPage,

    #[error("Limit must be at least 1")]
    InvalidLimit,

    #[error("Limit too high: {limit} (maximum allowed is {max})")]
    LimitTooHigh { limit: u32, max: u32 },

    #[error("Cannot sort by '{key}' (allowed: {})", allowed.join(", "))]
    UnknownSortKey { key: String, allowed: Vec<String> },

    #[error("Invalid sort order '{0}': expected ascending or descending")]
    InvalidOrder(String),
}

/// Result type alias for pagination operations
pub type PaginationResult<T> = Result<T, PaginationError>;
