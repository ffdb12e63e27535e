//! Inventory error types

use thiserror::Error;

/// Errors that can occur while maintaining an inventory
#[derive(Error, Debug)]
pub enum InventoryError {
    /// A product with this SKU already exists
    #[error("Duplicate SKU: {0}")]
    DuplicateSku(String),

    /// Requested product does not exist
    #[error("Product not found: {0}")]
    ProductNotFound(u32),

    /// Sale quantity exceeds units on hand
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: u32,
        requested: u32,
        available: u32,
    },

    /// Invalid field value in a product or sale
    #[error("Invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    /// CSV parsing failed
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for InventoryError {
    fn from(err: csv::Error) -> Self {
        InventoryError::Csv(err.to_string())
    }
}

/// Result type alias for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InventoryError::InsufficientStock {
            product_id: 3,
            requested: 5,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 3: requested 5, available 2"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InventoryError = io_err.into();
        assert!(matches!(err, InventoryError::Io(_)));
    }
}
