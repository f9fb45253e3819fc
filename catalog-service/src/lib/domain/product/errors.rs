use thiserror::Error;

use crate::product::models::ProductId;

/// Top-level error for all product-related operations
#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Product already exists: {0}")]
    AlreadyExists(ProductId),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
