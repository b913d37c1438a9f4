//! Domain error types.

use thiserror::Error;

use crate::cart::CartError;
use crate::product::ProductValidationError;

/// Errors that can occur during domain operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A cart command was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A product draft failed validation.
    #[error(transparent)]
    ProductValidation(#[from] ProductValidationError),
}
