//! Storefront error types.

use common::{OrderId, ProductId, UserId};
use domain::{DomainError, ProductValidationError};
use store::StorageError;
use thiserror::Error;

/// Errors returned by a catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product exists with the given ID.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// A product draft was rejected before reaching the backend.
    #[error(transparent)]
    InvalidProduct(#[from] ProductValidationError),

    /// The backend could not be reached or failed.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the identity and profile backend.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Registration used an email that already has an account.
    #[error("Email already in use: {0}")]
    EmailTaken(String),

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration input was rejected.
    #[error("Invalid registration: {0}")]
    InvalidInput(String),

    /// No profile exists for the user.
    #[error("User profile not found: {0}")]
    NotFound(UserId),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// The backend could not be reached or failed.
    #[error("Account service unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the order backend.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    /// No order exists with the given ID.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The backend could not be reached or failed.
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during storefront operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Catalog error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Account error.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Order service error.
    #[error("Order service error: {0}")]
    Order(#[from] OrderServiceError),

    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Session storage error.
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation requires a signed-in user.
    #[error("Not signed in")]
    NotSignedIn,
}

/// Convenience type alias for storefront results.
pub type Result<T> = std::result::Result<T, StorefrontError>;
