//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{CartError, DomainError};
use store::StorageError;
use storefront::{AccountError, CatalogError, OrderServiceError, StorefrontError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Storefront or collaborator error.
    Storefront(StorefrontError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, error_body(msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg)),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Storefront(err) => storefront_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, error_body(msg))
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn error_body(message: impl ToString) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, serde_json::Value) {
    match &err {
        DomainError::Cart(CartError::QuantityOverflow { .. }) => {
            (StatusCode::CONFLICT, error_body(&err))
        }
        DomainError::Cart(_) => (StatusCode::BAD_REQUEST, error_body(&err)),
        DomainError::ProductValidation(validation) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            serde_json::json!({
                "error": err.to_string(),
                "fields": validation.fields,
            }),
        ),
    }
}

fn storefront_error_to_response(err: StorefrontError) -> (StatusCode, serde_json::Value) {
    match err {
        StorefrontError::Domain(domain) => domain_error_to_response(domain),
        StorefrontError::Catalog(CatalogError::InvalidProduct(validation)) => {
            domain_error_to_response(DomainError::ProductValidation(validation))
        }
        StorefrontError::Catalog(CatalogError::NotFound(_))
        | StorefrontError::Account(AccountError::NotFound(_))
        | StorefrontError::Order(OrderServiceError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, error_body(&err))
        }
        StorefrontError::Account(AccountError::EmailTaken(_)) => {
            (StatusCode::CONFLICT, error_body(&err))
        }
        StorefrontError::Account(AccountError::InvalidInput(_)) => {
            (StatusCode::BAD_REQUEST, error_body(&err))
        }
        StorefrontError::Account(AccountError::InvalidCredentials)
        | StorefrontError::NotSignedIn => (StatusCode::UNAUTHORIZED, error_body(&err)),
        StorefrontError::Catalog(CatalogError::Unavailable(_))
        | StorefrontError::Account(AccountError::Unavailable(_))
        | StorefrontError::Order(OrderServiceError::Unavailable(_)) => {
            tracing::warn!(error = %err, "collaborator unavailable");
            (StatusCode::BAD_GATEWAY, error_body(&err))
        }
        StorefrontError::Account(AccountError::Hashing(_)) | StorefrontError::Storage(_) => {
            tracing::error!(error = %err, "internal server error");
            (StatusCode::INTERNAL_SERVER_ERROR, error_body(&err))
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<StorefrontError> for ApiError {
    fn from(err: StorefrontError) -> Self {
        ApiError::Storefront(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Storefront(err.into())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        ApiError::Storefront(err.into())
    }
}

impl From<OrderServiceError> for ApiError {
    fn from(err: OrderServiceError) -> Self {
        ApiError::Storefront(err.into())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storefront(err.into())
    }
}
