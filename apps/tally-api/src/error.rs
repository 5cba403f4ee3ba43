//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Handler ── Result<T, ApiError>                                        │
//! │     │                                                                   │
//! │     ├── CheckoutError::Unresolvable ──► 400 PRODUCT_NOT_FOUND + item   │
//! │     ├── CheckoutError::Invalid ───────► 400 VALIDATION_ERROR           │
//! │     ├── CheckoutError::Lookup/Recording ► 500 DATABASE_ERROR           │
//! │     ├── DbError::NotFound ────────────► 404 NOT_FOUND                  │
//! │     ├── DbError::UniqueViolation ─────► 409 CONFLICT                   │
//! │     ├── DbError::StillReferenced ─────► 409 CONFLICT                   │
//! │     └── anything else from storage ───► 500 DATABASE_ERROR             │
//! │                                                                         │
//! │  Storage details are logged here and never serialized.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! { "code": "PRODUCT_NOT_FOUND", "message": "...", "item": { ... } }
//! ```
//! `item` is present only for an unresolvable cart line.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tally_checkout::CheckoutError;
use tally_core::{CoreError, SaleItemRequest, ValidationError};
use tally_db::DbError;

/// Message returned for any storage failure during checkout.
pub const RECORD_FAILURE_MESSAGE: &str = "Failed to record sale";

/// API error returned from HTTP handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// The cart line that matched no product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<SaleItemRequest>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// A cart line matched no product (400)
    ProductNotFound,

    /// Duplicate product code or product still referenced (409)
    Conflict,

    /// Missing or wrong admin token (401)
    Unauthorized,

    /// Catalog mutations are disabled (403)
    Forbidden,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::ProductNotFound => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            item: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    /// Creates the REJECTED response for an unresolvable line.
    pub fn unresolvable(item: SaleItemRequest) -> Self {
        let reference = item
            .product_code
            .as_deref()
            .or(item.product_id.as_deref())
            .unwrap_or("<none>");
        ApiError {
            code: ErrorCode::ProductNotFound,
            message: format!("Product not found for item '{}' ({})", item.name, reference),
            item: Some(item),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Converts checkout outcomes to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Invalid(e) => e.into(),
            CheckoutError::Unresolvable { item } => ApiError::unresolvable(item),
            CheckoutError::Lookup(e) | CheckoutError::Recording(e) => {
                tracing::error!(error = %e, "Checkout storage failure");
                ApiError::new(ErrorCode::DatabaseError, RECORD_FAILURE_MESSAGE)
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", &id),
            CoreError::EmptyCart => ApiError::validation("Cart is empty"),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::conflict(format!("{} '{}' already exists", field, value))
            }
            DbError::StillReferenced { entity, id } => ApiError::conflict(format!(
                "{} {} is referenced by recorded sales and cannot be deleted",
                entity, id
            )),
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}
