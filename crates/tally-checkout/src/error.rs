//! Checkout errors.
//!
//! Each variant is a terminal outcome of the processor other than DONE.
//! Reconciliation failures are absent: they never fail a
//! checkout and are reported in [`crate::ReconciliationReport`] instead.

use tally_core::{CoreError, SaleItemRequest, StoreError};
use thiserror::Error;

/// Why a checkout did not produce a sale.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart failed validation before any store access.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// A line matched no product by id or by code. Nothing was written.
    #[error("Product not found for item")]
    Unresolvable { item: SaleItemRequest },

    /// A product lookup failed while resolving. Nothing was written.
    #[error("Product lookup failed: {0}")]
    Lookup(StoreError),

    /// The sale write failed. Nothing was written.
    #[error("Failed to record sale: {0}")]
    Recording(StoreError),
}

impl CheckoutError {
    /// True for failures caused by the store rather than the request.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, CheckoutError::Lookup(_) | CheckoutError::Recording(_))
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_classification() {
        let recording = CheckoutError::Recording(StoreError::Backend("disk full".into()));
        assert!(recording.is_storage_failure());
        assert!(CheckoutError::Lookup(StoreError::Backend("locked".into())).is_storage_failure());
        assert!(!CheckoutError::Invalid(CoreError::EmptyCart).is_storage_failure());
    }
}
