//! # Validation Module
//!
//! Input validation utilities for Tally POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  └── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization, decimal strings only)           │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints (RESTRICT on sold_items)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches a store. Whether a product reference actually
//! resolves is decided later, by the resolver.

use crate::error::ValidationError;
use crate::money::Amount;
use crate::types::{CheckoutRequest, NewProduct, ProductUpdate, SaleItemRequest};
use crate::{CoreError, MAX_NAME_LEN, MAX_PRODUCT_CODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens, underscores
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_product_code;
///
/// assert!(validate_product_code("ESP-1001").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("has space").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "productCode".to_string(),
        });
    }

    if code.chars().count() > MAX_PRODUCT_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "productCode".to_string(),
            max: MAX_PRODUCT_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "productCode".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity. Must be positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free items), negative is not.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_price;
///
/// assert!(validate_price(&"10.99".parse().unwrap()).is_ok());
/// assert!(validate_price(&"0".parse().unwrap()).is_ok());
/// assert!(validate_price(&"-1.00".parse().unwrap()).is_err());
/// ```
pub fn validate_price(price: &Amount) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates one cart line.
///
/// A line with neither reference is *not* a validation error: it is an
/// unresolvable line and is rejected, with an echo, during resolution.
pub fn validate_sale_item(item: &SaleItemRequest) -> ValidationResult<()> {
    validate_quantity(item.quantity)?;
    validate_price(&item.price)?;

    if item.name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a checkout request before any store access.
///
/// ## Rules
/// - At least one item
/// - Every item passes [`validate_sale_item`]
///
/// Header amounts are deliberately not checked against the lines; they
/// are recorded as the caller supplied them.
pub fn validate_checkout(request: &CheckoutRequest) -> Result<(), CoreError> {
    if request.items.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    for item in &request.items {
        validate_sale_item(item)?;
    }

    Ok(())
}

/// Validates a new product.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_code(&product.product_code)?;
    validate_product_name(&product.name)?;
    validate_price(&product.price)?;
    Ok(())
}

/// Validates the fields present in a product update.
pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    if let Some(code) = &update.product_code {
        validate_product_code(code)?;
    }
    if let Some(name) = &update.name {
        validate_product_name(name)?;
    }
    if let Some(price) = &update.price {
        validate_price(price)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, price: &str) -> SaleItemRequest {
        SaleItemRequest {
            product_id: None,
            product_code: Some("ESP-1001".to_string()),
            name: "Espresso".to_string(),
            quantity,
            price: price.parse().unwrap(),
        }
    }

    fn checkout(items: Vec<SaleItemRequest>) -> CheckoutRequest {
        CheckoutRequest {
            subtotal: "0".parse().unwrap(),
            tax: "0".parse().unwrap(),
            total_amount: "0".parse().unwrap(),
            items,
        }
    }

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("ESP-1001").is_ok());
        assert!(validate_product_code("product_1").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Espresso").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_checkout() {
        assert!(validate_checkout(&checkout(vec![item(2, "3.50")])).is_ok());
        assert!(matches!(
            validate_checkout(&checkout(vec![])),
            Err(CoreError::EmptyCart)
        ));
        assert!(matches!(
            validate_checkout(&checkout(vec![item(2, "3.50"), item(0, "1.00")])),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(validate_checkout(&checkout(vec![item(1, "-0.01")])).is_err());
    }

    #[test]
    fn test_item_without_references_is_not_a_validation_error() {
        let mut line = item(1, "1.00");
        line.product_code = None;
        assert!(validate_sale_item(&line).is_ok());
    }

    #[test]
    fn test_validate_new_product() {
        let product = NewProduct {
            product_code: "ESP-1001".to_string(),
            name: "Espresso".to_string(),
            price: "3.50".parse().unwrap(),
            stock_quantity: 10,
            image_url: None,
        };
        assert!(validate_new_product(&product).is_ok());

        let bad = NewProduct {
            product_code: "".to_string(),
            ..product
        };
        assert!(validate_new_product(&bad).is_err());
    }

    #[test]
    fn test_validate_product_update() {
        assert!(validate_product_update(&ProductUpdate::default()).is_ok());
        let update = ProductUpdate {
            price: Some("-2".parse().unwrap()),
            ..Default::default()
        };
        assert!(validate_product_update(&update).is_err());
    }
}
