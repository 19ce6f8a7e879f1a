//! # Validation Module
//!
//! Input validation for line items entering a cart.
//!
//! Invalid input is rejected at the call site (fail fast): a cart never
//! holds a blank title, a negative price, a zero quantity, or a line whose
//! amount does not fit in minor units. Percentages need no check here since
//! [`Percent`](crate::types::Percent) cannot hold a value above 100.
//!
//! ## Usage
//! ```rust
//! use vitrine_core::validation::{validate_price, validate_quantity, validate_title};
//!
//! assert!(validate_title("Nike Jordan Masc").is_ok());
//! assert!(validate_title("   ").is_err());
//! assert!(validate_price(400).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::config::CartLimits;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Item;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product title. Must not be empty or whitespace.
pub fn validate_title(title: &str) -> ValidationResult<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price in minor units.
///
/// Zero is allowed (free items).
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a line quantity. Must be positive.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Item Validators
// =============================================================================

/// Validates a whole line item against the cart limits.
///
/// ## Checks, in order
/// ```text
/// title blank?            → ValidationError::Required
/// price < 0?              → ValidationError::OutOfRange
/// quantity == 0?          → ValidationError::MustBePositive
/// quantity > max?         → CoreError::QuantityTooLarge
/// price × qty overflows?  → ValidationError::OutOfRange ("line amount")
/// ```
pub fn validate_item(item: &Item, limits: &CartLimits) -> CoreResult<()> {
    validate_title(&item.product.title)?;
    validate_price(item.product.price)?;
    validate_quantity(item.quantity)?;

    if item.quantity > limits.max_item_quantity {
        return Err(CoreError::QuantityTooLarge {
            requested: item.quantity,
            max: limits.max_item_quantity,
        });
    }

    if item.product.unit_price().multiply_quantity(item.quantity).is_none() {
        return Err(ValidationError::OutOfRange {
            field: "line amount".to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into());
    }

    Ok(())
}

/// Validates that `lines` with `incoming` in place of any line sharing its
/// title still has a subtotal that fits in minor units.
///
/// Discounts never exceed their line amount, so a subtotal that fits bounds
/// every total computed from the same lines.
pub fn validate_cart_total(lines: &[Item], incoming: &Item) -> CoreResult<()> {
    let subtotal = lines
        .iter()
        .filter(|line| line.product != incoming.product)
        .chain(std::iter::once(incoming))
        .try_fold(Money::zero(), |acc, line| {
            line.product
                .unit_price()
                .multiply_quantity(line.quantity)
                .and_then(|amount| acc.checked_add(amount))
        });

    if subtotal.is_none() {
        return Err(ValidationError::OutOfRange {
            field: "cart total".to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into());
    }

    Ok(())
}

/// Validates that a cart holding `current_items` distinct lines may take one more.
pub fn validate_cart_size(current_items: usize, limits: &CartLimits) -> CoreResult<()> {
    if current_items >= limits.max_items {
        return Err(CoreError::CartTooLarge {
            max: limits.max_items,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
