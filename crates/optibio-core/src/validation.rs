//! # Validation Module
//!
//! Input validation for everything that reaches the calculator.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Upstream services                                             │
//! │  ├── Discount code lifecycle (active / expired / usage limit)           │
//! │  └── Stock levels, referral balance ownership                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront API boundary                                       │
//! │  └── Untyped payloads deserialized into CartLine / DiscountCode         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE (called by the calculator first thing)            │
//! │  ├── Quantities, prices, credits non-negative                           │
//! │  └── Percentage discounts within 0..=100                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use optibio_core::validation::{validate_percentage, validate_quantity};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_percentage(150).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a discount code.
pub const MAX_DISCOUNT_CODE_LEN: usize = 32;

/// Largest order bump delta in either direction ($1,000).
pub const MAX_ORDER_BUMP_CENTS: i64 = 100_000;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
            value: qty,
        });
    }

    Ok(())
}

/// Validates a quantity against the per-line cart limit.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999), which catches a typed
///   "1000" meant as "10"
pub fn validate_quantity_limit(qty: i64) -> ValidationResult<()> {
    validate_quantity(qty)?;

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
            value: qty,
        });
    }

    Ok(())
}

/// Validates a unit price in cents. Zero is allowed (free samples).
///
/// ```rust
/// use optibio_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(4999).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit price".to_string(),
            value: cents,
        });
    }

    Ok(())
}

/// Validates a percentage discount value.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
/// - Out-of-range values are rejected, never clamped
pub fn validate_percentage(pct: i64) -> ValidationResult<()> {
    if !(0..=100).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discount percentage".to_string(),
            min: 0,
            max: 100,
            value: pct,
        });
    }

    Ok(())
}

/// Validates a fixed-amount discount value in cents.
pub fn validate_fixed_discount_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount amount".to_string(),
            value: cents,
        });
    }

    Ok(())
}

/// Validates a referral credit balance in cents.
pub fn validate_credits_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "available credits".to_string(),
            value: cents,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10_000,
            value: bps as i64,
        });
    }

    Ok(())
}

/// Validates a configured order bump delta.
///
/// ## Rules
/// - Between -MAX_ORDER_BUMP_CENTS and MAX_ORDER_BUMP_CENTS inclusive
/// - Negative deltas are allowed (the 2nd-bottle offer)
pub fn validate_order_bump_cents(cents: i64) -> ValidationResult<()> {
    if !(-MAX_ORDER_BUMP_CENTS..=MAX_ORDER_BUMP_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "order bump".to_string(),
            min: -MAX_ORDER_BUMP_CENTS,
            max: MAX_ORDER_BUMP_CENTS,
            value: cents,
        });
    }

    Ok(())
}

// =============================================================================
// Discount Code Validators
// =============================================================================

/// Trims and uppercases a discount code the way the storefront stores it.
///
/// ```rust
/// use optibio_core::validation::normalize_discount_code;
///
/// assert_eq!(normalize_discount_code("  save15 "), "SAVE15");
/// ```
pub fn normalize_discount_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validates a discount code string.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 32 characters
/// - Letters, digits, hyphens, underscores only
pub fn validate_discount_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "discount code".to_string(),
        });
    }

    if code.len() > MAX_DISCOUNT_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "discount code".to_string(),
            max: MAX_DISCOUNT_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "discount code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in the cart.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
            value: current_items as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());

        assert!(validate_quantity_limit(999).is_ok());
        assert!(validate_quantity_limit(1000).is_err());
        assert!(validate_quantity_limit(0).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(4999).is_ok());
        assert_eq!(
            validate_price_cents(-1),
            Err(ValidationError::MustNotBeNegative {
                field: "unit price".to_string(),
                value: -1,
            })
        );
    }

    #[test]
    fn test_validate_percentage_bounds() {
        assert!(validate_percentage(0).is_ok());
        assert!(validate_percentage(100).is_ok());
        assert!(validate_percentage(-1).is_err());
        assert!(validate_percentage(101).is_err());
    }

    #[test]
    fn test_validate_credits_and_fixed() {
        assert!(validate_credits_cents(0).is_ok());
        assert!(validate_credits_cents(-5).is_err());
        assert!(validate_fixed_discount_cents(1000).is_ok());
        assert!(validate_fixed_discount_cents(-1000).is_err());
    }

    #[test]
    fn test_validate_discount_code() {
        assert!(validate_discount_code("SAVE15").is_ok());
        assert!(validate_discount_code("WELCOME_10").is_ok());
        assert!(validate_discount_code("").is_err());
        assert!(validate_discount_code("   ").is_err());
        assert!(validate_discount_code("SAVE 15").is_err());
        assert!(validate_discount_code(&"A".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(825).is_ok());
        assert!(validate_tax_rate_bps(10_000).is_ok());
        assert!(validate_tax_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_order_bump_cents() {
        assert!(validate_order_bump_cents(295).is_ok());
        assert!(validate_order_bump_cents(-1000).is_ok());
        assert!(validate_order_bump_cents(MAX_ORDER_BUMP_CENTS).is_ok());
        assert!(validate_order_bump_cents(-MAX_ORDER_BUMP_CENTS - 1).is_err());
        assert!(validate_order_bump_cents(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }
}
