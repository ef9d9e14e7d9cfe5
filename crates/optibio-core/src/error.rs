//! # Error Types
//!
//! Domain-specific error types for optibio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  optibio-core errors (this file)                                        │
//! │  ├── CoreError        - Pricing failures (malformed input only)         │
//! │  └── ValidationError  - Field-level input failures                      │
//! │                                                                         │
//! │  optibio-checkout errors (separate crate)                               │
//! │  ├── CheckoutError    - Cart, provider, and reconciliation failures     │
//! │  └── ApiError         - What the storefront sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT Here
//! Expired discount codes, usage limits, and insufficient stock are
//! rejected by the upstream services before a value reaches the
//! calculator. The calculator only fails on malformed input, and it
//! never substitutes zero for a value it cannot price.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing errors.
///
/// Every variant is a programmer or integration error, not something to
/// show a shopper verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A field failed validation before any arithmetic ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Active order bumps discount more than the order is worth.
    ///
    /// ## When This Occurs
    /// ```text
    /// subtotal after discount:  $0.00  (100% code)
    /// "2nd bottle" bump:       -$10.00
    /// shipping + tax:           $5.95
    ///      │
    ///      ▼
    /// NegativeOrderTotal { pre_credits_total_cents: -405 }
    /// ```
    #[error("Order total before credits is negative ({pre_credits_total_cents} cents)")]
    NegativeOrderTotal { pre_credits_total_cents: i64 },

    /// Summing line totals overflowed i64 cents.
    #[error("Amount overflow while computing {stage}")]
    AmountOverflow { stage: &'static str },

    /// Installment plans need at least one payment.
    #[error("Installment count must be at least 1")]
    InvalidInstallmentCount,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        value: i64,
    },

    /// Value must be strictly positive.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: String, value: i64 },

    /// Value must be zero or greater.
    #[error("{field} must not be negative, got {value}")]
    MustNotBeNegative { field: String, value: i64 },

    /// Invalid format (e.g., bad discount code characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NegativeOrderTotal {
            pre_credits_total_cents: -405,
        };
        assert_eq!(
            err.to_string(),
            "Order total before credits is negative (-405 cents)"
        );

        let err = CoreError::AmountOverflow { stage: "subtotal" };
        assert_eq!(err.to_string(), "Amount overflow while computing subtotal");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "discount percentage".to_string(),
            min: 0,
            max: 100,
            value: 150,
        };
        assert_eq!(
            err.to_string(),
            "discount percentage must be between 0 and 100, got 150"
        );

        let err = ValidationError::MustNotBeNegative {
            field: "available credits".to_string(),
            value: -1,
        };
        assert_eq!(err.to_string(), "available credits must not be negative, got -1");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
