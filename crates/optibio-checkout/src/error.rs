//! # Checkout Error Types
//!
//! Errors raised around the pricing core, and the serializable [`ApiError`]
//! the storefront receives.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Checkout                               │
//! │                                                                         │
//! │  Storefront                  Rust Backend                               │
//! │  ──────────                  ────────────                               │
//! │                                                                         │
//! │  POST /checkout                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  CheckoutService::submit                                         │  │
//! │  │  Result<T, CheckoutError>                                        │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Malformed input? ─── CoreError::Validation ───────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Provider disagrees? ── ChargeMismatch ───────── ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "PAYMENT_ERROR", "message": "Payment could not be ..." }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use optibio_core::{CoreError, SubscriptionStatus};
use serde::Serialize;
use thiserror::Error;

use crate::cart::CartError;
use crate::config::ConfigError;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// A failure reported by an external provider (payment or billing).
///
/// Providers are opaque: all we keep is their message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        ProviderError(message.into())
    }
}

/// Errors from cart preview, charge construction, and provider calls.
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Cart(#[from] CartError),

    /// The calculator rejected the input.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A subscription must be the only line in its cart.
    #[error("A subscription must be checked out on its own (cart has {subscription_lines} subscription and {one_time_lines} one-time lines)")]
    MixedCart {
        subscription_lines: usize,
        one_time_lines: usize,
    },

    // =========================================================================
    // Provider Errors
    // =========================================================================
    /// The provider would charge something other than what we priced.
    ///
    /// Never reconciled: the order is abandoned.
    #[error("Charge mismatch for order {order_reference}: priced {expected_cents}, provider reported {charged_cents}")]
    ChargeMismatch {
        order_reference: String,
        expected_cents: i64,
        charged_cents: i64,
    },

    #[error("Payment provider error: {0}")]
    Gateway(#[source] ProviderError),

    // =========================================================================
    // Subscription Errors
    // =========================================================================
    /// The requested action is not allowed from the current status.
    #[error("Cannot {action} a subscription that is {status}")]
    SubscriptionState {
        action: &'static str,
        status: SubscriptionStatus,
    },

    #[error("Billing provider error: {0}")]
    Billing(#[source] ProviderError),
}

// =============================================================================
// API Error
// =============================================================================

/// Error returned to the storefront.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "discount percentage must be between 0 and 100, got 150"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Business rule refused the request (422)
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Payment provider failed or disagreed on the amount
    PaymentError,

    /// Billing provider failed
    SubscriptionError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::NegativeOrderTotal { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::InvalidInstallmentCount => ApiError::validation(err.to_string()),
            CoreError::AmountOverflow { stage } => {
                tracing::error!(stage, "Amount overflow while pricing order");
                ApiError::internal("Order amount is too large to process")
            }
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::NotInCart { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CartError::Validation(e) => ApiError::validation(e.to_string()),
            other => ApiError::cart(other.to_string()),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => ApiError::cart("Cart is empty"),
            CheckoutError::Cart(e) => e.into(),
            CheckoutError::Core(e) => e.into(),
            CheckoutError::MixedCart { .. } => ApiError::cart(err.to_string()),
            // Logged with its amounts by `CheckoutService::submit`
            CheckoutError::ChargeMismatch { .. } => {
                ApiError::new(
                    ErrorCode::PaymentError,
                    "Payment could not be started. Please try again.",
                )
            }
            CheckoutError::Gateway(e) => {
                tracing::error!("Payment provider error: {}", e);
                ApiError::new(ErrorCode::PaymentError, "Payment provider unavailable")
            }
            CheckoutError::SubscriptionState { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CheckoutError::Billing(e) => {
                tracing::error!("Billing provider error: {}", e);
                ApiError::new(ErrorCode::SubscriptionError, "Billing provider unavailable")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use optibio_core::ValidationError;

    #[test]
    fn test_validation_maps_to_validation_code() {
        let err = CoreError::Validation(ValidationError::OutOfRange {
            field: "discount percentage".to_string(),
            min: 0,
            max: 100,
            value: 150,
        });
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(
            api.message,
            "discount percentage must be between 0 and 100, got 150"
        );
    }

    #[test]
    fn test_charge_mismatch_hides_details() {
        let api: ApiError = CheckoutError::ChargeMismatch {
            order_reference: "abc".to_string(),
            expected_cents: 5994,
            charged_cents: 5995,
        }
        .into();
        assert_eq!(api.code, ErrorCode::PaymentError);
        assert!(!api.message.contains("5995"));
    }

    #[test]
    fn test_mixed_cart_is_a_cart_error() {
        let api: ApiError = CheckoutError::MixedCart {
            subscription_lines: 1,
            one_time_lines: 3,
        }
        .into();
        assert_eq!(api.code, ErrorCode::CartError);
        assert!(api.message.contains("3 one-time lines"));
    }

    #[test]
    fn test_subscription_state_message() {
        let err = CheckoutError::SubscriptionState {
            action: "pause",
            status: SubscriptionStatus::Paused,
        };
        assert_eq!(err.to_string(), "Cannot pause a subscription that is paused");
    }

    #[test]
    fn test_api_error_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::cart("Cart is empty")).unwrap();
        assert_eq!(json["code"], "CART_ERROR");
        assert_eq!(json["message"], "Cart is empty");
    }
}
