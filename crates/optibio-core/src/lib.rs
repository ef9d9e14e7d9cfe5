//! # optibio-core: Pure Pricing Logic for the Optibio Storefront
//!
//! This crate prices orders. It contains no I/O and no async code: the
//! cart page and the checkout page both call [`pricing::calculate_order_total`]
//! with the same snapshot and get the same answer.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Optibio Storefront Pricing                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (cart page, checkout page)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 optibio-checkout                                │   │
//! │  │    Cart, StoreConfig, CheckoutService, SubscriptionService      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ optibio-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │  pricing  │  │   money   │  │ discount  │  │   bumps   │   │   │
//! │  │   │ calculate │  │   Money   │  │ Discount  │  │ OrderBump │   │   │
//! │  │   │ _order_   │  │  rounding │  │   Code    │  │ Selection │   │   │
//! │  │   │   total   │  │           │  │           │  │           │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - The order total calculator, shipping progress, installments
//! - [`money`] - Money type with integer round-half-up arithmetic
//! - [`discount`] - Discount codes
//! - [`bumps`] - Checkout order bumps
//! - [`subscription`] - Founder tiers, subscription price, status guards
//! - [`types`] - CartLine, TaxRate, PricedOrderSummary
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, bit for bit
//! 2. **Integer Money**: all monetary values are cents (i64), never floats
//! 3. **Fail Loudly**: malformed input is an error, never a silent zero
//!
//! ## Example Usage
//!
//! ```rust
//! use optibio_core::discount::DiscountCode;
//! use optibio_core::pricing::{calculate_order_total, OrderInput, PricingConfig};
//! use optibio_core::types::CartLine;
//!
//! let input = OrderInput::new(vec![CartLine::new("ashwagandha", 4999, 1)])
//!     .with_discount(DiscountCode::percentage("SAVE15", 15));
//!
//! let summary = calculate_order_total(&input, &PricingConfig::default()).unwrap();
//! assert_eq!(summary.discount_cents, 750);
//! assert_eq!(summary.total_cents, 5184);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bumps;
pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod subscription;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bumps::{OrderBump, OrderBumpPrices, OrderBumpSelection};
pub use discount::{DiscountCode, DiscountType};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{calculate_order_total, OrderInput, PricingConfig, TaxBase};
pub use subscription::{FounderTier, SubscriptionStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Post-discount subtotal at which shipping becomes free ($75.00).
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 7500;

/// Flat shipping charged below the free-shipping threshold ($5.95).
pub const STANDARD_SHIPPING_CENTS: i64 = 595;

/// Default sales tax, 8%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity on one cart line.
///
/// Catches accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
