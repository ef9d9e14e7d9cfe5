//! # Domain Types
//!
//! Core domain types used throughout the pricing pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    CartLine     │   │    TaxRate      │   │ PricedOrderSummary   │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  product_id     │   │  bps (u32)      │   │  subtotal            │  │
//! │  │  variant_id?    │   │  800 = 8%       │   │  discount            │  │
//! │  │  unit_price     │   └─────────────────┘   │  order_bumps         │  │
//! │  │  quantity       │                         │  shipping            │  │
//! │  │  subscription?  │                         │  tax                 │  │
//! │  └─────────────────┘                         │  credits_applied     │  │
//! │                                              │  total               │  │
//! │                                              └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Discount codes live in [`crate::discount`], order bumps in
//! [`crate::bumps`], founder tiers in [`crate::subscription`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000. A fractional rate such as `0.0825`
/// is exactly `825` bps, so tax stays in integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage, e.g. `8.25`.
    ///
    /// Negative or non-finite input yields `None`.
    pub fn from_percentage(pct: f64) -> Option<Self> {
        if !pct.is_finite() || pct < 0.0 {
            return None;
        }
        Some(TaxRate((pct * 100.0).round() as u32))
    }

    /// Creates a tax rate from a fraction, e.g. `0.0825`.
    ///
    /// ```rust
    /// use optibio_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_fraction(0.0825), Some(TaxRate::from_bps(825)));
    /// assert_eq!(TaxRate::from_fraction(0.08), Some(TaxRate::from_bps(800)));
    /// ```
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        Self::from_percentage(fraction * 100.0)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One entry in the cart, as handed to the calculator.
///
/// The unit price is the snapshot taken when the shopper added the item;
/// it is never re-fetched during pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Catalog product identifier.
    pub product_id: String,

    /// Catalog variant (60 / 120 / 180 capsules), when the product has one.
    #[serde(default)]
    pub variant_id: Option<String>,

    /// Per-unit price in cents at time of cart add.
    pub unit_price_cents: i64,

    /// Number of units, at least 1.
    pub quantity: i64,

    /// Billed recurrently rather than once.
    #[serde(default)]
    pub is_subscription: bool,
}

impl CartLine {
    /// Creates a one-time purchase line.
    pub fn new(product_id: impl Into<String>, unit_price_cents: i64, quantity: i64) -> Self {
        CartLine {
            product_id: product_id.into(),
            variant_id: None,
            unit_price_cents,
            quantity,
            is_subscription: false,
        }
    }

    /// Sets the variant.
    pub fn with_variant(mut self, variant_id: impl Into<String>) -> Self {
        self.variant_id = Some(variant_id.into());
        self
    }

    /// Marks the line as a subscription.
    pub fn subscription(mut self) -> Self {
        self.is_subscription = true;
        self
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total, `None` when `unit_price × quantity` overflows.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price().checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Priced Order Summary
// =============================================================================

/// The priced breakdown of an order.
///
/// Derived on demand from a cart snapshot; never persisted on its own.
/// Any cart mutation means it must be recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedOrderSummary {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    /// Sum of active order bump deltas. May be negative.
    pub order_bumps_cents: i64,
    pub shipping_cents: i64,
    pub tax_cents: i64,
    pub credits_applied_cents: i64,
    /// Amount to charge. Never negative.
    pub total_cents: i64,
}

impl PricedOrderSummary {
    /// Subtotal less discount: the amount the shipping rule and tax see.
    #[inline]
    pub fn subtotal_after_discount_cents(&self) -> i64 {
        self.subtotal_cents - self.discount_cents
    }

    /// Total before referral credits were applied.
    #[inline]
    pub fn pre_credits_total_cents(&self) -> i64 {
        self.total_cents + self.credits_applied_cents
    }

    #[inline]
    pub fn is_free_shipping(&self) -> bool {
        self.shipping_cents == 0
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
