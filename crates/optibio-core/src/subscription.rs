//! # Subscription Pricing
//!
//! Founder tiers and recurring-price math for Subscribe & Save.
//!
//! ## Founder Tiers
//! ```text
//! cart subtotal      tier             lifetime discount
//! ─────────────      ─────────────    ─────────────────
//! ≥ $69.00       →   Founders         25%
//! ≥ $49.00       →   Early adopter    15%
//! ≥ $0.01        →   Pre-launch       10%
//! otherwise      →   Regular           0%
//! ```
//!
//! The subscription lifecycle itself (pause, resume, skip, cancel) is run
//! by the billing provider. [`SubscriptionStatus`] only mirrors what the
//! provider reports, plus the guards the storefront checks before asking.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{validate_percentage, ValidationResult};

// =============================================================================
// Founder Tier
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FounderTier {
    Founders,
    EarlyAdopter,
    PreLaunch,
    Regular,
}

impl FounderTier {
    /// Looks up the tier for a cart subtotal in cents.
    ///
    /// ```rust
    /// use optibio_core::subscription::FounderTier;
    ///
    /// assert_eq!(FounderTier::for_subtotal(6900), FounderTier::Founders);
    /// assert_eq!(FounderTier::for_subtotal(6899), FounderTier::EarlyAdopter);
    /// assert_eq!(FounderTier::for_subtotal(0), FounderTier::Regular);
    /// ```
    pub fn for_subtotal(subtotal_cents: i64) -> Self {
        match subtotal_cents {
            c if c >= 6900 => FounderTier::Founders,
            c if c >= 4900 => FounderTier::EarlyAdopter,
            c if c >= 1 => FounderTier::PreLaunch,
            _ => FounderTier::Regular,
        }
    }

    pub fn lifetime_discount_percent(&self) -> i64 {
        match self {
            FounderTier::Founders => 25,
            FounderTier::EarlyAdopter => 15,
            FounderTier::PreLaunch => 10,
            FounderTier::Regular => 0,
        }
    }
}

/// Recurring price after a percentage discount.
///
/// The discounted price itself is rounded half up
/// (`round(base × (100 − pct) / 100)`), which is what the billing
/// provider is sent.
///
/// ```rust
/// use optibio_core::subscription::subscription_price;
///
/// // $49.99 less 20% = $39.992 → $39.99
/// assert_eq!(subscription_price(4999, 20).unwrap().cents(), 3999);
/// ```
pub fn subscription_price(base_cents: i64, discount_percent: i64) -> ValidationResult<Money> {
    validate_percentage(discount_percent)?;
    Ok(Money::from_cents(base_cents).percentage(100 - discount_percent))
}

// =============================================================================
// Subscription Status
// =============================================================================

/// Status as reported by the billing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubscriptionStatus {
    Active,
    Paused,
    /// Cancels at the end of the current billing period.
    CancelPending,
    Cancelled,
}

impl SubscriptionStatus {
    /// Only active subscriptions can be paused.
    pub fn can_pause(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }

    /// Only paused subscriptions can be resumed.
    pub fn can_resume(&self) -> bool {
        matches!(self, SubscriptionStatus::Paused)
    }

    pub fn can_skip(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }

    pub fn can_cancel(&self) -> bool {
        !matches!(self, SubscriptionStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::CancelPending => "cancel_pending",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
