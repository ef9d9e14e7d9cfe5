//! # Order Bumps
//!
//! Optional add-ons offered on the checkout page, each toggled on its own.
//!
//! | Bump                 | Default delta | Kind                       |
//! |----------------------|---------------|----------------------------|
//! | Shipping protection  | +$2.95        | surcharge                  |
//! | Priority processing  | +$4.95        | surcharge                  |
//! | Add a 2nd bottle     | -$10.00       | per-unit discount          |
//!
//! The sum of active deltas is not floored at zero: the 2nd-bottle offer
//! legitimately lowers the payable amount.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{validate_order_bump_cents, ValidationResult};

/// One of the checkout add-ons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderBump {
    ShippingProtection,
    PriorityProcessing,
    SecondBottle,
}

impl OrderBump {
    /// Every bump, in the order the checkout page lists them.
    pub const ALL: [OrderBump; 3] = [
        OrderBump::ShippingProtection,
        OrderBump::PriorityProcessing,
        OrderBump::SecondBottle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrderBump::ShippingProtection => "Shipping protection",
            OrderBump::PriorityProcessing => "Priority processing",
            OrderBump::SecondBottle => "Add a 2nd bottle",
        }
    }
}

/// Price deltas for each bump, in cents. Configuration, not per-call input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderBumpPrices {
    pub shipping_protection_cents: i64,
    pub priority_processing_cents: i64,
    pub second_bottle_cents: i64,
}

impl Default for OrderBumpPrices {
    fn default() -> Self {
        OrderBumpPrices {
            shipping_protection_cents: 295,
            priority_processing_cents: 495,
            second_bottle_cents: -1000,
        }
    }
}

impl OrderBumpPrices {
    /// Every delta must be within ±[`crate::validation::MAX_ORDER_BUMP_CENTS`].
    pub fn validate(&self) -> ValidationResult<()> {
        OrderBump::ALL
            .into_iter()
            .try_for_each(|bump| validate_order_bump_cents(self.delta(bump).cents()))
    }

    pub fn delta(&self, bump: OrderBump) -> Money {
        let cents = match bump {
            OrderBump::ShippingProtection => self.shipping_protection_cents,
            OrderBump::PriorityProcessing => self.priority_processing_cents,
            OrderBump::SecondBottle => self.second_bottle_cents,
        };
        Money::from_cents(cents)
    }
}

/// The shopper's bump toggles. All off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct OrderBumpSelection {
    pub shipping_protection: bool,
    pub priority_processing: bool,
    pub second_bottle: bool,
}

impl OrderBumpSelection {
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns a copy with `bump` switched on.
    pub fn with(mut self, bump: OrderBump) -> Self {
        self.set(bump, true);
        self
    }

    pub fn set(&mut self, bump: OrderBump, active: bool) {
        match bump {
            OrderBump::ShippingProtection => self.shipping_protection = active,
            OrderBump::PriorityProcessing => self.priority_processing = active,
            OrderBump::SecondBottle => self.second_bottle = active,
        }
    }

    pub fn is_active(&self, bump: OrderBump) -> bool {
        match bump {
            OrderBump::ShippingProtection => self.shipping_protection,
            OrderBump::PriorityProcessing => self.priority_processing,
            OrderBump::SecondBottle => self.second_bottle,
        }
    }

    pub fn active(&self) -> impl Iterator<Item = OrderBump> + '_ {
        OrderBump::ALL.into_iter().filter(|b| self.is_active(*b))
    }

    /// Sum of active deltas. May be negative; `None` on overflow.
    pub fn total(&self, prices: &OrderBumpPrices) -> Option<Money> {
        self.active()
            .try_fold(Money::zero(), |acc, b| acc.checked_add(prices.delta(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_bumps_is_zero() {
        let prices = OrderBumpPrices::default();
        assert_eq!(OrderBumpSelection::none().total(&prices), Some(Money::zero()));
        assert_eq!(OrderBumpSelection::none().active().count(), 0);
    }

    #[test]
    fn test_any_subset_sums() {
        let prices = OrderBumpPrices::default();
        let selection = OrderBumpSelection::none()
            .with(OrderBump::ShippingProtection)
            .with(OrderBump::PriorityProcessing);
        assert_eq!(selection.total(&prices).unwrap().cents(), 790);

        let all = selection.with(OrderBump::SecondBottle);
        assert_eq!(all.total(&prices).unwrap().cents(), -210);
    }

    #[test]
    fn test_negative_sum_is_not_floored() {
        let prices = OrderBumpPrices::default();
        let selection = OrderBumpSelection::none().with(OrderBump::SecondBottle);
        assert_eq!(selection.total(&prices).unwrap().cents(), -1000);
    }

    #[test]
    fn test_overflowing_sum_is_none() {
        let prices = OrderBumpPrices {
            shipping_protection_cents: i64::MAX,
            priority_processing_cents: 1,
            second_bottle_cents: 0,
        };
        let selection = OrderBumpSelection::none()
            .with(OrderBump::ShippingProtection)
            .with(OrderBump::PriorityProcessing);
        assert_eq!(selection.total(&prices), None);
    }

    #[test]
    fn test_price_bounds() {
        assert!(OrderBumpPrices::default().validate().is_ok());

        let prices = OrderBumpPrices {
            shipping_protection_cents: i64::MAX,
            ..Default::default()
        };
        assert!(prices.validate().is_err());

        let prices = OrderBumpPrices {
            second_bottle_cents: -100_001,
            ..Default::default()
        };
        assert!(prices.validate().is_err());
    }

    #[test]
    fn test_set_and_is_active() {
        let mut selection = OrderBumpSelection::none();
        selection.set(OrderBump::SecondBottle, true);
        assert!(selection.is_active(OrderBump::SecondBottle));
        selection.set(OrderBump::SecondBottle, false);
        assert!(!selection.is_active(OrderBump::SecondBottle));
    }

    #[test]
    fn test_missing_flags_default_off() {
        let selection: OrderBumpSelection =
            serde_json::from_str(r#"{"priorityProcessing":true}"#).unwrap();
        assert!(selection.priority_processing);
        assert!(!selection.shipping_protection);
        assert!(!selection.second_bottle);
    }
}
