//! # Order Total Calculator
//!
//! The single function the cart page (preview) and the checkout page
//! (final charge) both price through.
//!
//! ## Computation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0. validate every input ─────────────── malformed? → Err, no arithmetic│
//! │  1. subtotal            = Σ unit_price × quantity                       │
//! │  2. discount            = percentage: round(subtotal × v / 100)         │
//! │                           fixed:      min(v, subtotal)                  │
//! │  3. after_discount      = subtotal − discount                           │
//! │  4. order_bumps         = Σ active deltas (may be negative)             │
//! │  5. shipping            = after_discount ≥ threshold ? 0 : standard     │
//! │  6. tax                 = round(tax_base × rate)                        │
//! │  7. pre_credits         = after_discount + bumps + shipping + tax       │
//! │  8. credits_applied     = apply ? min(available, pre_credits) : 0       │
//! │  9. total               = pre_credits − credits_applied                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rounding step is round-half-up on integers
//! ([`crate::money::div_round_half_up`]). The order above must not change:
//! the free-shipping check and tax both see the post-discount subtotal.
//!
//! ## Example
//! ```rust
//! use optibio_core::pricing::{calculate_order_total, OrderInput, PricingConfig};
//! use optibio_core::types::CartLine;
//!
//! let input = OrderInput::new(vec![CartLine::new("ashwagandha", 4999, 1)]);
//! let summary = calculate_order_total(&input, &PricingConfig::default()).unwrap();
//!
//! assert_eq!(summary.shipping_cents, 595);
//! assert_eq!(summary.tax_cents, 400);
//! assert_eq!(summary.total_cents, 5994);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bumps::{OrderBumpPrices, OrderBumpSelection};
use crate::discount::DiscountCode;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLine, PricedOrderSummary, TaxRate};
use crate::validation::{
    validate_credits_cents, validate_price_cents, validate_quantity, validate_tax_rate_bps,
};
use crate::{FREE_SHIPPING_THRESHOLD_CENTS, STANDARD_SHIPPING_CENTS};

// =============================================================================
// Configuration
// =============================================================================

/// What the tax rate is applied to.
///
/// Whether order bumps are taxable is a business policy decision; keeping
/// it here means changing it touches exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// Subtotal after discount. Shipping and bumps are not taxed.
    #[default]
    DiscountedSubtotal,
    /// Subtotal after discount plus order bumps, floored at zero.
    DiscountedSubtotalWithBumps,
}

/// Store-wide pricing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    /// Post-discount subtotal at which shipping becomes free.
    pub shipping_threshold_cents: i64,
    pub standard_shipping_cents: i64,
    pub tax_rate: TaxRate,
    pub tax_base: TaxBase,
    pub order_bump_prices: OrderBumpPrices,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            shipping_threshold_cents: FREE_SHIPPING_THRESHOLD_CENTS,
            standard_shipping_cents: STANDARD_SHIPPING_CENTS,
            tax_rate: TaxRate::default(),
            tax_base: TaxBase::default(),
            order_bump_prices: OrderBumpPrices::default(),
        }
    }
}

impl PricingConfig {
    /// Checks the constants themselves.
    pub fn validate(&self) -> CoreResult<()> {
        validate_tax_rate_bps(self.tax_rate.bps())?;
        validate_price_cents(self.standard_shipping_cents)?;
        validate_price_cents(self.shipping_threshold_cents)?;
        self.order_bump_prices.validate()?;
        Ok(())
    }

    /// Shipping charged on a post-discount subtotal.
    pub fn shipping_for(&self, subtotal_after_discount: Money) -> Money {
        if subtotal_after_discount.cents() >= self.shipping_threshold_cents {
            Money::zero()
        } else {
            Money::from_cents(self.standard_shipping_cents)
        }
    }
}

// =============================================================================
// Input
// =============================================================================

/// Everything one pricing call needs besides the store constants.
///
/// A caller-owned snapshot: the calculator never reads cart state itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub discount: Option<DiscountCode>,
    #[serde(default)]
    pub order_bumps: OrderBumpSelection,
    #[serde(default)]
    pub available_credits_cents: i64,
    #[serde(default)]
    pub apply_credits: bool,
}

impl OrderInput {
    pub fn new(lines: Vec<CartLine>) -> Self {
        OrderInput {
            lines,
            ..Default::default()
        }
    }

    pub fn with_discount(mut self, discount: DiscountCode) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn with_order_bumps(mut self, order_bumps: OrderBumpSelection) -> Self {
        self.order_bumps = order_bumps;
        self
    }

    /// Offers `available_cents` of referral credit and applies it.
    pub fn with_credits(mut self, available_cents: i64) -> Self {
        self.available_credits_cents = available_cents;
        self.apply_credits = true;
        self
    }

    /// Rejects malformed input before any arithmetic runs.
    pub fn validate(&self) -> CoreResult<()> {
        for line in &self.lines {
            validate_quantity(line.quantity)?;
            validate_price_cents(line.unit_price_cents)?;
        }

        if let Some(discount) = &self.discount {
            discount.validate()?;
        }

        validate_credits_cents(self.available_credits_cents)?;

        Ok(())
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Prices an order.
///
/// Pure and deterministic: no clock, no I/O, no shared state. Fails only
/// on malformed input, never on business rules (those are enforced
/// upstream before a discount or credit balance gets here).
///
/// ## Errors
/// - [`CoreError::Validation`]: negative price, quantity below 1,
///   percentage outside 0-100, negative fixed discount, malformed code,
///   negative credits, or an invalid tax rate or bump price in `config`
/// - [`CoreError::NegativeOrderTotal`]: active bumps exceed the order
/// - [`CoreError::AmountOverflow`]: any sum overflows i64 cents
pub fn calculate_order_total(
    input: &OrderInput,
    config: &PricingConfig,
) -> CoreResult<PricedOrderSummary> {
    config.validate()?;
    input.validate()?;

    // 1. subtotal
    let subtotal = subtotal(&input.lines)?;

    // 2-3. discount
    let discount = match &input.discount {
        Some(code) => code.amount_for(subtotal)?,
        None => Money::zero(),
    };
    let after_discount = subtotal - discount;

    // 4. bumps
    let order_bumps = input
        .order_bumps
        .total(&config.order_bump_prices)
        .ok_or(CoreError::AmountOverflow {
            stage: "order bumps",
        })?;

    // 5. shipping, on the post-discount subtotal
    let shipping = config.shipping_for(after_discount);

    // 6. tax
    let tax_base = match config.tax_base {
        TaxBase::DiscountedSubtotal => after_discount,
        TaxBase::DiscountedSubtotalWithBumps => after_discount
            .checked_add(order_bumps)
            .ok_or(CoreError::AmountOverflow { stage: "tax base" })?
            .max(Money::zero()),
    };
    let tax = tax_base.apply_rate(config.tax_rate);

    // 7. pre-credits total
    let pre_credits = [after_discount, order_bumps, shipping, tax]
        .into_iter()
        .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
        .ok_or(CoreError::AmountOverflow {
            stage: "order total",
        })?;

    if pre_credits.is_negative() {
        return Err(CoreError::NegativeOrderTotal {
            pre_credits_total_cents: pre_credits.cents(),
        });
    }

    // 8-9. credits, capped so the total never goes negative
    let credits_applied = if input.apply_credits {
        Money::from_cents(input.available_credits_cents).min(pre_credits)
    } else {
        Money::zero()
    };
    let total = pre_credits - credits_applied;

    Ok(PricedOrderSummary {
        subtotal_cents: subtotal.cents(),
        discount_cents: discount.cents(),
        order_bumps_cents: order_bumps.cents(),
        shipping_cents: shipping.cents(),
        tax_cents: tax.cents(),
        credits_applied_cents: credits_applied.cents(),
        total_cents: total.cents(),
    })
}

/// Σ unit price × quantity, reporting overflow.
fn subtotal(lines: &[CartLine]) -> CoreResult<Money> {
    lines
        .iter()
        .try_fold(Money::zero(), |acc, line| {
            line.line_total().and_then(|total| acc.checked_add(total))
        })
        .ok_or(CoreError::AmountOverflow { stage: "subtotal" })
}

// =============================================================================
// Free Shipping Progress
// =============================================================================

/// The cart page's "add $X more for free shipping" bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FreeShippingProgress {
    /// Cents still needed; 0 once free shipping is unlocked.
    pub amount_remaining_cents: i64,
    /// 0-100, truncated.
    pub percent_complete: u8,
    pub unlocked: bool,
}

/// Progress toward free shipping for a post-discount subtotal.
///
/// Measured on the same amount the shipping rule uses, so the bar and the
/// shipping line never contradict each other.
pub fn free_shipping_progress(
    subtotal_after_discount_cents: i64,
    config: &PricingConfig,
) -> FreeShippingProgress {
    let threshold = config.shipping_threshold_cents;
    let amount = subtotal_after_discount_cents.max(0);

    if threshold <= 0 || amount >= threshold {
        return FreeShippingProgress {
            amount_remaining_cents: 0,
            percent_complete: 100,
            unlocked: true,
        };
    }

    let percent = (amount as i128 * 100 / threshold as i128) as u8;

    FreeShippingProgress {
        amount_remaining_cents: threshold - amount,
        percent_complete: percent,
        unlocked: false,
    }
}

// =============================================================================
// Installments
// =============================================================================

/// Per-payment amount for "or 4 payments of $X".
pub fn installment_amount(total_cents: i64, count: u32) -> CoreResult<Money> {
    Money::from_cents(total_cents)
        .split(count)
        .ok_or(CoreError::InvalidInstallmentCount)
}

// =============================================================================
// Unit Tests
// =============================================================================
