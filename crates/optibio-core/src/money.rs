//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    4999 * 0.15 = 749.8499999999999  → Math.round gives 750, but only   │
//! │    by luck of the representation                                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Integer Rounding                         │
//! │    4999 * 15 = 74985, (74985 + 50) / 100 = 750                          │
//! │    Same answer on the cart page and the checkout page, every time       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use optibio_core::money::Money;
//!
//! let price = Money::from_cents(4999); // $49.99
//!
//! let two_bottles = price * 2;                          // $99.98
//! let with_shipping = price + Money::from_cents(595);   // $55.94
//! assert_eq!(price.percentage(15).cents(), 750);        // 15% of $49.99
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Rounding
// =============================================================================

/// Divides `numerator` by a positive `denominator`, rounding half up.
///
/// "Half up" means toward positive infinity on a tie: `2.5 → 3` and
/// `-2.5 → -2`, the same result `Math.round` gives in the storefront
/// frontend. Truncation and round-half-even are never used for money.
///
/// ```rust
/// use optibio_core::money::div_round_half_up;
///
/// assert_eq!(div_round_half_up(74985, 100), 750);   // 749.85
/// assert_eq!(div_round_half_up(250, 100), 3);       // 2.5
/// assert_eq!(div_round_half_up(-250, 100), -2);     // -2.5
/// assert_eq!(div_round_half_up(3999200, 10000), 400);
/// ```
#[inline]
pub const fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    // floor(n / d + 1/2) == floor((2n + d) / 2d) for d > 0
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in US cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: order bumps can carry negative deltas
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Percentages and rates go through i128**: no overflow mid-calculation
///
/// ## Where Money Flows
/// ```text
/// CartLine.unit_price ──► subtotal ──► discount ──► tax ──► total
///                                          │
///                         order bumps ─────┤
///                         shipping ────────┤
///                         referral credits ┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use optibio_core::money::Money;
    ///
    /// let price = Money::from_cents(4999);
    /// assert_eq!(price.cents(), 4999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion (truncated toward zero).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub const fn min(self, other: Money) -> Money {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Returns the larger of two amounts.
    #[inline]
    pub const fn max(self, other: Money) -> Money {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Computes `pct`% of this amount, rounded half up to the cent.
    ///
    /// Used for percentage discount codes and subscription discounts.
    ///
    /// ```rust
    /// use optibio_core::money::Money;
    ///
    /// // 15% of $49.99 = $7.4985 → $7.50
    /// assert_eq!(Money::from_cents(4999).percentage(15).cents(), 750);
    /// // 20% of $49.99 = $9.998 → $10.00
    /// assert_eq!(Money::from_cents(4999).percentage(20).cents(), 1000);
    /// ```
    pub fn percentage(&self, pct: i64) -> Money {
        let cents = div_round_half_up(self.0 as i128 * pct as i128, 100);
        Money::from_cents(cents as i64)
    }

    /// Applies a basis-point rate (tax) to this amount, rounded half up.
    ///
    /// ```rust
    /// use optibio_core::money::Money;
    /// use optibio_core::types::TaxRate;
    ///
    /// // $49.99 × 8% = $3.9992 → $4.00
    /// let tax = Money::from_cents(4999).apply_rate(TaxRate::from_bps(800));
    /// assert_eq!(tax.cents(), 400);
    /// ```
    pub fn apply_rate(&self, rate: TaxRate) -> Money {
        let cents = div_round_half_up(self.0 as i128 * rate.bps() as i128, 10_000);
        Money::from_cents(cents as i64)
    }

    /// Splits this amount into `count` equal payments, rounded half up.
    ///
    /// Returns `None` when `count` is zero.
    pub fn split(&self, count: u32) -> Option<Money> {
        if count == 0 {
            return None;
        }
        let cents = div_round_half_up(self.0 as i128, count as i128);
        Some(Money::from_cents(cents as i64))
    }

    /// Line total for a unit price and quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Addition that reports overflow instead of wrapping.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display, e.g. `$49.99` or `-$10.00`.
///
/// Storefront pages format through their own locale-aware helpers.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
