//! # Discount Codes
//!
//! A discount code reaches the calculator already validated by the
//! discount service (active, not expired, under its usage limit). This
//! module only knows how to turn a code into an amount off a subtotal.
//!
//! ```text
//!   percentage   → round_half_up(subtotal × value / 100)
//!   fixed_amount → min(value, subtotal)
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    normalize_discount_code, validate_discount_code, validate_fixed_discount_cents,
    validate_percentage, ValidationResult,
};

/// How a discount code's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiscountType {
    /// `value` is a whole percentage, 0-100.
    Percentage,
    /// `value` is a number of cents.
    FixedAmount,
}

/// A pre-validated promotional code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountCode {
    /// Uppercase code, e.g. `SAVE15`. Normalized on construction and on
    /// deserialization.
    #[serde(deserialize_with = "normalized_code")]
    pub code: String,

    pub discount_type: DiscountType,

    /// Percent (0-100) or cents, depending on `discount_type`.
    pub value: i64,

    /// Minimum purchase the discount service enforced, kept for display.
    #[serde(default)]
    pub min_purchase_cents: Option<i64>,
}

impl DiscountCode {
    /// Creates a code, normalizing it to uppercase.
    pub fn new(code: &str, discount_type: DiscountType, value: i64) -> Self {
        DiscountCode {
            code: normalize_discount_code(code),
            discount_type,
            value,
            min_purchase_cents: None,
        }
    }

    pub fn percentage(code: &str, pct: i64) -> Self {
        Self::new(code, DiscountType::Percentage, pct)
    }

    pub fn fixed_amount(code: &str, cents: i64) -> Self {
        Self::new(code, DiscountType::FixedAmount, cents)
    }

    /// Checks the code string and that `value` is in range for the
    /// discount type.
    ///
    /// The calculator calls this before pricing; a 150% code is rejected,
    /// never clamped down to 100%.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_discount_code(&self.code)?;

        match self.discount_type {
            DiscountType::Percentage => validate_percentage(self.value),
            DiscountType::FixedAmount => validate_fixed_discount_cents(self.value),
        }
    }

    /// Amount this code takes off `subtotal`.
    ///
    /// A fixed-amount code never discounts below zero.
    ///
    /// ```rust
    /// use optibio_core::discount::DiscountCode;
    /// use optibio_core::money::Money;
    ///
    /// let code = DiscountCode::percentage("save15", 15);
    /// assert_eq!(code.amount_for(Money::from_cents(4999)).unwrap().cents(), 750);
    ///
    /// let code = DiscountCode::fixed_amount("TENOFF", 1000);
    /// assert_eq!(code.amount_for(Money::from_cents(600)).unwrap().cents(), 600);
    /// ```
    pub fn amount_for(&self, subtotal: Money) -> Result<Money, ValidationError> {
        self.validate()?;

        let amount = match self.discount_type {
            DiscountType::Percentage => subtotal.percentage(self.value),
            DiscountType::FixedAmount => Money::from_cents(self.value).min(subtotal),
        };

        Ok(amount)
    }

    /// Short label shown next to the applied code, e.g. `15% off`.
    pub fn label(&self) -> String {
        match self.discount_type {
            DiscountType::Percentage => format!("{}% off", self.value),
            DiscountType::FixedAmount => format!("{} off", Money::from_cents(self.value)),
        }
    }
}

fn normalized_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_discount_code(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_normalized() {
        let code = DiscountCode::percentage("  welcome10 ", 10);
        assert_eq!(code.code, "WELCOME10");
    }

    #[test]
    fn test_percentage_amount() {
        let code = DiscountCode::percentage("SAVE15", 15);
        assert_eq!(code.amount_for(Money::from_cents(4999)), Ok(Money::from_cents(750)));
        assert_eq!(code.amount_for(Money::zero()), Ok(Money::zero()));
    }

    #[test]
    fn test_fixed_amount_clamps_to_subtotal() {
        let code = DiscountCode::fixed_amount("TENOFF", 1000);
        assert_eq!(code.amount_for(Money::from_cents(8000)), Ok(Money::from_cents(1000)));
        assert_eq!(code.amount_for(Money::from_cents(999)), Ok(Money::from_cents(999)));
    }

    #[test]
    fn test_out_of_range_percentage_is_rejected() {
        let code = DiscountCode::percentage("BROKEN", 101);
        assert!(code.amount_for(Money::from_cents(1000)).is_err());

        let code = DiscountCode::percentage("BROKEN", -5);
        assert!(code.validate().is_err());
    }

    #[test]
    fn test_malformed_code_is_rejected() {
        assert!(DiscountCode::percentage("", 15).validate().is_err());
        assert!(DiscountCode::percentage("   ", 15).validate().is_err());
        assert!(DiscountCode::percentage("SAVE 15", 15).validate().is_err());
        assert!(DiscountCode::fixed_amount("", 1000)
            .amount_for(Money::from_cents(5000))
            .is_err());
    }

    #[test]
    fn test_deserialized_code_is_normalized() {
        let code: DiscountCode = serde_json::from_str(
            r#"{"code":" save15 ","discountType":"percentage","value":15}"#,
        )
        .unwrap();
        assert_eq!(code.code, "SAVE15");
        assert!(code.validate().is_ok());
    }

    #[test]
    fn test_negative_fixed_amount_is_rejected() {
        let code = DiscountCode::fixed_amount("BROKEN", -100);
        assert!(code.amount_for(Money::from_cents(1000)).is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(DiscountCode::percentage("SAVE15", 15).label(), "15% off");
        assert_eq!(DiscountCode::fixed_amount("TENOFF", 1000).label(), "$10.00 off");
    }

    #[test]
    fn test_discount_type_serializes_snake_case() {
        let json = serde_json::to_string(&DiscountType::FixedAmount).unwrap();
        assert_eq!(json, "\"fixed_amount\"");

        let code: DiscountCode = serde_json::from_str(
            r#"{"code":"SAVE15","discountType":"percentage","value":15}"#,
        )
        .unwrap();
        assert_eq!(code.discount_type, DiscountType::Percentage);
        assert_eq!(code.min_purchase_cents, None);
    }
}
