//! # Store Configuration
//!
//! Pricing constants loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`OPTIBIO_*`)
//! 2. Defaults (this file, backed by the `optibio-core` constants)
//!
//! Configuration is read-only after initialization. An unparseable
//! variable is an error; it never silently falls back to the default.

use std::env;

use optibio_core::bumps::OrderBumpPrices;
use optibio_core::{
    PricingConfig, TaxBase, TaxRate, DEFAULT_TAX_RATE_BPS, FREE_SHIPPING_THRESHOLD_CENTS,
    STANDARD_SHIPPING_CENTS,
};
use serde::{Deserialize, Serialize};

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Store name (shown on order confirmations)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Post-discount subtotal at which shipping becomes free
    pub free_shipping_threshold_cents: i64,

    pub standard_shipping_cents: i64,

    /// Tax rate in basis points, e.g. 800 = 8%
    pub tax_rate_bps: u32,

    /// Whether order bumps are part of the tax base
    pub tax_order_bumps: bool,

    pub order_bump_prices: OrderBumpPrices,

    /// Number of payments in the "or N payments of $X" line
    pub installment_count: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            store_name: "Optibio".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            free_shipping_threshold_cents: FREE_SHIPPING_THRESHOLD_CENTS,
            standard_shipping_cents: STANDARD_SHIPPING_CENTS,
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            tax_order_bumps: false,
            order_bump_prices: OrderBumpPrices::default(),
            installment_count: 4,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from the process environment.
    ///
    /// ## Environment Variables
    /// - `OPTIBIO_STORE_NAME`: Override store name
    /// - `OPTIBIO_FREE_SHIPPING_THRESHOLD_CENTS`: e.g. "7500"
    /// - `OPTIBIO_STANDARD_SHIPPING_CENTS`: e.g. "595"
    /// - `OPTIBIO_TAX_RATE`: percent, e.g. "8.25"
    /// - `OPTIBIO_TAX_BUMPS`: "true" to tax order bumps
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(store_name) = lookup("OPTIBIO_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(value) = lookup("OPTIBIO_FREE_SHIPPING_THRESHOLD_CENTS") {
            config.free_shipping_threshold_cents =
                parse_cents("OPTIBIO_FREE_SHIPPING_THRESHOLD_CENTS", &value)?;
        }

        if let Some(value) = lookup("OPTIBIO_STANDARD_SHIPPING_CENTS") {
            config.standard_shipping_cents =
                parse_cents("OPTIBIO_STANDARD_SHIPPING_CENTS", &value)?;
        }

        if let Some(value) = lookup("OPTIBIO_TAX_RATE") {
            let rate = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|pct| *pct <= 100.0)
                .and_then(TaxRate::from_percentage)
                .ok_or_else(|| ConfigError::InvalidValue("OPTIBIO_TAX_RATE".to_string()))?;
            config.tax_rate_bps = rate.bps();
        }

        if let Some(value) = lookup("OPTIBIO_TAX_BUMPS") {
            config.tax_order_bumps = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("OPTIBIO_TAX_BUMPS".to_string()))?;
        }

        Ok(config)
    }

    /// The calculator's view of this configuration.
    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            shipping_threshold_cents: self.free_shipping_threshold_cents,
            standard_shipping_cents: self.standard_shipping_cents,
            tax_rate: TaxRate::from_bps(self.tax_rate_bps),
            tax_base: if self.tax_order_bumps {
                TaxBase::DiscountedSubtotalWithBumps
            } else {
                TaxBase::DiscountedSubtotal
            },
            order_bump_prices: self.order_bump_prices,
        }
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use optibio_checkout::config::StoreConfig;
    ///
    /// let config = StoreConfig::default();
    /// assert_eq!(config.format_currency(4999), "$49.99");
    /// assert_eq!(config.format_currency(-1000), "-$10.00");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole,
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.to_string()
            }
        )
    }
}

fn parse_cents(key: &str, value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|cents| *cents >= 0)
        .ok_or_else(|| ConfigError::InvalidValue(key.to_string()))
}
