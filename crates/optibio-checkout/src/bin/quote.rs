//! # Order Quote
//!
//! Prices a saved cart snapshot with the live store configuration, for
//! reproducing the total a customer saw.
//!
//! ## Usage
//! ```bash
//! # Price a cart as-is
//! cargo run -p optibio-checkout --bin optibio-quote -- --cart cart.json
//!
//! # With a 15% code, referral credits and two order bumps
//! cargo run -p optibio-checkout --bin optibio-quote -- --cart cart.json \
//!     --discount-type percentage --discount-value 15 --code SAVE15 \
//!     --credits 2500 --apply-credits --shipping-protection --second-bottle
//! ```
//!
//! The cart file is a JSON array of lines:
//! ```json
//! [{ "productId": "ashwagandha-ksm66", "unitPriceCents": 4999, "quantity": 1 }]
//! ```

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use optibio_checkout::{init_tracing, StoreConfig};
use optibio_core::{
    calculate_order_total, CartLine, DiscountCode, DiscountType, OrderBump, OrderBumpSelection,
    OrderInput,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DiscountKind {
    Percentage,
    FixedAmount,
}

impl From<DiscountKind> for DiscountType {
    fn from(kind: DiscountKind) -> Self {
        match kind {
            DiscountKind::Percentage => DiscountType::Percentage,
            DiscountKind::FixedAmount => DiscountType::FixedAmount,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "optibio-quote",
    about = "Price a cart snapshot with the store's pricing rules",
    long_about = None
)]
struct QuoteArgs {
    /// Path to a JSON array of cart lines
    #[arg(long)]
    cart: PathBuf,

    /// How --discount-value is read
    #[arg(long, value_enum, requires = "discount_value")]
    discount_type: Option<DiscountKind>,

    /// Percent (0-100) or cents, depending on --discount-type
    #[arg(long, requires = "discount_type", allow_negative_numbers = true)]
    discount_value: Option<i64>,

    /// Discount code the value belongs to
    #[arg(long, default_value = "QUOTE")]
    code: String,

    /// Referral credit balance in cents
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    credits: i64,

    /// Apply the referral credit balance
    #[arg(long)]
    apply_credits: bool,

    #[arg(long)]
    shipping_protection: bool,

    #[arg(long)]
    priority_processing: bool,

    #[arg(long)]
    second_bottle: bool,
}

impl QuoteArgs {
    fn order_input(&self, lines: Vec<CartLine>) -> OrderInput {
        let discount = match (self.discount_type, self.discount_value) {
            (Some(kind), Some(value)) => Some(DiscountCode::new(&self.code, kind.into(), value)),
            _ => None,
        };

        let mut order_bumps = OrderBumpSelection::none();
        order_bumps.set(OrderBump::ShippingProtection, self.shipping_protection);
        order_bumps.set(OrderBump::PriorityProcessing, self.priority_processing);
        order_bumps.set(OrderBump::SecondBottle, self.second_bottle);

        OrderInput {
            lines,
            discount,
            order_bumps,
            available_credits_cents: self.credits,
            apply_credits: self.apply_credits,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = QuoteArgs::parse();
    let config = StoreConfig::from_env()?;

    let raw = fs::read_to_string(&args.cart)
        .map_err(|e| format!("failed to read {}: {e}", args.cart.display()))?;
    let lines: Vec<CartLine> = serde_json::from_str(&raw)
        .map_err(|e| format!("failed to parse {}: {e}", args.cart.display()))?;
    debug!(lines = lines.len(), cart = %args.cart.display(), "Cart loaded");

    let input = args.order_input(lines);
    let summary = calculate_order_total(&input, &config.pricing())?;

    info!(
        store = %config.store_name,
        total = %config.format_currency(summary.total_cents),
        "Quote computed"
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
