//! Property tests for the order total calculator.

use optibio_core::{
    calculate_order_total, CartLine, DiscountCode, OrderBump, OrderBumpSelection, OrderInput,
    PricingConfig, TaxBase, TaxRate,
};
use proptest::prelude::*;

fn line_strategy() -> impl Strategy<Value = CartLine> {
    (0i64..=20_000, 1i64..=10, any::<bool>()).prop_map(|(price, qty, sub)| {
        let line = CartLine::new("ashwagandha", price, qty);
        if sub {
            line.subscription()
        } else {
            line
        }
    })
}

fn discount_strategy() -> impl Strategy<Value = Option<DiscountCode>> {
    prop_oneof![
        Just(None),
        (0i64..=100).prop_map(|pct| Some(DiscountCode::percentage("PCT", pct))),
        (0i64..=50_000).prop_map(|cents| Some(DiscountCode::fixed_amount("FIXED", cents))),
    ]
}

fn surcharge_bumps_strategy() -> impl Strategy<Value = OrderBumpSelection> {
    (any::<bool>(), any::<bool>()).prop_map(|(protection, priority)| {
        let mut selection = OrderBumpSelection::none();
        selection.set(OrderBump::ShippingProtection, protection);
        selection.set(OrderBump::PriorityProcessing, priority);
        selection
    })
}

fn config_strategy() -> impl Strategy<Value = PricingConfig> {
    (0u32..=1500, 0i64..=20_000, 0i64..=1500, any::<bool>()).prop_map(
        |(bps, threshold, shipping, tax_bumps)| PricingConfig {
            shipping_threshold_cents: threshold,
            standard_shipping_cents: shipping,
            tax_rate: TaxRate::from_bps(bps),
            tax_base: if tax_bumps {
                TaxBase::DiscountedSubtotalWithBumps
            } else {
                TaxBase::DiscountedSubtotal
            },
            ..PricingConfig::default()
        },
    )
}

fn input_strategy() -> impl Strategy<Value = OrderInput> {
    (
        prop::collection::vec(line_strategy(), 0..=5),
        discount_strategy(),
        surcharge_bumps_strategy(),
        0i64..=50_000,
        any::<bool>(),
    )
        .prop_map(|(lines, discount, order_bumps, credits, apply)| OrderInput {
            lines,
            discount,
            order_bumps,
            available_credits_cents: credits,
            apply_credits: apply,
        })
}

proptest! {
    #[test]
    fn prop_pricing_is_deterministic(input in input_strategy(), config in config_strategy()) {
        let first = calculate_order_total(&input, &config);
        let second = calculate_order_total(&input.clone(), &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_total_is_never_negative(input in input_strategy(), config in config_strategy()) {
        let summary = calculate_order_total(&input, &config).unwrap();
        prop_assert!(summary.total_cents >= 0);
        prop_assert!(summary.credits_applied_cents >= 0);
        prop_assert!(summary.subtotal_after_discount_cents() >= 0);
    }

    #[test]
    fn prop_summary_components_add_up(input in input_strategy(), config in config_strategy()) {
        let s = calculate_order_total(&input, &config).unwrap();
        prop_assert_eq!(
            s.total_cents,
            s.subtotal_cents - s.discount_cents + s.order_bumps_cents + s.shipping_cents
                + s.tax_cents - s.credits_applied_cents
        );
    }

    #[test]
    fn prop_larger_percentage_never_raises_total(
        lines in prop::collection::vec(line_strategy(), 1..=5),
        low in 0i64..=100,
        high in 0i64..=100,
        config in config_strategy(),
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let price = |pct: i64| {
            calculate_order_total(
                &OrderInput::new(lines.clone()).with_discount(DiscountCode::percentage("PCT", pct)),
                &config,
            )
            .unwrap()
        };
        // Shipping can appear when a discount crosses the threshold, so the
        // monotonic guarantee is about everything except shipping.
        let at_low = price(low);
        let at_high = price(high);
        prop_assert!(
            at_high.total_cents - at_high.shipping_cents <= at_low.total_cents - at_low.shipping_cents
        );
    }

    #[test]
    fn prop_fixed_discount_clamps_to_subtotal(
        lines in prop::collection::vec(line_strategy(), 1..=5),
        extra in 1i64..=10_000,
    ) {
        let subtotal: i64 = lines.iter().map(|l| l.unit_price_cents * l.quantity).sum();
        let input = OrderInput::new(lines)
            .with_discount(DiscountCode::fixed_amount("FIXED", subtotal + extra));
        let summary = calculate_order_total(&input, &PricingConfig::default()).unwrap();
        prop_assert_eq!(summary.discount_cents, subtotal);
        prop_assert_eq!(summary.subtotal_after_discount_cents(), 0);
    }

    #[test]
    fn prop_excess_credits_zero_the_total(
        lines in prop::collection::vec(line_strategy(), 0..=5),
        config in config_strategy(),
    ) {
        let pre = calculate_order_total(&OrderInput::new(lines.clone()), &config).unwrap();
        let input = OrderInput::new(lines).with_credits(pre.total_cents + 1);
        let summary = calculate_order_total(&input, &config).unwrap();
        prop_assert_eq!(summary.credits_applied_cents, pre.total_cents);
        prop_assert_eq!(summary.total_cents, 0);
    }

    #[test]
    fn prop_free_shipping_boundary(
        threshold in 1i64..=20_000,
        shipping in 1i64..=1500,
    ) {
        let config = PricingConfig {
            shipping_threshold_cents: threshold,
            standard_shipping_cents: shipping,
            ..PricingConfig::default()
        };
        let below = calculate_order_total(
            &OrderInput::new(vec![CartLine::new("a", threshold - 1, 1)]),
            &config,
        )
        .unwrap();
        let at = calculate_order_total(
            &OrderInput::new(vec![CartLine::new("a", threshold, 1)]),
            &config,
        )
        .unwrap();
        prop_assert_eq!(below.shipping_cents, shipping);
        prop_assert_eq!(at.shipping_cents, 0);
    }
}
