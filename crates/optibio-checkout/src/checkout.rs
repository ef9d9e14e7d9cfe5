//! # Checkout
//!
//! Turns a cart into a preview (cart page) or a charge (checkout page).
//! Both paths build the same [`OrderInput`] and call the same calculator,
//! so the number a shopper sees is the number they are charged.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Flow                                   │
//! │                                                                         │
//! │  Cart snapshot + CheckoutRequest                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌─────────────────────┐                                                │
//! │  │ calculate_order_    │──────► preview() ──► CartPreview               │
//! │  │ total (core)        │                      (summary, progress,       │
//! │  └─────────┬───────────┘                       installments)            │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  build_charge() ──► CheckoutPlan                                        │
//! │            │          ├── OneTime(ChargeRequest)                        │
//! │            │          └── Subscription(SubscriptionRequest)             │
//! │            ▼                                                            │
//! │  submit() ──► PaymentGateway ──► PaymentSession                         │
//! │                        │                                                │
//! │                        └── amount ≠ priced total? ──► ChargeMismatch    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use optibio_core::pricing::{free_shipping_progress, installment_amount, FreeShippingProgress};
use optibio_core::subscription::subscription_price;
use optibio_core::{
    calculate_order_total, CartLine, CoreError, DiscountCode, FounderTier, OrderBumpSelection,
    OrderInput, PricedOrderSummary,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::cart::Cart;
use crate::config::StoreConfig;
use crate::error::{CheckoutError, CheckoutResult, ProviderError};

// =============================================================================
// Requests
// =============================================================================

/// What the shopper chose on the checkout page, besides the cart itself.
///
/// The discount code arrives already validated by the discount service,
/// and `available_credits_cents` is the shopper's referral balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub discount: Option<DiscountCode>,

    #[serde(default)]
    pub order_bumps: OrderBumpSelection,

    #[serde(default)]
    pub use_referral_credits: bool,

    #[serde(default)]
    pub available_credits_cents: i64,
}

impl CheckoutRequest {
    /// Builds the calculator input for `cart`.
    pub fn order_input(&self, cart: &Cart) -> OrderInput {
        OrderInput {
            lines: cart.lines(),
            discount: self.discount.clone(),
            order_bumps: self.order_bumps,
            available_credits_cents: self.available_credits_cents,
            apply_credits: self.use_referral_credits,
        }
    }
}

/// Everything the cart page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPreview {
    pub summary: PricedOrderSummary,
    pub free_shipping: FreeShippingProgress,
    pub installment_count: u32,
    pub installment_cents: i64,
}

/// A one-time charge, ready for the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub order_reference: Uuid,
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub discount_code: Option<String>,
    pub summary: PricedOrderSummary,
    /// Always `summary.total_cents`.
    pub amount_cents: i64,
}

/// A recurring subscription, ready for the billing provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub order_reference: Uuid,
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub quantity: i64,
    pub founder_tier: FounderTier,
    pub lifetime_discount_percent: i64,
    /// Charged today. Always `summary.total_cents`.
    pub initial_amount_cents: i64,
    /// Charged every interval after the first: discounted unit price × quantity.
    pub recurring_amount_cents: i64,
    pub interval_months: u32,
    pub summary: PricedOrderSummary,
}

/// What checkout will ask the provider for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutPlan {
    OneTime(ChargeRequest),
    Subscription(SubscriptionRequest),
}

impl CheckoutPlan {
    pub fn order_reference(&self) -> Uuid {
        match self {
            CheckoutPlan::OneTime(charge) => charge.order_reference,
            CheckoutPlan::Subscription(sub) => sub.order_reference,
        }
    }

    /// The amount the provider must report back: the priced total.
    pub fn expected_amount_cents(&self) -> i64 {
        match self {
            CheckoutPlan::OneTime(charge) => charge.amount_cents,
            CheckoutPlan::Subscription(sub) => sub.initial_amount_cents,
        }
    }
}

// =============================================================================
// Payment Gateway
// =============================================================================

/// A session created by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub session_id: String,
    /// What the provider says it will charge.
    pub amount_cents: i64,
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// The external payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        charge: &ChargeRequest,
    ) -> Result<PaymentSession, ProviderError>;

    async fn create_subscription(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<PaymentSession, ProviderError>;
}

// =============================================================================
// Checkout Service
// =============================================================================

/// Prices carts and hands charges to the payment provider.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    config: StoreConfig,
}

impl CheckoutService {
    pub fn new(config: StoreConfig) -> Self {
        CheckoutService { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Prices `cart` exactly as checkout would.
    pub fn price(
        &self,
        cart: &Cart,
        request: &CheckoutRequest,
    ) -> CheckoutResult<PricedOrderSummary> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let input = request.order_input(cart);
        Ok(calculate_order_total(&input, &self.config.pricing())?)
    }

    /// The cart page: summary, free-shipping bar and installment line.
    pub fn preview(&self, cart: &Cart, request: &CheckoutRequest) -> CheckoutResult<CartPreview> {
        let summary = self.price(cart, request)?;
        let pricing = self.config.pricing();

        let free_shipping =
            free_shipping_progress(summary.subtotal_after_discount_cents(), &pricing);
        let installment = installment_amount(summary.total_cents, self.config.installment_count)?;

        debug!(
            items = cart.item_count(),
            total_cents = summary.total_cents,
            free_shipping = free_shipping.unlocked,
            "Cart previewed"
        );

        Ok(CartPreview {
            summary,
            free_shipping,
            installment_count: self.config.installment_count,
            installment_cents: installment.cents(),
        })
    }

    /// Builds the request checkout will send to the provider.
    ///
    /// A subscription is checked out on its own: a cart holding one
    /// subscription line becomes a subscription request whose first charge
    /// is the priced total and whose recurring price carries the shopper's
    /// founder tier discount. Any other cart with a subscription line is
    /// rejected with [`CheckoutError::MixedCart`].
    pub fn build_charge(
        &self,
        cart: &Cart,
        request: &CheckoutRequest,
    ) -> CheckoutResult<CheckoutPlan> {
        let summary = self.price(cart, request)?;
        let order_reference = Uuid::new_v4();

        let subscription_lines = cart.items.iter().filter(|i| i.is_subscription).count();
        let one_time_lines = cart.items.len() - subscription_lines;
        if subscription_lines > 0 && (one_time_lines > 0 || subscription_lines > 1) {
            return Err(CheckoutError::MixedCart {
                subscription_lines,
                one_time_lines,
            });
        }

        let subscription_item = cart.items.iter().find(|item| item.is_subscription);

        let Some(item) = subscription_item else {
            return Ok(CheckoutPlan::OneTime(ChargeRequest {
                order_reference,
                items: cart.lines(),
                discount_code: request.discount.as_ref().map(|d| d.code.clone()),
                summary,
                amount_cents: summary.total_cents,
            }));
        };

        let founder_tier = FounderTier::for_subtotal(summary.subtotal_cents);
        let lifetime_discount_percent = founder_tier.lifetime_discount_percent();
        let unit_price = subscription_price(item.unit_price_cents, lifetime_discount_percent)
            .map_err(CoreError::from)?;
        let recurring = unit_price
            .checked_multiply_quantity(item.quantity)
            .ok_or(CoreError::AmountOverflow {
                stage: "subscription price",
            })?;

        Ok(CheckoutPlan::Subscription(SubscriptionRequest {
            order_reference,
            product_id: item.product_id.clone(),
            variant_id: item.variant_id.clone(),
            quantity: item.quantity,
            founder_tier,
            lifetime_discount_percent,
            initial_amount_cents: summary.total_cents,
            recurring_amount_cents: recurring.cents(),
            interval_months: 1,
            summary,
        }))
    }

    /// Builds the charge and asks the provider to create it.
    ///
    /// ## Errors
    /// - [`CheckoutError::ChargeMismatch`]: the provider reported an amount
    ///   other than the one priced here. The session is not used.
    /// - [`CheckoutError::Gateway`]: the provider call failed
    pub async fn submit<G>(
        &self,
        cart: &Cart,
        request: &CheckoutRequest,
        gateway: &G,
    ) -> CheckoutResult<PaymentSession>
    where
        G: PaymentGateway + ?Sized,
    {
        let plan = self.build_charge(cart, request)?;
        let order_reference = plan.order_reference();
        let expected_cents = plan.expected_amount_cents();

        let session = match &plan {
            CheckoutPlan::OneTime(charge) => {
                info!(
                    %order_reference,
                    amount_cents = charge.amount_cents,
                    "Creating checkout session"
                );
                gateway.create_checkout_session(charge).await
            }
            CheckoutPlan::Subscription(sub) => {
                info!(
                    %order_reference,
                    tier = ?sub.founder_tier,
                    initial_amount_cents = sub.initial_amount_cents,
                    recurring_amount_cents = sub.recurring_amount_cents,
                    "Creating subscription"
                );
                gateway.create_subscription(sub).await
            }
        }
        .map_err(CheckoutError::Gateway)?;

        if session.amount_cents != expected_cents {
            error!(
                %order_reference,
                expected_cents,
                charged_cents = session.amount_cents,
                session_id = %session.session_id,
                "Provider amount does not match priced total"
            );
            return Err(CheckoutError::ChargeMismatch {
                order_reference: order_reference.to_string(),
                expected_cents,
                charged_cents: session.amount_cents,
            });
        }

        Ok(session)
    }
}
