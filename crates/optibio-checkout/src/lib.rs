//! # optibio-checkout: Cart and Checkout Orchestration
//!
//! The layer between the storefront and the pricing core. It owns the
//! cart, reads store configuration, and talks to the payment and billing
//! providers. It never computes a price itself: every amount comes from
//! [`optibio_core::calculate_order_total`].
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Request Lifecycle                         │
//! │                                                                         │
//! │  1. Load StoreConfig ──────────────────────────────────────────────────►│
//! │     • OPTIBIO_* environment variables over defaults                     │
//! │                                                                         │
//! │  2. Mutate CartState ──────────────────────────────────────────────────►│
//! │     • add / update / remove under one Mutex                             │
//! │                                                                         │
//! │  3. Snapshot + CheckoutRequest ────────────────────────────────────────►│
//! │     • CheckoutService::preview  (cart page)                             │
//! │     • CheckoutService::submit   (checkout page)                         │
//! │                                                                         │
//! │  4. Provider call ─────────────────────────────────────────────────────►│
//! │     • PaymentGateway: amount must match the priced total                │
//! │     • BillingClient: pause / resume / skip / cancel                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod subscription;

pub use cart::{Cart, CartError, CartItem, CartState};
pub use checkout::{
    CartPreview, ChargeRequest, CheckoutPlan, CheckoutRequest, CheckoutService, PaymentGateway,
    PaymentSession, SubscriptionRequest,
};
pub use config::{ConfigError, StoreConfig};
pub use error::{ApiError, CheckoutError, CheckoutResult, ErrorCode, ProviderError};
pub use subscription::{BillingClient, SubscriptionService, SubscriptionSnapshot};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=optibio=trace` - Show trace for optibio crates only
/// - Default: `info,optibio=debug`
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,optibio=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
