//! # Subscription Management
//!
//! Pause, resume, skip and cancel requests against the billing provider.
//!
//! The provider owns the subscription lifecycle. This service only refuses
//! requests the storefront already knows are invalid (pausing a paused
//! subscription, resuming an active one) and then reflects whatever status
//! the provider returns.
//!
//! ```text
//!            pause                     cancel
//!  Active ───────────► Paused    Active/Paused ───────► CancelPending
//!    ▲                   │                                   │
//!    └───────────────────┘                                   ▼ period end
//!           resume                                       Cancelled
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use optibio_core::SubscriptionStatus;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CheckoutError, CheckoutResult, ProviderError};

/// Days a skip pushes the next billing date out by.
pub const SKIP_INTERVAL_DAYS: i64 = 30;

/// Cancellation note sent when the shopper gives no reason.
pub const DEFAULT_CANCEL_REASON: &str = "Customer requested cancellation";

/// The provider's view of one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    pub subscription_id: String,
    pub status: SubscriptionStatus,
    pub next_billing_date: DateTime<Utc>,
}

/// The external billing provider.
#[async_trait]
pub trait BillingClient: Send + Sync {
    async fn pause(&self, subscription_id: &str) -> Result<SubscriptionSnapshot, ProviderError>;

    async fn resume(&self, subscription_id: &str) -> Result<SubscriptionSnapshot, ProviderError>;

    /// Moves the next charge to `until` without billing in between.
    async fn skip_until(
        &self,
        subscription_id: &str,
        until: DateTime<Utc>,
    ) -> Result<SubscriptionSnapshot, ProviderError>;

    /// Cancels at the end of the current period.
    async fn cancel(
        &self,
        subscription_id: &str,
        reason: &str,
    ) -> Result<SubscriptionSnapshot, ProviderError>;
}

/// Guards and forwards subscription requests.
#[derive(Clone)]
pub struct SubscriptionService {
    billing: Arc<dyn BillingClient>,
}

impl SubscriptionService {
    pub fn new(billing: Arc<dyn BillingClient>) -> Self {
        SubscriptionService { billing }
    }

    /// Only active subscriptions can be paused.
    pub async fn pause(
        &self,
        current: &SubscriptionSnapshot,
    ) -> CheckoutResult<SubscriptionSnapshot> {
        ensure(current.status.can_pause(), "pause", current.status)?;

        let updated = self
            .billing
            .pause(&current.subscription_id)
            .await
            .map_err(CheckoutError::Billing)?;

        info!(
            subscription_id = %current.subscription_id,
            status = %updated.status,
            "Subscription paused"
        );
        Ok(updated)
    }

    /// Only paused subscriptions can be resumed.
    pub async fn resume(
        &self,
        current: &SubscriptionSnapshot,
    ) -> CheckoutResult<SubscriptionSnapshot> {
        ensure(current.status.can_resume(), "resume", current.status)?;

        let updated = self
            .billing
            .resume(&current.subscription_id)
            .await
            .map_err(CheckoutError::Billing)?;

        info!(
            subscription_id = %current.subscription_id,
            status = %updated.status,
            "Subscription resumed"
        );
        Ok(updated)
    }

    /// Skips the next delivery by pushing billing out [`SKIP_INTERVAL_DAYS`].
    pub async fn skip_next(
        &self,
        current: &SubscriptionSnapshot,
    ) -> CheckoutResult<SubscriptionSnapshot> {
        ensure(current.status.can_skip(), "skip", current.status)?;

        let until = current.next_billing_date + Duration::days(SKIP_INTERVAL_DAYS);
        let updated = self
            .billing
            .skip_until(&current.subscription_id, until)
            .await
            .map_err(CheckoutError::Billing)?;

        info!(
            subscription_id = %current.subscription_id,
            next_billing_date = %updated.next_billing_date,
            "Subscription delivery skipped"
        );
        Ok(updated)
    }

    /// Cancels at period end. Anything not already cancelled can be.
    pub async fn cancel(
        &self,
        current: &SubscriptionSnapshot,
        reason: Option<&str>,
    ) -> CheckoutResult<SubscriptionSnapshot> {
        ensure(current.status.can_cancel(), "cancel", current.status)?;

        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_CANCEL_REASON);

        let updated = self
            .billing
            .cancel(&current.subscription_id, reason)
            .await
            .map_err(CheckoutError::Billing)?;

        info!(
            subscription_id = %current.subscription_id,
            status = %updated.status,
            "Subscription cancelled"
        );
        Ok(updated)
    }
}

fn ensure(allowed: bool, action: &'static str, status: SubscriptionStatus) -> CheckoutResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(CheckoutError::SubscriptionState { action, status })
    }
}
