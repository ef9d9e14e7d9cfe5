//! Subscription requests against an in-memory billing provider.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use optibio_checkout::subscription::DEFAULT_CANCEL_REASON;
use optibio_checkout::{
    BillingClient, CheckoutError, ProviderError, SubscriptionService, SubscriptionSnapshot,
};
use optibio_core::SubscriptionStatus;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Pause(String),
    Resume(String),
    Skip(String, DateTime<Utc>),
    Cancel(String, String),
}

#[derive(Default)]
struct FakeBilling {
    calls: Mutex<Vec<Call>>,
}

impl FakeBilling {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn billing_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 11, 1, 12, 0, 0).unwrap()
}

fn snapshot(id: &str, status: SubscriptionStatus) -> SubscriptionSnapshot {
    SubscriptionSnapshot {
        subscription_id: id.to_string(),
        status,
        next_billing_date: billing_date(),
    }
}

#[async_trait]
impl BillingClient for FakeBilling {
    async fn pause(&self, id: &str) -> Result<SubscriptionSnapshot, ProviderError> {
        self.record(Call::Pause(id.to_string()));
        Ok(snapshot(id, SubscriptionStatus::Paused))
    }

    async fn resume(&self, id: &str) -> Result<SubscriptionSnapshot, ProviderError> {
        self.record(Call::Resume(id.to_string()));
        Ok(snapshot(id, SubscriptionStatus::Active))
    }

    async fn skip_until(
        &self,
        id: &str,
        until: DateTime<Utc>,
    ) -> Result<SubscriptionSnapshot, ProviderError> {
        self.record(Call::Skip(id.to_string(), until));
        Ok(SubscriptionSnapshot {
            next_billing_date: until,
            ..snapshot(id, SubscriptionStatus::Active)
        })
    }

    async fn cancel(&self, id: &str, reason: &str) -> Result<SubscriptionSnapshot, ProviderError> {
        if id == "sub_broken" {
            return Err(ProviderError::new("no such subscription"));
        }
        self.record(Call::Cancel(id.to_string(), reason.to_string()));
        Ok(snapshot(id, SubscriptionStatus::CancelPending))
    }
}

fn service() -> (SubscriptionService, Arc<FakeBilling>) {
    let billing = Arc::new(FakeBilling::default());
    (SubscriptionService::new(billing.clone()), billing)
}

#[tokio::test]
async fn pause_then_resume() {
    let (service, billing) = service();

    let paused = service
        .pause(&snapshot("sub_1", SubscriptionStatus::Active))
        .await
        .unwrap();
    assert_eq!(paused.status, SubscriptionStatus::Paused);

    let resumed = service.resume(&paused).await.unwrap();
    assert_eq!(resumed.status, SubscriptionStatus::Active);

    assert_eq!(
        billing.calls(),
        vec![
            Call::Pause("sub_1".to_string()),
            Call::Resume("sub_1".to_string())
        ]
    );
}

#[tokio::test]
async fn invalid_transitions_never_reach_the_provider() {
    let (service, billing) = service();

    let err = service
        .pause(&snapshot("sub_1", SubscriptionStatus::Paused))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::SubscriptionState {
            action: "pause",
            status: SubscriptionStatus::Paused
        }
    ));

    assert!(service
        .resume(&snapshot("sub_1", SubscriptionStatus::Active))
        .await
        .is_err());
    assert!(service
        .skip_next(&snapshot("sub_1", SubscriptionStatus::CancelPending))
        .await
        .is_err());
    assert!(service
        .cancel(&snapshot("sub_1", SubscriptionStatus::Cancelled), None)
        .await
        .is_err());

    assert!(billing.calls().is_empty());
}

#[tokio::test]
async fn skip_pushes_billing_thirty_days() {
    let (service, billing) = service();

    let updated = service
        .skip_next(&snapshot("sub_1", SubscriptionStatus::Active))
        .await
        .unwrap();

    let expected = billing_date() + Duration::days(30);
    assert_eq!(updated.next_billing_date, expected);
    assert_eq!(billing.calls(), vec![Call::Skip("sub_1".to_string(), expected)]);
}

#[tokio::test]
async fn cancel_uses_default_reason_when_blank() {
    let (service, billing) = service();

    let updated = service
        .cancel(&snapshot("sub_1", SubscriptionStatus::Paused), Some("   "))
        .await
        .unwrap();
    assert_eq!(updated.status, SubscriptionStatus::CancelPending);

    service
        .cancel(&snapshot("sub_2", SubscriptionStatus::Active), Some("Too many bottles"))
        .await
        .unwrap();

    assert_eq!(
        billing.calls(),
        vec![
            Call::Cancel("sub_1".to_string(), DEFAULT_CANCEL_REASON.to_string()),
            Call::Cancel("sub_2".to_string(), "Too many bottles".to_string()),
        ]
    );
}

#[tokio::test]
async fn provider_failure_is_a_billing_error() {
    let (service, _billing) = service();
    let err = service
        .cancel(&snapshot("sub_broken", SubscriptionStatus::Active), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Billing(_)));
}
