use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::domain::{Sink, SubscriberId, SubscriptionHandle};
use crate::utils::error::HubError;

/// Outcome of one publish.
///
/// `failed` counts every unsuccessful attempt. `expired` is the part of
/// `failed` that was still pending when the caller's deadline passed; those
/// subscriptions stay registered. `removed` lists the subscriber ids whose
/// entries this publish auto-unsubscribed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub sequence: u64,
    pub delivered: usize,
    pub failed: usize,
    pub expired: usize,
    pub removed: Vec<SubscriberId>,
}

impl DeliveryReport {
    pub fn new(sequence: u64) -> Self {
        Self {
            sequence,
            ..Self::default()
        }
    }

    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Publish/subscribe notification capability.
///
/// Implementations must be safe to call concurrently from independent tasks
/// without outside synchronization. Backends are selected at startup and
/// handed around as `Arc<dyn Hub>`.
#[async_trait]
pub trait Hub: Send + Sync + 'static {
    /// Registers `sink` under `subscriber`.
    ///
    /// The new subscription receives every message whose publish starts after
    /// this call returns, and nothing published before.
    fn subscribe(
        &self,
        subscriber: SubscriberId,
        sink: Arc<dyn Sink>,
    ) -> Result<SubscriptionHandle, HubError>;

    /// Removes a subscription. A second call with the same handle fails with
    /// [`HubError::NotFound`].
    fn unsubscribe(&self, handle: &SubscriptionHandle) -> Result<(), HubError>;

    /// Publishes `payload` to every current subscription.
    async fn publish(&self, payload: String) -> Result<DeliveryReport, HubError> {
        self.publish_until(payload, None).await
    }

    /// Like [`Hub::publish`], but stops waiting on sinks at `deadline`.
    async fn publish_until(
        &self,
        payload: String,
        deadline: Option<Instant>,
    ) -> Result<DeliveryReport, HubError>;

    fn is_subscribed(&self, handle: &SubscriptionHandle) -> bool;

    fn subscription_count(&self) -> usize;

    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    /// Releases backend resources. Subscriptions are not touched.
    async fn close(&self) -> Result<(), HubError> {
        Ok(())
    }
}
