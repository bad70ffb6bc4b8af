use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::domain::{DeliveryReport, Hub, Sink, SubscriberId, SubscriptionHandle};
use crate::hub::dispatch::Dispatcher;
use crate::hub::registry::Registry;
use crate::utils::error::HubError;

/// Purely in-memory hub.
///
/// Nothing survives a restart: subscriptions are gone and sequence numbers
/// start again at 1.
pub struct InMemoryHub {
    dispatcher: Dispatcher,
}

impl InMemoryHub {
    pub fn new(write_timeout: Duration) -> Self {
        Self {
            dispatcher: Dispatcher::new(Registry::new(), write_timeout),
        }
    }

    /// Handles currently registered for `subscriber`.
    pub fn handles_of(&self, subscriber: &str) -> Vec<SubscriptionHandle> {
        self.dispatcher.registry().handles_of(subscriber)
    }

    pub fn last_sequence(&self) -> u64 {
        self.dispatcher.registry().last_sequence()
    }
}

impl Default for InMemoryHub {
    fn default() -> Self {
        Self::new(crate::hub::DEFAULT_WRITE_TIMEOUT)
    }
}

#[async_trait]
impl Hub for InMemoryHub {
    fn subscribe(
        &self,
        subscriber: SubscriberId,
        sink: Arc<dyn Sink>,
    ) -> Result<SubscriptionHandle, HubError> {
        self.dispatcher.subscribe(subscriber, sink)
    }

    fn unsubscribe(&self, handle: &SubscriptionHandle) -> Result<(), HubError> {
        self.dispatcher.unsubscribe(handle)
    }

    async fn publish_until(
        &self,
        payload: String,
        deadline: Option<Instant>,
    ) -> Result<DeliveryReport, HubError> {
        self.dispatcher
            .publish(payload, deadline, |_| async { Ok(()) })
            .await
    }

    fn is_subscribed(&self, handle: &SubscriptionHandle) -> bool {
        self.dispatcher.registry().contains(handle)
    }

    fn subscription_count(&self) -> usize {
        self.dispatcher.registry().len()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
