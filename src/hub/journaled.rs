use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::spawn_blocking;
use tokio::time::Instant;
use tracing::error;

use crate::domain::{DeliveryReport, Hub, Sink, SubscriberId, SubscriptionHandle};
use crate::hub::dispatch::Dispatcher;
use crate::hub::registry::Registry;
use crate::persistence::Journal;
use crate::utils::error::HubError;

/// Hub backed by a sled message journal.
///
/// Live fan-out is identical to [`InMemoryHub`](crate::hub::InMemoryHub).
/// In addition each accepted message is appended to the journal before any
/// sink sees it, and sequence numbering resumes from the journal's
/// high-water mark. Subscriptions themselves are never stored.
pub struct JournaledHub {
    dispatcher: Dispatcher,
    journal: Journal,
}

impl JournaledHub {
    /// Takes ownership of an already opened journal.
    pub fn new(journal: Journal, write_timeout: Duration) -> Result<Self, HubError> {
        let last_sequence = journal.last_sequence()?;
        Ok(Self {
            dispatcher: Dispatcher::new(Registry::starting_after(last_sequence), write_timeout),
            journal,
        })
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn last_sequence(&self) -> u64 {
        self.dispatcher.registry().last_sequence()
    }
}

#[async_trait]
impl Hub for JournaledHub {
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
        let journal = self.journal.clone();
        self.dispatcher
            .publish(payload, deadline, |message| async move {
                let sequence = message.sequence;
                // sled writes block; keep them off the async workers
                spawn_blocking(move || journal.append(&message))
                    .await?
                    .map_err(|err| {
                        error!(sequence, error = %err, "journal append failed");
                        HubError::from(err)
                    })
            })
            .await
    }

    fn is_subscribed(&self, handle: &SubscriptionHandle) -> bool {
        self.dispatcher.registry().contains(handle)
    }

    fn subscription_count(&self) -> usize {
        self.dispatcher.registry().len()
    }

    fn backend(&self) -> &'static str {
        "journal"
    }

    async fn close(&self) -> Result<(), HubError> {
        self.journal.flush().await?;
        Ok(())
    }
}
