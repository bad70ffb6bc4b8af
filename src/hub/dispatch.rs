//! Publish pipeline shared by the hub backends.
//!
//! A [`Dispatcher`] couples a [`Registry`] with a publish gate. The gate is an
//! async mutex held from the snapshot until every delivery attempt of that
//! publish has settled, which gives all publishes one global order: for
//! sequence numbers `s1 < s2`, a sink receiving both sees the `s1` attempt
//! first. Subscribe and unsubscribe never touch the gate.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{DeliveryReport, Message, Sink, SubscriberId, SubscriptionHandle};
use crate::hub::delivery::{self, Outcome};
use crate::hub::registry::Registry;
use crate::utils::error::HubError;

pub struct Dispatcher {
    registry: Registry,
    gate: Mutex<()>,
    write_timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: Registry, write_timeout: Duration) -> Self {
        Self {
            registry,
            gate: Mutex::new(()),
            write_timeout,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    pub fn subscribe(
        &self,
        subscriber: SubscriberId,
        sink: Arc<dyn Sink>,
    ) -> Result<SubscriptionHandle, HubError> {
        let handle = self.registry.insert(subscriber.clone(), sink)?;
        debug!(%handle, %subscriber, "subscribed");
        Ok(handle)
    }

    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> Result<(), HubError> {
        let removed = self.registry.remove(handle)?;
        removed.mark_dead();
        debug!(%handle, subscriber = %removed.id(), "unsubscribed");
        Ok(())
    }

    /// Runs one publish.
    ///
    /// `record` sees the sequenced message before any sink does; returning an
    /// error aborts the publish without delivering. Entries flagged dead after
    /// the snapshot was taken are skipped.
    pub async fn publish<F, Fut>(
        &self,
        payload: String,
        deadline: Option<Instant>,
        record: F,
    ) -> Result<DeliveryReport, HubError>
    where
        F: FnOnce(Message) -> Fut + Send,
        Fut: Future<Output = Result<(), HubError>> + Send,
    {
        if payload.is_empty() {
            return Err(HubError::EmptyMessage);
        }

        let _turn = self.gate.lock().await;

        let snapshot = self.registry.snapshot();
        let message = Message::new(snapshot.sequence, payload);
        record(message.clone()).await?;

        let targets: Vec<_> = snapshot
            .targets
            .into_iter()
            .filter(|target| {
                let alive = target.is_alive();
                if !alive {
                    self.registry.evict(target);
                }
                alive
            })
            .collect();

        let outcomes = delivery::fan_out(&message, &targets, self.write_timeout, deadline).await;

        let mut report = DeliveryReport::new(message.sequence);
        for (target, outcome) in targets.iter().zip(outcomes) {
            match outcome {
                Outcome::Delivered => report.delivered += 1,
                Outcome::Failed => {
                    report.failed += 1;
                    target.mark_dead();
                    if self.registry.evict(target) {
                        warn!(
                            handle = %target.handle(),
                            subscriber = %target.id(),
                            sequence = message.sequence,
                            "removed subscription after failed delivery"
                        );
                        report.removed.push(target.id().clone());
                    }
                }
                Outcome::Expired => {
                    report.failed += 1;
                    report.expired += 1;
                }
            }
        }

        debug!(
            sequence = report.sequence,
            delivered = report.delivered,
            failed = report.failed,
            expired = report.expired,
            removed = report.removed.len(),
            "published"
        );

        Ok(report)
    }
}
