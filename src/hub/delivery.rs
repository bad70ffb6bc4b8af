//! Fan-out of one message to one registry snapshot.
//!
//! Every target gets its own delivery future, bounded by the per-sink write
//! timeout. The futures are polled together, so a slow sink only costs its
//! own timeout. An optional deadline bounds the whole fan-out; targets still
//! pending when it passes are reported as [`Outcome::Expired`] and their
//! futures are dropped, which is why [`Sink::deliver`](crate::domain::Sink)
//! must be cancel-safe.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::debug;

use crate::domain::{Message, Subscriber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    /// The sink returned an error or missed the write timeout.
    Failed,
    /// The caller's deadline passed before the sink finished.
    Expired,
}

/// Delivers `message` to every target. The returned outcomes are index-aligned
/// with `targets`.
pub async fn fan_out(
    message: &Message,
    targets: &[Arc<Subscriber>],
    write_timeout: Duration,
    deadline: Option<Instant>,
) -> Vec<Outcome> {
    let mut outcomes = vec![Outcome::Expired; targets.len()];

    let mut pending: FuturesUnordered<_> = targets
        .iter()
        .enumerate()
        .map(|(idx, target)| async move {
            let outcome = match timeout(write_timeout, target.sink().deliver(message)).await {
                Ok(Ok(())) => Outcome::Delivered,
                Ok(Err(err)) => {
                    debug!(
                        handle = %target.handle(),
                        subscriber = %target.id(),
                        sequence = message.sequence,
                        error = %err,
                        "delivery failed"
                    );
                    Outcome::Failed
                }
                Err(_) => {
                    debug!(
                        handle = %target.handle(),
                        subscriber = %target.id(),
                        sequence = message.sequence,
                        timeout_ms = write_timeout.as_millis() as u64,
                        "delivery timed out"
                    );
                    Outcome::Failed
                }
            };
            (idx, outcome)
        })
        .collect();

    loop {
        let next = match deadline {
            Some(deadline) => match timeout_at(deadline, pending.next()).await {
                Ok(next) => next,
                Err(_) => {
                    debug!(
                        sequence = message.sequence,
                        unfinished = pending.len(),
                        "publish deadline reached"
                    );
                    break;
                }
            },
            None => pending.next().await,
        };

        match next {
            Some((idx, outcome)) => outcomes[idx] = outcome,
            None => break,
        }
    }

    outcomes
}
