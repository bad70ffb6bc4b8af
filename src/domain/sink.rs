use async_trait::async_trait;

use crate::domain::Message;
use crate::utils::error::SinkError;

/// A destination that accepts published messages.
///
/// Sinks are owned by the caller and borrowed by the hub: the hub writes to
/// them but never closes them. Any error returned from [`Sink::deliver`] is
/// treated by the hub as a disconnection of that subscription.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Report failures through the returned `Result`; do not panic.
/// - Be cancel-safe. The hub drops `deliver` futures that outlive the
///   caller's deadline while the subscription stays registered, so a
///   cancelled call must leave the sink able to carry the next message
///   intact (buffer what was cut off, never emit half a record).
/// - `deliver` may be called concurrently for different messages only if the
///   caller holds several subscriptions on the same sink.
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Writes one message to the destination.
    async fn deliver(&self, message: &Message) -> Result<(), SinkError>;
}
