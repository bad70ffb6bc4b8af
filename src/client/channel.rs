use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{Message, Sink};
use crate::utils::error::SinkError;

/// Sink over a bounded tokio channel.
///
/// `deliver` waits for capacity, so a consumer that stops draining the
/// channel is eventually cut off by the hub's write timeout.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<Message>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<Message>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl Sink for ChannelSink {
    async fn deliver(&self, message: &Message) -> Result<(), SinkError> {
        self.sender
            .send(message.clone())
            .await
            .map_err(|_| SinkError::Closed)
    }
}
