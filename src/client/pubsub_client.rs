use async_trait::async_trait;
use tokio::sync::mpsc::Sender;
use tungstenite::protocol::Message as WsMessage;

use crate::domain::{Message, Sink};
use crate::transport::message::ServerMessage;
use crate::utils::error::SinkError;

/// Frames a connection may have queued before senders start waiting.
pub const OUTBOUND_CAPACITY: usize = 256;

/// Represents a connected WebSocket client.
///
/// Each client is uniquely identified by an `id` and owns the outbound half
/// of its connection (`sender`). Replies and notifications share that channel,
/// so the peer sees them in the order they were produced.
///
/// The channel is bounded: a peer that stops reading makes `send` wait, and
/// the hub's write timeout turns that wait into a disconnection.
#[derive(Debug)]
pub struct Client {
    /// Unique connection identifier, used in logs.
    pub id: String,

    /// Channel to send WebSocket messages to the client.
    pub sender: Sender<WsMessage>,
}

impl Client {
    pub fn new(sender: Sender<WsMessage>) -> Self {
        Self {
            id: format!("client-{}", uuid::Uuid::new_v4()),
            sender,
        }
    }

    /// Serializes `message` as JSON text and queues it for the connection,
    /// waiting for room if the queue is full.
    pub async fn send(&self, message: &ServerMessage) -> Result<(), SinkError> {
        let text = serde_json::to_string(message)?;
        self.sender
            .send(WsMessage::text(text))
            .await
            .map_err(|_| SinkError::Closed)
    }
}

#[async_trait]
impl Sink for Client {
    async fn deliver(&self, message: &Message) -> Result<(), SinkError> {
        self.send(&ServerMessage::Notification {
            message: message.clone(),
        })
        .await
    }
}
