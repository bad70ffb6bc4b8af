use serde::{Deserialize, Serialize};

/// A published notification.
///
/// The payload is opaque to the hub. `sequence` is assigned by the hub when
/// the message is accepted and is strictly increasing per hub; it orders
/// delivery attempts and shows up in diagnostics but is never used for replay.
///
/// # Fields
///
/// - `sequence` - Hub-assigned publish sequence number, starting at 1.
/// - `payload` - The message content, usually a JSON-encoded string.
/// - `published_at` - Unix timestamp in milliseconds taken at publish time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sequence: u64,
    pub payload: String,
    pub published_at: i64,
}

impl Message {
    pub fn new(sequence: u64, payload: String) -> Self {
        Self {
            sequence,
            payload,
            published_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
